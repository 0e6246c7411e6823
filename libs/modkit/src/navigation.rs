//! Router abstraction consumed by shell pages: the current route and a
//! navigation primitive.

use parking_lot::Mutex;
use std::collections::HashMap;

/// Navigation sink (`push` adds a history entry, `replace` swaps the current one).
pub trait Navigator: Send + Sync {
    fn push(&self, url: &str);
    fn replace(&self, url: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Push(String),
    Replace(String),
}

impl Navigation {
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Push(url) | Self::Replace(url) => url,
        }
    }
}

/// Navigator that records every call. Used per request by the server and in tests.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    history: Mutex<Vec<Navigation>>,
}

impl RecordingNavigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn history(&self) -> Vec<Navigation> {
        self.history.lock().clone()
    }

    #[must_use]
    pub fn last(&self) -> Option<Navigation> {
        self.history.lock().last().cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn push(&self, url: &str) {
        tracing::debug!(url, "navigate (push)");
        self.history.lock().push(Navigation::Push(url.to_owned()));
    }

    fn replace(&self, url: &str) {
        tracing::debug!(url, "navigate (replace)");
        self.history.lock().push(Navigation::Replace(url.to_owned()));
    }
}

/// Opaque session token issued by the auth service.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionToken(***)")
    }
}

/// Snapshot of the router for one request.
///
/// `slug` is `None` and `ready` is `false` until the router has resolved its
/// parameters; resolvers must not treat that state as an absent slug.
#[derive(Debug, Clone, Default)]
pub struct RouteRequest {
    pub path: String,
    pub slug: Option<String>,
    pub query: HashMap<String, String>,
    pub session: Option<SessionToken>,
    pub locale: Option<String>,
    pub ready: bool,
}

impl RouteRequest {
    /// A resolved route for `path` with `slug`.
    #[must_use]
    pub fn ready(path: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            slug: Some(slug.into()),
            ready: true,
            ..Self::default()
        }
    }

    /// A route whose parameters are still being resolved.
    #[must_use]
    pub fn pending(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_session(mut self, token: SessionToken) -> Self {
        self.session = Some(token);
        self
    }

    #[must_use]
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    #[must_use]
    pub fn with_query(mut self, query: HashMap<String, String>) -> Self {
        self.query = query;
        self
    }
}
