use std::future::Future;

use tokio_util::sync::CancellationToken;

/// Lifetime of a mounted shell page.
///
/// Async work started on behalf of a page goes through `guard`; once the page
/// is unmounted the result of that work is dropped instead of acted upon.
#[derive(Debug, Clone, Default)]
pub struct Mount {
    token: CancellationToken,
}

impl Mount {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tie the page to an existing token, e.g. the request's.
    #[must_use]
    pub fn from_token(token: CancellationToken) -> Self {
        Self { token }
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        !self.token.is_cancelled()
    }

    pub fn unmount(&self) {
        self.token.cancel();
    }

    /// A mount that is unmounted together with this one.
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
        }
    }

    /// Await `fut` unless the page is unmounted first.
    ///
    /// Returns `None` when the page was unmounted before or while `fut` ran,
    /// including when it completed after the unmount.
    pub async fn guard<F: Future>(&self, fut: F) -> Option<F::Output> {
        tokio::select! {
            biased;
            () = self.token.cancelled() => None,
            out = fut => {
                if self.token.is_cancelled() {
                    None
                } else {
                    Some(out)
                }
            }
        }
    }
}
