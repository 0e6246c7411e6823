use uuid::Uuid;

use crate::navigation::SessionToken;

/// Identity of the signed-in user, passed to every user-scoped service call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SecurityCtx {
    subject_id: Uuid,
    email: String,
    session: Option<SessionToken>,
}

impl SecurityCtx {
    #[must_use]
    pub fn new(subject_id: Uuid, email: impl Into<String>) -> Self {
        Self {
            subject_id,
            email: email.into(),
            session: None,
        }
    }

    #[must_use]
    pub fn with_session(mut self, session: SessionToken) -> Self {
        self.session = Some(session);
        self
    }

    #[inline]
    #[must_use]
    pub fn subject_id(&self) -> Uuid {
        self.subject_id
    }

    #[inline]
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[inline]
    #[must_use]
    pub fn session(&self) -> Option<&SessionToken> {
        self.session.as_ref()
    }
}
