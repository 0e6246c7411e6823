//! `AuthApi` trait definition.

use async_trait::async_trait;
use modkit::{ServiceKind, ServiceName, SessionToken};

use crate::errors::AuthError;
use crate::models::{AuthSession, OAuthProvider, OAuthRedirect, User, UserUpdate};

/// Authentication capability, registered under the `oauth` service name.
///
/// Session state is owned by the implementation; callers only carry the
/// opaque `SessionToken` it hands out.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Create an account and sign it in.
    async fn register_user(&self, email: &str, password: &str) -> Result<AuthSession, AuthError>;

    async fn login_user(&self, email: &str, password: &str) -> Result<AuthSession, AuthError>;

    /// Start an OAuth flow; the caller navigates to the returned url.
    async fn oauth(&self, provider: OAuthProvider) -> Result<OAuthRedirect, AuthError>;

    /// User owning `token`, or `None` when the session is unknown or expired.
    async fn get_logged_user(&self, token: &SessionToken) -> Result<Option<User>, AuthError>;

    async fn logout(&self, token: &SessionToken) -> Result<(), AuthError>;

    /// Request a password reset for `email`. Unknown addresses are not reported.
    async fn reset_password(&self, email: &str) -> Result<(), AuthError>;

    async fn update_user(&self, token: &SessionToken, update: UserUpdate) -> Result<User, AuthError>;

    /// Confirm an email address with the code sent at registration.
    async fn confirm_email(&self, code: &str) -> Result<User, AuthError>;
}

/// `ServiceKind` marker for `AuthApi`.
pub struct OAuthService;

impl ServiceKind for OAuthService {
    const NAME: ServiceName = ServiceName::OAuth;
    type Api = dyn AuthApi;
}
