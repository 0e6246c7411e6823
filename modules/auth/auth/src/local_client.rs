//! Local client implementing `AuthApi` over the in-memory `AuthService`.

use std::sync::Arc;

use async_trait::async_trait;
use auth_sdk::{AuthApi, AuthError, AuthSession, OAuthProvider, OAuthRedirect, User, UserUpdate};
use modkit::SessionToken;
use tracing::debug;

use crate::domain::service::AuthService;

pub struct AuthLocalClient {
    service: Arc<AuthService>,
}

impl AuthLocalClient {
    #[must_use]
    pub fn new(service: Arc<AuthService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl AuthApi for AuthLocalClient {
    async fn register_user(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let (user, token) = self.service.register(email, password)?;
        Ok(AuthSession { user, token })
    }

    async fn login_user(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let (user, token) = self.service.login(email, password)?;
        Ok(AuthSession { user, token })
    }

    async fn oauth(&self, provider: OAuthProvider) -> Result<OAuthRedirect, AuthError> {
        self.service.authorize_url(provider).map_err(AuthError::from)
    }

    async fn get_logged_user(&self, token: &SessionToken) -> Result<Option<User>, AuthError> {
        Ok(self.service.current_user(token))
    }

    async fn logout(&self, token: &SessionToken) -> Result<(), AuthError> {
        if !self.service.logout(token) {
            debug!("logout for unknown session");
        }
        Ok(())
    }

    async fn reset_password(&self, email: &str) -> Result<(), AuthError> {
        self.service.request_password_reset(email);
        Ok(())
    }

    async fn update_user(&self, token: &SessionToken, update: UserUpdate) -> Result<User, AuthError> {
        if update.is_empty() {
            return self
                .service
                .current_user(token)
                .ok_or(AuthError::InvalidSession);
        }
        self.service.update(token, &update).map_err(AuthError::from)
    }

    async fn confirm_email(&self, code: &str) -> Result<User, AuthError> {
        self.service.confirm_email(code).map_err(AuthError::from)
    }
}
