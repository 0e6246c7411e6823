//! Domain errors for the auth module.

use auth_sdk::AuthError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("email not confirmed")]
    EmailNotConfirmed,

    #[error("email already registered: {0}")]
    EmailTaken(String),

    #[error("session not found or expired")]
    InvalidSession,

    #[error("unknown confirmation code")]
    UnknownCode,

    #[error("validation failed for '{field}': {message}")]
    Validation { field: &'static str, message: String },

    #[error("oauth provider '{0}' is not configured")]
    ProviderNotConfigured(String),

    #[error("oauth provider '{provider}' has an invalid authorize url: {source}")]
    ProviderUrl {
        provider: String,
        #[source]
        source: url::ParseError,
    },
}

impl DomainError {
    #[must_use]
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

impl From<DomainError> for AuthError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::InvalidCredentials => AuthError::InvalidCredentials,
            DomainError::EmailNotConfirmed => {
                AuthError::validation("email", "confirm your email address before signing in")
            }
            DomainError::EmailTaken(_) => AuthError::EmailTaken,
            DomainError::InvalidSession => AuthError::InvalidSession,
            DomainError::UnknownCode => AuthError::InvalidConfirmationCode,
            DomainError::Validation { field, message } => AuthError::validation(field, message),
            DomainError::ProviderNotConfigured(provider) => {
                AuthError::provider(provider, "not configured")
            }
            DomainError::ProviderUrl { provider, source } => {
                tracing::error!(provider = %provider, error = %source, "bad oauth configuration");
                AuthError::Internal
            }
        }
    }
}
