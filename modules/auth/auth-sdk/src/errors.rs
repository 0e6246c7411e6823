//! Error types for the auth SDK.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("An account already exists for this email")]
    EmailTaken,

    #[error("Session is missing or expired")]
    InvalidSession,

    #[error("Confirmation code is invalid or already used")]
    InvalidConfirmationCode,

    #[error("Validation error on field '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("OAuth provider '{provider}' is not available: {message}")]
    Provider { provider: String, message: String },

    #[error("Internal error")]
    Internal,
}

impl AuthError {
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }
}
