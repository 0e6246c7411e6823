use templates_sdk::TemplatesError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("template {0} not found")]
    NotFound(Uuid),

    #[error("template name '{0}' already used")]
    DuplicateName(String),

    #[error("invalid {field}: {message}")]
    Validation { field: &'static str, message: String },
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

impl From<DomainError> for TemplatesError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound(id) => TemplatesError::not_found(id),
            DomainError::DuplicateName(name) => TemplatesError::Conflict { name },
            DomainError::Validation { field, message } => TemplatesError::validation(field, message),
        }
    }
}
