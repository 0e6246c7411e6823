use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionsError {
    #[error("No subscription found")]
    NotFound,

    #[error("Subscription is already cancelled")]
    AlreadyCancelled,

    #[error("Invalid invoice range: {0}")]
    InvalidRange(String),

    #[error("Billing provider unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error")]
    Internal,
}
