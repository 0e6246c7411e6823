use subscriptions_sdk::SubscriptionsError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("no subscription for user {0}")]
    NotFound(Uuid),

    #[error("subscription of user {0} is already cancelled")]
    AlreadyCancelled(Uuid),

    #[error("invoice range starts after it ends")]
    InvertedRange,

    #[error("checkout url is invalid: {0}")]
    CheckoutUrl(#[from] url::ParseError),
}

impl From<DomainError> for SubscriptionsError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound(_) => SubscriptionsError::NotFound,
            DomainError::AlreadyCancelled(_) => SubscriptionsError::AlreadyCancelled,
            DomainError::InvertedRange => {
                SubscriptionsError::InvalidRange("`from` must not be after `to`".to_owned())
            }
            DomainError::CheckoutUrl(err) => {
                tracing::error!(error = %err, "bad checkout url configuration");
                SubscriptionsError::Internal
            }
        }
    }
}
