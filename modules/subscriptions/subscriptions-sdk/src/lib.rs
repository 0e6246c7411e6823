//! Subscriptions SDK
//!
//! Contract of the billing capability registered under the `subscriptions`
//! service name, plus the subscription validity rule used by the access gate.

#![forbid(unsafe_code)]

pub mod api;
pub mod errors;
pub mod models;

pub use api::{SubscriptionsApi, SubscriptionsService};
pub use errors::SubscriptionsError;
pub use models::{
    Invoice, InvoiceRange, InvoiceStatus, SubscriptionLink, SubscriptionState, SubscriptionStatus,
    subscription_is_invalid,
};
