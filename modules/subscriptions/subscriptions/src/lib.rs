//! Subscriptions module.

#![forbid(unsafe_code)]

pub use subscriptions_sdk::*;

pub mod config;
pub mod domain;
pub mod local_client;
pub mod module;
mod ui;

pub use config::SubscriptionsConfig;
pub use domain::service::BillingService;
pub use local_client::SubscriptionsLocalClient;
pub use module::SubscriptionsModule;
