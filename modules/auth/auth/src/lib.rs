//! Auth module.
//!
//! Registers the `oauth` service (an in-memory account store), the
//! `/auth/*` pages and the account settings page.

#![forbid(unsafe_code)]

pub use auth_sdk::*;

pub mod config;
pub mod domain;
pub mod local_client;
pub mod module;
mod ui;

pub use config::AuthConfig;
pub use domain::service::AuthService;
pub use local_client::AuthLocalClient;
pub use module::AuthModule;
