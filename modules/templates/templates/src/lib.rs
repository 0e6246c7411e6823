//! Templates module.

#![forbid(unsafe_code)]

pub use templates_sdk::*;

pub mod config;
pub mod domain;
pub mod infra;
pub mod local_client;
pub mod module;
mod ui;

pub use config::TemplatesConfig;
pub use local_client::TemplatesLocalClient;
pub use module::TemplatesModule;
