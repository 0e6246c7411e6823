//! Dashboard module: registers `/app/dashboard`, the page users land on after
//! signing in.

#![forbid(unsafe_code)]

pub mod config;
pub mod module;
mod ui;

pub use config::DashboardConfig;
pub use module::DashboardModule;
