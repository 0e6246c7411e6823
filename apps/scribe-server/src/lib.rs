//! Scribe server: hosts the shell pages and form actions over HTTP.

#![forbid(unsafe_code)]

pub mod config;
pub mod registered_modules;
pub mod state;
pub mod web;

pub use config::AppConfig;
pub use state::AppState;
pub use web::router;
