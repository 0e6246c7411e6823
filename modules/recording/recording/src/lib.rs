//! Recording module.
//!
//! Registers the `medical-api` service, an HTTP client for the transcription
//! and report backend, and the `/app/recording` page.

#![forbid(unsafe_code)]

pub use recording_sdk::*;

pub mod config;
pub mod infra;
pub mod module;
mod ui;

pub use config::RecordingConfig;
pub use infra::MedicalHttpClient;
pub use module::RecordingModule;
