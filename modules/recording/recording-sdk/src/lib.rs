//! Recording SDK
//!
//! Contract of the `medical-api` service: audio transcription and report
//! generation from a transcription.

#![forbid(unsafe_code)]

pub mod api;
pub mod errors;
pub mod models;

pub use api::{MedicalApi, MedicalApiService};
pub use errors::MedicalError;
pub use models::{AudioFile, ProcessedReport, Report, ReportOptions, Transcription};
