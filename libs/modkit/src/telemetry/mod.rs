//! Logging setup shared by binaries and tests.

pub mod config;
pub mod init;

pub use config::{LogFormat, LoggingConfig};
pub use init::{build_env_filter, init_logging};
