//! Installs the global `tracing` subscriber.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use super::config::{LogFormat, LoggingConfig};

/// `RUST_LOG` when set, otherwise the configured directives, otherwise `info`.
#[must_use]
pub fn build_env_filter(cfg: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the process-wide subscriber.
///
/// Calling it twice is harmless: the second attempt is reported and ignored.
pub fn init_logging(cfg: &LoggingConfig) {
    let filter = build_env_filter(cfg);
    let ansi = cfg.ansi && std::env::var_os("NO_COLOR").is_none();

    let result = match cfg.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(cfg.with_target))
            .try_init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(cfg.with_target)
                    .with_ansi(ansi),
            )
            .try_init(),
    };

    if let Err(e) = result {
        tracing::warn!(error = %e, "logging already initialized");
    }
}
