//! Logging setup for the console binary.
//!
//! Environment variables:
//! - `RUST_LOG`: log level/filter (e.g., "debug", "ferry=debug")
//! - `FERRY_LOG_FORMAT`: "pretty" (default) or "compact"

use tracing_subscriber::EnvFilter;

/// Log format configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format for development.
    Pretty,
    /// Compact single-line format.
    Compact,
}

impl LogFormat {
    /// Parse from the environment.
    pub fn from_env() -> Self {
        match std::env::var("FERRY_LOG_FORMAT").as_deref() {
            Ok("compact") => LogFormat::Compact,
            _ => LogFormat::Pretty,
        }
    }
}

/// Initialize the tracing subscriber.
///
/// Defaults to `info` when `RUST_LOG` is unset.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match LogFormat::from_env() {
        LogFormat::Pretty => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
        LogFormat::Compact => {
            tracing_subscriber::fmt()
                .compact()
                .with_env_filter(filter)
                .init();
        }
    }
}
