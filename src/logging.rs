//! Tracing subscriber setup.
//!
//! Logs always go to stderr so that stdout stays reserved for command output.

use crate::constants::LOG_FORMAT_JSON;
use crate::errors::{AppError, AppResult};
use tracing_subscriber::EnvFilter;

/// Builds the level filter. `RUST_LOG` wins over `default_level`.
fn build_filter(default_level: &str) -> AppResult<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_level).map_err(|e| {
            AppError::Config(format!("Invalid log level '{}': {}", default_level, e))
        }),
    }
}

/// Installs the global tracing subscriber.
///
/// `format` is `json` for one JSON object per event, anything else selects
/// human-readable text. Calling this twice is an error from the subscriber
/// registry, reported as `AppError::Config`.
pub fn init_tracing(format: &str, default_level: &str) -> AppResult<()> {
    let filter = build_filter(default_level)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let result = if format == LOG_FORMAT_JSON {
        builder
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|e| AppError::Config(format!("Failed to initialise logging: {}", e)))
}
