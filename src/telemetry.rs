//! Tracing subscriber setup for the CLI

use tracing_subscriber::EnvFilter;

use crate::config::AwarenessConfig;
use crate::errors::{AwarenessError, Result};

/// Install a compact fmt subscriber. `RUST_LOG` wins over the configured filter.
pub fn init(config: &AwarenessConfig) -> Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_filter).map_err(|err| {
            AwarenessError::TelemetryError {
                message: format!("invalid log filter '{}': {}", config.log_filter, err),
            }
        })?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|err| AwarenessError::TelemetryError {
            message: err.to_string(),
        })
}
