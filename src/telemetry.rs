//! # Telemetry
//!
//! Global tracing subscriber setup.

use crate::config::LoggingConfig;
use std::error::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::SubscriberBuilder;

/// Builds the event filter: `RUST_LOG` when set and valid, otherwise the
/// configured level.
#[must_use]
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Installs the global subscriber, emitting JSON lines when configured.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), Box<dyn Error + Send + Sync>> {
    let builder = SubscriberBuilder::default()
        .with_env_filter(env_filter(config))
        .with_target(true);

    if config.json {
        builder.json().with_current_span(true).try_init()
    } else {
        builder.with_line_number(true).try_init()
    }
}
