//! Tracing subscriber setup shared by the server and the admin CLI.
//!
//! `LOG_FORMAT=json` switches to one JSON object per line with event fields
//! flattened, so effect lines keep their `entity`, `identity` and `action`
//! fields in log aggregation.

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over `default_filter` when set.
///
/// # Errors
///
/// Returns an error if the filter is invalid or a subscriber is already
/// installed.
pub fn init(default_filter: &str, format: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .with_context(|| format!("Invalid log filter '{default_filter}'"))?;

    let registry = tracing_subscriber::registry().with(filter);

    match format {
        "json" => registry
            .with(fmt::layer().json().with_target(true).flatten_event(true))
            .try_init(),
        _ => registry.with(fmt::layer().with_target(false)).try_init(),
    }
    .context("Failed to install tracing subscriber")?;

    Ok(())
}

/// Initialize logging for tests (with simpler output).
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("debug")
        .try_init();
}
