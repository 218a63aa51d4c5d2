//! Logging for the provisioning engine.
//!
//! Structured console logging via `tracing`, filterable through the
//! standard `RUST_LOG` environment variable.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initialize console logging.
///
/// Respects `RUST_LOG`; defaults to `info` when unset. Safe to call once at
/// startup; a second call returns an error from the global registry.
///
/// # Errors
///
/// Returns error if a global subscriber is already installed.
pub fn init_logging() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    Ok(())
}
