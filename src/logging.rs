//! `tracing-subscriber` initialisation.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the binary. [`init`] installs a formatted subscriber on stderr whose
//! filter comes from `RUST_LOG`, falling back to the supplied directive.

use tracing_subscriber::EnvFilter;

/// Filter used when neither `RUST_LOG` nor configuration supplies one.
pub const DEFAULT_FILTER: &str = "info";

/// Builds the filter: `RUST_LOG` if set and valid, else `fallback`, else
/// [`DEFAULT_FILTER`].
pub fn env_filter(fallback: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback.unwrap_or(DEFAULT_FILTER)))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber. Fails if one is already installed.
pub fn init(fallback: Option<&str>) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(fallback))
        .with_writer(std::io::stderr)
        .try_init()
}
