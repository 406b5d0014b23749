//! Tracing/logging initialization.
//!
//! Batch runs log one structured summary line per batch; `RUST_LOG` scopes
//! what else gets through.

use tracing_subscriber::EnvFilter;

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // JSON logs + timestamps, configurable via RUST_LOG.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}
