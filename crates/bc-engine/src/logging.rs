//! Structured logging setup.
//!
//! A thin wrapper over `tracing-subscriber`'s env-filter builder so binaries
//! and integration tests get the same default (`info`, overridable via
//! `RUST_LOG`) without repeating the boilerplate.

use tracing_subscriber::EnvFilter;

/// Install a global `tracing` subscriber reading its filter from `RUST_LOG`,
/// defaulting to `info` when unset. Safe to call more than once per process
/// (e.g. from multiple test modules) -- later calls are a no-op.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
