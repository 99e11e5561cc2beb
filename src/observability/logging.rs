//! Structured logging bootstrap.
//!
//! # Design Decisions
//! - Uses the tracing crate for structured logging
//! - Level taken from `RUST_LOG`, defaulting to `info`
//! - Safe to call more than once (later calls are no-ops)

use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber for binaries and tests embedding the routing
/// tree. Library code only emits events; it never installs a subscriber
/// implicitly.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
