//! Metrics for shadow routing.
//!
//! # Metrics
//! - `shadow_route_dispatch_total` (counter): detached shadow dispatches by
//!   outcome (`ok` / `error`)
//! - `shadow_route_failures_total` (counter): diagnostics by category
//!
//! # Design Decisions
//! - Low-overhead counter updates only; no histograms on the shadow path
//! - Label cardinality is fixed (outcome, category)

use metrics::counter;

/// Record a detached shadow dispatch and its eventual outcome.
pub fn record_shadow_dispatch(outcome: &'static str) {
    counter!("shadow_route_dispatch_total", "outcome" => outcome).increment(1);
}

/// Record one diagnostics emission.
pub fn record_failure(category: &'static str) {
    counter!("shadow_route_failures_total", "category" => category).increment(1);
}
