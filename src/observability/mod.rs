//! Observability subsystem.
//!
//! # Responsibilities
//! - Structured logging bootstrap (logging.rs)
//! - Counters for shadow dispatch and configuration failures (metrics.rs)
//! - The configuration-invalid diagnostics channel (failure.rs)
//!
//! # Design Decisions
//! - All emission is fire-and-forget; nothing here blocks the routing path
//! - Metrics go through the `metrics` facade; installing an exporter is the
//!   embedding application's concern

pub mod failure;
pub mod logging;
pub mod metrics;
