//! Configuration-invalid diagnostics channel.
//!
//! # Responsibilities
//! - Categorized, fire-and-forget failure reports from the routing path
//! - Delivery to the per-call diagnostics sink when a request context is
//!   installed; silent skip when none is
//!
//! # Design Decisions
//! - Exactly one sink emission per occurrence when a context carries a sink,
//!   zero otherwise; a tracing event and a counter are recorded either way
//! - Sinks must never block or fail back into the caller

use crate::context::RequestContext;
use crate::observability::metrics;

/// Category attached to every diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Malformed or missing routing configuration.
    InvalidConfig,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::InvalidConfig => "invalid_config",
        }
    }
}

/// Receives (category, message) diagnostics. Implementations must not block.
pub trait DiagnosticsSink: Send + Sync {
    fn emit(&self, category: Category, message: &str);
}

/// Report a failure on the shared request context, when one is available.
pub fn log(category: Category, message: &str) {
    tracing::warn!(category = category.as_str(), message, "routing failure");
    metrics::record_failure(category.as_str());
    if let Some(ctx) = RequestContext::current() {
        if let Some(sink) = ctx.sink() {
            sink.emit(category, message);
        }
    }
}
