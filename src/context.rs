//! Ambient per-call routing context.
//!
//! # Data Flow
//! ```text
//! caller installs RequestContext (scope)
//!     → nodes read it anywhere in the call tree (current, is_shadow_traffic)
//!     → shadow dispatch re-scopes a spawned task with the SHADOW class
//!     → traversal re-scopes synchronously for the shadow subtree
//! ```
//!
//! # Design Decisions
//! - Carried in a tokio task-local; restored on all exit paths by scoping
//! - Absence of a context never crashes: lookups are `try_with`-based
//! - The context is a small cheaply-cloned value; re-scoping clones it

use std::future::Future;
use std::sync::Arc;

use uuid::Uuid;

use crate::observability::failure::DiagnosticsSink;

/// Classification bits attached to a request for the duration of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequestClass(u32);

impl RequestClass {
    /// No classification.
    pub const NORMAL: RequestClass = RequestClass(0);

    /// The request is shadow traffic duplicated off a primary path.
    pub const SHADOW: RequestClass = RequestClass(1 << 0);

    /// This class with the bits of `other` added.
    pub fn with(self, other: RequestClass) -> RequestClass {
        RequestClass(self.0 | other.0)
    }

    /// Whether every bit of `other` is set.
    pub fn contains(self, other: RequestClass) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_shadow(self) -> bool {
        self.contains(RequestClass::SHADOW)
    }
}

/// Per-call context reachable from anywhere in the routing call tree.
#[derive(Clone)]
pub struct RequestContext {
    class: RequestClass,
    sink: Option<Arc<dyn DiagnosticsSink>>,
    id: Uuid,
}

tokio::task_local! {
    static CONTEXT: RequestContext;
}

impl RequestContext {
    /// Fresh unclassified context with a new correlation id.
    pub fn new() -> Self {
        Self {
            class: RequestClass::NORMAL,
            sink: None,
            id: Uuid::new_v4(),
        }
    }

    /// Attach a diagnostics sink for configuration-invalid reports.
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticsSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// This context with `class` added to its classification.
    pub fn with_class(mut self, class: RequestClass) -> Self {
        self.class = self.class.with(class);
        self
    }

    pub fn class(&self) -> RequestClass {
        self.class
    }

    pub fn sink(&self) -> Option<&Arc<dyn DiagnosticsSink>> {
        self.sink.as_ref()
    }

    /// Correlation id shared by the primary call and its shadow tasks.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Clone of the context governing the current task, if one is installed.
    pub fn current() -> Option<RequestContext> {
        CONTEXT.try_with(Clone::clone).ok()
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Run `fut` with `ctx` installed as the ambient context.
pub async fn scope<F: Future>(ctx: RequestContext, fut: F) -> F::Output {
    CONTEXT.scope(ctx, fut).await
}

/// Run `f` with the current context re-scoped to include `class`.
///
/// The previous context is restored when `f` returns or panics. When no
/// context is installed a fresh one is created for the duration of `f`.
pub fn sync_scope_with_class<T>(class: RequestClass, f: impl FnOnce() -> T) -> T {
    let ctx = RequestContext::current()
        .unwrap_or_default()
        .with_class(class);
    CONTEXT.sync_scope(ctx, f)
}

/// Whether the current task is classified as shadow traffic.
pub fn is_shadow_traffic() -> bool {
    CONTEXT
        .try_with(|ctx| ctx.class.is_shadow())
        .unwrap_or(false)
}
