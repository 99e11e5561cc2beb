//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request
//!     → ShadowRoute::route (shadow.rs)
//!     → per destination: sampling decision against ShadowSettings
//!       (settings.rs), request adjustment via the ShadowPolicy (policy.rs)
//!     → detached shadow dispatch into the task context
//!     → primary reply returned to the caller
//! ```
//!
//! # Design Decisions
//! - Nodes are immutable after construction; concurrent routing needs no locks
//! - Only the referenced sampling settings change at runtime, behind an
//!   atomic snapshot swap driven by an external reload actor
//! - Shadow outcomes are invisible to the caller on the success/failure axis

pub mod node;
pub mod policy;
pub mod settings;
pub mod shadow;

pub use node::{RouteHandle, RouteNode, RouteVisitor};
pub use policy::{DefaultShadowPolicy, PostShadowReplyFn, ShadowPolicy};
pub use settings::{ShadowKey, ShadowSelection, ShadowSettings};
pub use shadow::{ShadowDestination, ShadowRoute};
