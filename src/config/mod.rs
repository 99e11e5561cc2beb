//! Configuration subsystem.
//!
//! # Data Flow
//! ```text
//! JSON-like document (serde_json::Value)
//!     → schema.rs (deserialize into typed records)
//!     → validation.rs (semantic checks, all errors reported)
//!     → factory.rs (materialize nodes & settings, degrade per-destination)
//!     → ShadowRoute handle
//! ```
//!
//! # Design Decisions
//! - Syntactic problems are serde's; semantic checks are a separate pure pass
//! - A broken shadow target never fails construction of the router: the
//!   destination is kept with a null half and skipped at routing time, with a
//!   diagnostic on the invalid-config channel
//! - Settings may be shared across destinations and routers by registering
//!   them under a name

pub mod factory;
pub mod schema;
pub mod validation;

pub use factory::{
    make_shadow_route, make_shadow_route_with_children, RouteNodeProvider, SettingsRegistry,
};
pub use schema::{SettingsRef, ShadowKeyConfig, ShadowRouteConfig, ShadowSettingsConfig, ShadowTargetConfig};
pub use validation::ValidationError;
