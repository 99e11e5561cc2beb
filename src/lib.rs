//! Shadow-traffic routing node for a composable cache-proxy routing tree.
//!
//! The [`ShadowRoute`] node always forwards a request to its single primary
//! destination. Based on hot-reloadable [`ShadowSettings`] keyed on the
//! request's routing key, it additionally duplicates the request to zero or
//! more shadow destinations on detached tasks, never affecting the latency
//! or outcome of the primary reply. Nested nodes can observe the shadow
//! classification through the ambient [`RequestContext`] and adapt without
//! direct coupling.
//!
//! Trees are assembled at runtime from a JSON-like configuration document
//! via [`make_shadow_route`]; any type implementing [`RouteNode`] can sit
//! above or below a shadow router.

pub mod config;
pub mod context;
pub mod error;
pub mod observability;
pub mod request;
pub mod routing;

pub use config::factory::{
    make_shadow_route, make_shadow_route_with_children, RouteNodeProvider, SettingsRegistry,
};
pub use context::{is_shadow_traffic, RequestClass, RequestContext};
pub use error::{ConfigError, RouteError};
pub use request::Request;
pub use routing::node::{RouteHandle, RouteNode, RouteVisitor};
pub use routing::policy::{DefaultShadowPolicy, PostShadowReplyFn, ShadowPolicy};
pub use routing::settings::{ShadowKey, ShadowSelection, ShadowSettings};
pub use routing::shadow::{ShadowDestination, ShadowRoute};
