//! The polymorphic route node seam.
//!
//! # Design Decisions
//! - Object-safe async trait so heterogeneous trees can be assembled from
//!   configuration at runtime and shared via `Arc`
//! - Traversal is synchronous and issues no real requests; it exists for
//!   configuration validation and dependency discovery

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::RouteError;
use crate::request::Request;

/// A node of the request-routing tree.
///
/// Every variant (pools, failover chains, shadow routers, ...) is
/// substitutable anywhere a node is expected.
#[async_trait]
pub trait RouteNode<R: Request>: Send + Sync + 'static {
    /// Short static name of the node kind, used in diagnostics.
    fn name(&self) -> &'static str;

    /// Route a request, producing exactly one reply or this node's failure.
    async fn route(&self, req: &R) -> Result<R::Reply, RouteError>;

    /// Dry-run visit of this node's children. Leaf nodes visit nothing,
    /// which is the default.
    fn traverse(&self, req: &R, visitor: &mut dyn RouteVisitor<R>) {
        let _ = (req, visitor);
    }
}

/// Shared ownership handle to a route node.
pub type RouteHandle<R> = Arc<dyn RouteNode<R>>;

/// Visitor for [`RouteNode::traverse`].
///
/// Recursion is the visitor's choice: call `traverse` on the visited node to
/// descend into its subtree.
pub trait RouteVisitor<R: Request> {
    fn visit(&mut self, node: &dyn RouteNode<R>, req: &R);
}
