//! The shadow-traffic router node.
//!
//! Always routes to its single primary destination. In addition, when a
//! request's (hash, key) falls inside a destination's sampling settings, the
//! request is duplicated to that shadow destination on a detached task.
//! Shadow outcomes are invisible to the caller; settings may be swapped at
//! runtime by an external reload actor.
//!
//! # Design Decisions
//! - The primary reply is computed at most once per call, and eagerly only
//!   when a selected destination's policy demands delayed shadowing; every
//!   post-shadow callback in that call then observes the same reply
//! - Dispatch never suspends the caller: it schedules an independent task
//!   carrying the ambient context re-scoped with the shadow class
//! - Null destination halves are a configuration problem, not an error:
//!   they are reported and skipped

use std::sync::Arc;

use async_trait::async_trait;

use crate::context::{self, RequestClass, RequestContext};
use crate::error::RouteError;
use crate::observability::failure::{self, Category};
use crate::observability::metrics;
use crate::request::Request;
use crate::routing::node::{RouteHandle, RouteNode, RouteVisitor};
use crate::routing::policy::{PostShadowReplyFn, ShadowPolicy};
use crate::routing::settings::ShadowSettings;

/// One configured shadow target: a node handle and its sampling settings.
///
/// Either half may be absent when configuration degraded at build time; such
/// destinations are reported and skipped at routing time.
#[derive(Clone)]
pub struct ShadowDestination<R: Request> {
    pub node: Option<RouteHandle<R>>,
    pub settings: Option<Arc<ShadowSettings>>,
}

impl<R: Request> ShadowDestination<R> {
    pub fn new(node: RouteHandle<R>, settings: Arc<ShadowSettings>) -> Self {
        Self {
            node: Some(node),
            settings: Some(settings),
        }
    }
}

/// Shadow-traffic router node.
///
/// Immutable after construction; concurrent routing calls share it without
/// synchronization. Destination order is dispatch order.
pub struct ShadowRoute<R: Request, P> {
    normal: RouteHandle<R>,
    destinations: Vec<ShadowDestination<R>>,
    policy: P,
}

impl<R: Request, P: ShadowPolicy<R>> ShadowRoute<R, P> {
    pub fn new(normal: RouteHandle<R>, destinations: Vec<ShadowDestination<R>>, policy: P) -> Self {
        Self {
            normal,
            destinations,
            policy,
        }
    }

    /// The policy instance owned by this router.
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Route the shadow request on a detached task, classified as shadow
    /// traffic. Failures stay inside the task.
    fn dispatch_shadow_request(
        &self,
        shadow: RouteHandle<R>,
        req: R,
        post_reply: Option<PostShadowReplyFn<R>>,
    ) {
        let ctx = RequestContext::current()
            .unwrap_or_default()
            .with_class(RequestClass::SHADOW);
        tokio::spawn(context::scope(ctx, async move {
            match shadow.route(&req).await {
                Ok(reply) => {
                    metrics::record_shadow_dispatch("ok");
                    if let Some(post_reply) = post_reply {
                        post_reply(&reply);
                    }
                }
                Err(err) => {
                    metrics::record_shadow_dispatch("error");
                    tracing::warn!(node = shadow.name(), error = %err, "shadow request failed");
                }
            }
        }));
    }
}

/// Sampling decision for one destination. A missing settings reference is
/// reported as invalid configuration and never shadows.
fn should_shadow<R: Request>(req: &R, settings: Option<&ShadowSettings>) -> bool {
    let Some(settings) = settings else {
        failure::log(
            Category::InvalidConfig,
            "shadow destination has no sampling settings",
        );
        return false;
    };
    settings.snapshot().selects(req)
}

#[async_trait]
impl<R, P> RouteNode<R> for ShadowRoute<R, P>
where
    R: Request,
    P: ShadowPolicy<R> + 'static,
{
    fn name(&self) -> &'static str {
        "shadow"
    }

    async fn route(&self, req: &R) -> Result<R::Reply, RouteError> {
        let mut adjusted_req: Option<R> = None;
        let mut normal_reply: Option<R::Reply> = None;

        for destination in &self.destinations {
            if !should_shadow(req, destination.settings.as_deref()) {
                continue;
            }
            let Some(shadow) = destination.node.clone() else {
                failure::log(
                    Category::InvalidConfig,
                    "shadow destination has no route node",
                );
                continue;
            };

            let adjusted = adjusted_req
                .get_or_insert_with(|| self.policy.make_adjusted_normal_request(req));

            if normal_reply.is_none() && self.policy.should_delay_shadow() {
                normal_reply = Some(self.normal.route(adjusted).await?);
            }

            let shadow_req = self.policy.make_shadow_request(adjusted);
            let post_reply = normal_reply
                .as_ref()
                .and_then(|reply| self.policy.make_post_shadow_reply_fn(reply));
            self.dispatch_shadow_request(shadow, shadow_req, post_reply);
        }

        match normal_reply {
            Some(reply) => Ok(reply),
            None => self.normal.route(adjusted_req.as_ref().unwrap_or(req)).await,
        }
    }

    /// Visits the primary, then every present shadow node in order under the
    /// shadow classification. Sampling settings gate live routing only;
    /// traversal is exhaustive.
    fn traverse(&self, req: &R, visitor: &mut dyn RouteVisitor<R>) {
        visitor.visit(self.normal.as_ref(), req);
        context::sync_scope_with_class(RequestClass::SHADOW, || {
            for destination in &self.destinations {
                if let Some(node) = &destination.node {
                    visitor.visit(node.as_ref(), req);
                }
            }
        });
    }
}
