//! Shadow policy strategy.
//!
//! The policy decides how the primary request is adjusted, whether the
//! primary reply must exist before shadows are dispatched, what is actually
//! sent to a shadow destination, and whether the shadow's reply is observed.

use crate::request::Request;

/// Callback observing a shadow destination's reply, bound to the primary
/// reply it is compared against.
pub type PostShadowReplyFn<R> = Box<dyn FnOnce(&<R as Request>::Reply) + Send>;

/// Strategy hooks consulted by the shadow router while routing.
///
/// One instance is held by value per router and may keep its own state; it
/// is never shared across router instances.
pub trait ShadowPolicy<R: Request>: Send + Sync {
    /// The request actually sent to the primary destination, derived from
    /// the original. Called at most once per routing call. Identity by
    /// default.
    fn make_adjusted_normal_request(&self, req: &R) -> R {
        req.clone()
    }

    /// Whether the primary reply must be computed before any shadow in the
    /// current call is dispatched. A pure, per-request-type decision.
    fn should_delay_shadow(&self) -> bool {
        false
    }

    /// The request sent to a shadow destination, derived from the adjusted
    /// primary request. Forwards unchanged by default.
    fn make_shadow_request(&self, adjusted: &R) -> R {
        adjusted.clone()
    }

    /// Optional observer for a shadow reply, bound to the primary reply.
    /// Only consulted when the primary reply was computed eagerly. None by
    /// default.
    fn make_post_shadow_reply_fn(&self, normal_reply: &R::Reply) -> Option<PostShadowReplyFn<R>> {
        let _ = normal_reply;
        None
    }
}

/// Policy that shadows requests verbatim: no adjustment, no delay, no reply
/// observation.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultShadowPolicy;

impl<R: Request> ShadowPolicy<R> for DefaultShadowPolicy {}
