//! Request/reply contract for the routing tree.
//!
//! # Design Decisions
//! - One reply type per request type, expressed as an associated type
//! - Routing key exposed as raw bytes; protocols decide the encoding
//! - The hash is precomputed by the codec and must be stable for the
//!   lifetime of the routing call

/// A routable key-value request.
///
/// Implementations are opaque to the routing tree: nodes only inspect the
/// routing key and its hash. Both accessors must be side-effect-free and
/// return the same answer for the duration of a routing call.
pub trait Request: Clone + Send + Sync + 'static {
    /// The reply produced for this request type.
    type Reply: Clone + Send + 'static;

    /// The routing key as raw bytes.
    fn routing_key(&self) -> &[u8];

    /// A stable 32-bit hash of the routing key.
    fn routing_key_hash(&self) -> u32;
}
