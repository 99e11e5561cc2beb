//! Configuration schema for the shadow-node record.
//!
//! All types derive Serde traits and are deserialized from a JSON-like
//! configuration document.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Root record describing one shadow router node.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ShadowRouteConfig {
    /// Shadow target specifications, in dispatch order.
    pub shadows: Vec<ShadowTargetConfig>,

    /// Policy selector for the router. Absent means "default".
    pub policy: Option<String>,
}

/// One shadow target specification.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ShadowTargetConfig {
    /// Destination node as an inline definition handed to the node provider.
    pub target: Option<Value>,

    /// Sampling settings: an inline block, or the name of a registered
    /// settings object.
    pub settings: Option<SettingsRef>,
}

/// Reference to sampling settings, by registry name or inline.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum SettingsRef {
    Named(String),
    Inline(ShadowSettingsConfig),
}

/// Inline sampling settings block.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ShadowSettingsConfig {
    /// Explicit allow-list of (hash, key) pairs. A non-empty list takes
    /// precedence over any range.
    pub keys_to_shadow: Vec<ShadowKeyConfig>,

    /// Inclusive range over the 32-bit key hash. Mutually exclusive with
    /// `key_fraction_range`.
    pub key_range: Option<[u32; 2]>,

    /// Inclusive range expressed as fractions of the keyspace in
    /// `[0.0, 1.0]`, scaled onto the 32-bit hash space.
    pub key_fraction_range: Option<[f64; 2]>,
}

/// One allow-list entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ShadowKeyConfig {
    pub hash: u32,
    pub key: String,
}
