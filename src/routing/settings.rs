//! Sampling settings controlling which requests are shadowed.
//!
//! # Responsibilities
//! - Hold one generation of selection data (allow-list or hash range)
//! - Answer "does this generation select this request"
//! - Let an external reload actor swap generations at runtime
//!
//! # Design Decisions
//! - Selection data sits behind an atomic pointer swap (`ArcSwap`); a single
//!   routing decision reads exactly one generation, so the allow-list and
//!   range can never be observed from different reloads
//! - A non-empty allow-list strictly takes precedence over the range
//! - The allow-list is kept sorted by (hash, key bytes) so membership is a
//!   binary search

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::config::schema::ShadowSettingsConfig;
use crate::config::validation::{validate_settings, ValidationError};
use crate::request::Request;

/// One allow-list entry: a routing-key hash and the key bytes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ShadowKey {
    pub hash: u32,
    pub key: Vec<u8>,
}

impl ShadowKey {
    pub fn new(hash: u32, key: impl Into<Vec<u8>>) -> Self {
        Self {
            hash,
            key: key.into(),
        }
    }
}

/// One immutable generation of selection data.
#[derive(Debug, Clone)]
pub struct ShadowSelection {
    keys_to_shadow: Vec<ShadowKey>,
    key_range: (u32, u32),
}

impl ShadowSelection {
    /// Range-mode selection over the inclusive hash interval `[low, high]`.
    pub fn from_range(low: u32, high: u32) -> Self {
        Self {
            keys_to_shadow: Vec::new(),
            key_range: (low, high),
        }
    }

    /// Allow-list selection. Entries are sorted and deduplicated on entry.
    pub fn from_keys(mut keys: Vec<ShadowKey>) -> Self {
        keys.sort();
        keys.dedup();
        Self {
            keys_to_shadow: keys,
            key_range: (0, 0),
        }
    }

    pub fn keys_to_shadow(&self) -> &[ShadowKey] {
        &self.keys_to_shadow
    }

    pub fn key_range(&self) -> (u32, u32) {
        self.key_range
    }

    /// Whether this generation selects `req` for shadowing.
    ///
    /// A non-empty allow-list decides by exact (hash, key) membership; the
    /// range is consulted only when the list is empty.
    pub fn selects<R: Request>(&self, req: &R) -> bool {
        let hash = req.routing_key_hash();
        if !self.keys_to_shadow.is_empty() {
            let key = req.routing_key();
            return self
                .keys_to_shadow
                .binary_search_by(|entry| (entry.hash, entry.key.as_slice()).cmp(&(hash, key)))
                .is_ok();
        }
        let (low, high) = self.key_range;
        low <= hash && hash <= high
    }
}

/// Reloadable sampling settings shared between routers and the external
/// reload actor.
///
/// Routers only read; the actor replaces whole generations with [`store`].
/// No locking anywhere.
///
/// [`store`]: ShadowSettings::store
pub struct ShadowSettings {
    selection: ArcSwap<ShadowSelection>,
}

impl ShadowSettings {
    pub fn new(selection: ShadowSelection) -> Arc<Self> {
        Arc::new(Self {
            selection: ArcSwap::from_pointee(selection),
        })
    }

    /// Build settings from a config block, reporting every semantic error.
    pub fn from_config(config: &ShadowSettingsConfig) -> Result<Arc<Self>, Vec<ValidationError>> {
        validate_settings(config)?;
        Ok(Self::new(selection_from_config(config)))
    }

    /// One consistent snapshot of the current generation.
    pub fn snapshot(&self) -> Arc<ShadowSelection> {
        self.selection.load_full()
    }

    /// Atomically replace the selection with a new generation.
    pub fn store(&self, selection: ShadowSelection) {
        self.selection.store(Arc::new(selection));
    }
}

/// Map a validated config block onto selection data. Fractional ranges are
/// scaled onto the 32-bit hash space, both ends inclusive.
fn selection_from_config(config: &ShadowSettingsConfig) -> ShadowSelection {
    if !config.keys_to_shadow.is_empty() {
        return ShadowSelection::from_keys(
            config
                .keys_to_shadow
                .iter()
                .map(|entry| ShadowKey::new(entry.hash, entry.key.as_bytes()))
                .collect(),
        );
    }
    if let Some([low, high]) = config.key_range {
        return ShadowSelection::from_range(low, high);
    }
    if let Some([start, end]) = config.key_fraction_range {
        let scale = |fraction: f64| (fraction * f64::from(u32::MAX)) as u32;
        return ShadowSelection::from_range(scale(start), scale(end));
    }
    ShadowSelection::from_range(0, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::ShadowKeyConfig;

    #[derive(Clone)]
    struct Req {
        key: Vec<u8>,
        hash: u32,
    }

    impl Req {
        fn new(key: &str, hash: u32) -> Self {
            Self {
                key: key.as_bytes().to_vec(),
                hash,
            }
        }
    }

    impl Request for Req {
        type Reply = ();

        fn routing_key(&self) -> &[u8] {
            &self.key
        }

        fn routing_key_hash(&self) -> u32 {
            self.hash
        }
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let selection = ShadowSelection::from_range(10, 100);
        assert!(selection.selects(&Req::new("k", 10)));
        assert!(selection.selects(&Req::new("k", 100)));
        assert!(selection.selects(&Req::new("k", 55)));
        assert!(!selection.selects(&Req::new("k", 9)));
        assert!(!selection.selects(&Req::new("k", 101)));
    }

    #[test]
    fn allow_list_matches_exact_hash_and_key() {
        let selection = ShadowSelection::from_keys(vec![
            ShadowKey::new(20, "b".as_bytes()),
            ShadowKey::new(10, "a".as_bytes()),
        ]);
        assert!(selection.selects(&Req::new("a", 10)));
        assert!(selection.selects(&Req::new("b", 20)));
        // Same hash, different key bytes.
        assert!(!selection.selects(&Req::new("c", 20)));
        // Same key, different hash.
        assert!(!selection.selects(&Req::new("b", 21)));
    }

    #[test]
    fn allow_list_orders_by_hash_then_key_bytes() {
        let selection = ShadowSelection::from_keys(vec![
            ShadowKey::new(5, "zz".as_bytes()),
            ShadowKey::new(5, "aa".as_bytes()),
            ShadowKey::new(1, "mm".as_bytes()),
        ]);
        let keys = selection.keys_to_shadow();
        assert_eq!(keys[0], ShadowKey::new(1, "mm".as_bytes()));
        assert_eq!(keys[1], ShadowKey::new(5, "aa".as_bytes()));
        assert_eq!(keys[2], ShadowKey::new(5, "zz".as_bytes()));
        for key in keys {
            let req = Req {
                key: key.key.clone(),
                hash: key.hash,
            };
            assert!(selection.selects(&req));
        }
    }

    #[test]
    fn non_empty_allow_list_takes_precedence_over_range() {
        let config = ShadowSettingsConfig {
            keys_to_shadow: vec![ShadowKeyConfig {
                hash: 10,
                key: "a".into(),
            }],
            key_range: Some([0, u32::MAX]),
            key_fraction_range: None,
        };
        let settings = ShadowSettings::from_config(&config).unwrap();
        let selection = settings.snapshot();
        // In range, but not in the list.
        assert!(!selection.selects(&Req::new("z", 500)));
        assert!(selection.selects(&Req::new("a", 10)));
    }

    #[test]
    fn fraction_range_scales_onto_hash_space() {
        let config = ShadowSettingsConfig {
            keys_to_shadow: Vec::new(),
            key_range: None,
            key_fraction_range: Some([0.0, 1.0]),
        };
        let settings = ShadowSettings::from_config(&config).unwrap();
        assert_eq!(settings.snapshot().key_range(), (0, u32::MAX));
    }

    #[test]
    fn store_swaps_whole_generations() {
        let settings = ShadowSettings::new(ShadowSelection::from_range(0, 0));
        assert!(!settings.snapshot().selects(&Req::new("k", 50)));

        settings.store(ShadowSelection::from_range(0, 100));
        assert!(settings.snapshot().selects(&Req::new("k", 50)));

        // A snapshot taken before the swap still answers from its own
        // generation.
        let old = settings.snapshot();
        settings.store(ShadowSelection::from_range(200, 300));
        assert!(old.selects(&Req::new("k", 50)));
        assert!(!settings.snapshot().selects(&Req::new("k", 50)));
    }
}
