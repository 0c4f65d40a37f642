//! Fast hash map and hash set type aliases.
//!
//! The component registry and the cache map are keyed by short strings
//! (component names, file paths) and never see untrusted keys, so the Fx
//! hasher from `rustc-hash` is used instead of the default SipHash.
//!
//! # Examples
//!
//! ```
//! use hy_core::{FxHashMap, FxHashSet, fx_hash_map, fx_hash_set};
//!
//! let mut names: FxHashSet<&str> = fx_hash_set();
//! names.insert("Button");
//!
//! let map: FxHashMap<&str, u32> = fx_hash_map();
//! assert!(map.is_empty());
//! ```

/// A [`HashMap`](std::collections::HashMap) using the Fx hash algorithm.
pub type FxHashMap<K, V> = rustc_hash::FxHashMap<K, V>;

/// A [`HashSet`](std::collections::HashSet) using the Fx hash algorithm.
pub type FxHashSet<V> = rustc_hash::FxHashSet<V>;

/// Creates a new empty [`FxHashMap`].
#[inline]
#[must_use]
pub fn fx_hash_map<K, V>() -> FxHashMap<K, V> {
    FxHashMap::default()
}

/// Creates a new empty [`FxHashSet`].
#[inline]
#[must_use]
pub fn fx_hash_set<V>() -> FxHashSet<V> {
    FxHashSet::default()
}
