//! Ordered map used for the query parameter collection.
//!
//! Keys are sorted by default. With the `indexmap` feature enabled, keys keep
//! the order in which they were first inserted.

#[cfg(not(feature = "indexmap"))]
pub(crate) type Map<K, V> = std::collections::BTreeMap<K, V>;

#[cfg(feature = "indexmap")]
pub(crate) type Map<K, V> = indexmap::IndexMap<K, V>;

#[cfg(not(feature = "indexmap"))]
pub(crate) fn remove<V>(map: &mut Map<String, V>, key: &str) -> Option<V> {
    map.remove(key)
}

#[cfg(feature = "indexmap")]
pub(crate) fn remove<V>(map: &mut Map<String, V>, key: &str) -> Option<V> {
    map.shift_remove(key)
}
