//! Identity-keyed resource cache.
//!
//! One [`ResourceCache`] backs each of the renderer's GPU resource kinds
//! (programs, vertex arrays, textures). Entries are created lazily through
//! [`ResourceCache::get_or_try_insert_with`] and live as long as the cache.

use std::{
    collections::{HashMap, hash_map::Entry},
    hash::Hash,
};

#[derive(Debug)]
pub struct ResourceCache<K, V> {
    entries: HashMap<K, V>,
}

impl<K: Eq + Hash, V> ResourceCache<K, V> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Stores `value` under `key`, returning whatever it displaced.
    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        self.entries.insert(key, value)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Removes the entry for `key` so the next lookup rebuilds it.
    pub fn invalidate(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key)
    }

    /// Returns the cached value for `key`, building and storing it first if
    /// absent. If `build` fails nothing is stored and the error is returned.
    pub fn get_or_try_insert_with<E>(
        &mut self,
        key: K,
        build: impl FnOnce() -> Result<V, E>,
    ) -> Result<&V, E> {
        match self.entries.entry(key) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => Ok(entry.insert(build()?)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Eq + Hash, V> Default for ResourceCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn builds_once_per_key() {
        let mut cache = ResourceCache::new();
        let builds = Cell::new(0);
        let build = || {
            builds.set(builds.get() + 1);
            Ok::<_, ()>(builds.get() * 10)
        };

        assert_eq!(cache.get_or_try_insert_with("a", build), Ok(&10));
        assert_eq!(cache.get_or_try_insert_with("a", build), Ok(&10));
        assert_eq!(cache.get_or_try_insert_with("b", build), Ok(&20));
        assert_eq!(builds.get(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn failed_build_leaves_no_entry() {
        let mut cache: ResourceCache<u32, u32> = ResourceCache::new();
        assert_eq!(cache.get_or_try_insert_with(1, || Err("boom")), Err("boom"));
        assert!(!cache.contains_key(&1));
        assert_eq!(cache.get_or_try_insert_with(1, || Ok::<_, &str>(5)), Ok(&5));
    }

    #[test]
    fn invalidate_forces_rebuild() {
        let mut cache = ResourceCache::new();
        cache.set(7, "old");
        assert_eq!(cache.invalidate(&7), Some("old"));
        assert!(cache.is_empty());
        assert_eq!(
            cache.get_or_try_insert_with(7, || Ok::<_, ()>("new")),
            Ok(&"new")
        );
        assert_eq!(cache.set(7, "newer"), Some("new"));
    }
}
