//! Lock-striped map safe for concurrent use from many threads.
//!
//! [`ConcurrentMap`] splits its entries across a fixed number of shards,
//! each an `IndexMap` behind its own `Mutex`. A key always hashes to the
//! same shard, so single-key operations lock exactly one shard and never
//! wait on another. The map is initialized at construction and has no nil
//! state.

use std::borrow::Borrow;
use std::collections::hash_map::RandomState;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::ops::ControlFlow;
use std::sync::{Mutex, MutexGuard, PoisonError};

use indexmap::IndexMap;

type Shard<K, V> = Mutex<IndexMap<K, V>>;

/// A thread-safe key-value store.
///
/// All operations take `&self` and may be called concurrently from any
/// number of threads; share the map with `Arc` or scoped threads.
/// [`range`](ConcurrentMap::range) gives no snapshot guarantee: entries
/// inserted or removed while it runs may or may not be visited.
pub struct ConcurrentMap<K, V> {
    shards: Box<[Shard<K, V>]>,
    hasher: RandomState,
}

// Compile-time assertion: ConcurrentMap must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<ConcurrentMap<String, u64>>();
};

impl<K, V> ConcurrentMap<K, V> {
    /// Default number of lock shards.
    pub const DEFAULT_SHARD_COUNT: usize = 16;

    /// Create an empty map with [`DEFAULT_SHARD_COUNT`](Self::DEFAULT_SHARD_COUNT)
    /// shards.
    pub fn new() -> Self {
        Self::with_shard_count(Self::DEFAULT_SHARD_COUNT)
    }

    /// Create an empty map with `shard_count` independently locked shards.
    ///
    /// # Panics
    ///
    /// Panics if `shard_count == 0`.
    pub fn with_shard_count(shard_count: usize) -> Self {
        assert!(
            shard_count >= 1,
            "ConcurrentMap shard count must be >= 1, got {shard_count}"
        );
        let shards = (0..shard_count)
            .map(|_| Mutex::new(IndexMap::new()))
            .collect();
        tracing::debug!(shard_count, "concurrent map created");
        Self {
            shards,
            hasher: RandomState::new(),
        }
    }

    /// Number of lock shards.
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Total number of entries.
    ///
    /// Shards are counted one after another, so under concurrent writes
    /// the result may not match any single instant.
    pub fn len(&self) -> usize {
        (0..self.shards.len()).map(|i| self.lock(i).len()).sum()
    }

    /// Whether every shard is empty.
    pub fn is_empty(&self) -> bool {
        (0..self.shards.len()).all(|i| self.lock(i).is_empty())
    }

    /// Remove every entry, one shard at a time.
    pub fn clear(&self) {
        for i in 0..self.shards.len() {
            self.lock(i).clear();
        }
    }

    /// Lock shard `index`, recovering the data if a previous holder
    /// panicked. Every mutation leaves a shard's `IndexMap` consistent, so
    /// a poisoned shard is still usable.
    fn lock(&self, index: usize) -> MutexGuard<'_, IndexMap<K, V>> {
        self.shards[index]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn shard_of<Q: Hash + ?Sized>(&self, key: &Q) -> usize {
        (self.hasher.hash_one(key) % self.shards.len() as u64) as usize
    }
}

impl<K: Hash + Eq, V> ConcurrentMap<K, V> {
    /// Insert or overwrite `key`.
    pub fn set(&self, key: K, value: V) {
        let shard = self.shard_of(&key);
        self.lock(shard).insert(key, value);
    }

    /// Insert or overwrite `key`, returning the previous value.
    pub fn swap(&self, key: K, value: V) -> Option<V> {
        let shard = self.shard_of(&key);
        self.lock(shard).insert(key, value)
    }

    /// Remove `key`. No-op if absent.
    pub fn delete<Q>(&self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.load_and_delete(key);
    }

    /// Remove `key`, returning the value it held.
    pub fn load_and_delete<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let shard = self.shard_of(key);
        self.lock(shard).swap_remove(key)
    }

    /// Whether `key` is present.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let shard = self.shard_of(key);
        self.lock(shard).contains_key(key)
    }
}

impl<K: Hash + Eq, V: Clone> ConcurrentMap<K, V> {
    /// Look up `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let shard = self.shard_of(key);
        self.lock(shard).get(key).cloned()
    }

    /// Return the existing value for `key`, or store `value` and return it.
    ///
    /// The flag is `true` when the value was already present.
    pub fn load_or_store(&self, key: K, value: V) -> (V, bool) {
        let shard = self.shard_of(&key);
        let mut entries = self.lock(shard);
        match entries.get(&key) {
            Some(existing) => (existing.clone(), true),
            None => {
                entries.insert(key, value.clone());
                (value, false)
            }
        }
    }
}

impl<K: Hash + Eq + Clone, V: Clone> ConcurrentMap<K, V> {
    /// Visit entries until `visit` returns [`ControlFlow::Break`].
    ///
    /// Each shard is copied under its lock and visited after the lock is
    /// released, so `visit` may call back into the map. Order is
    /// unspecified.
    pub fn range(&self, mut visit: impl FnMut(&K, &V) -> ControlFlow<()>) {
        for i in 0..self.shards.len() {
            let batch: Vec<(K, V)> = self
                .lock(i)
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            for (key, value) in &batch {
                if visit(key, value).is_break() {
                    return;
                }
            }
        }
    }
}

impl<K, V> Default for ConcurrentMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for ConcurrentMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcurrentMap")
            .field("shards", &self.shards.len())
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn store_load_range() {
        let map = ConcurrentMap::new();
        map.set("key1".to_string(), 123);
        map.set("key2".to_string(), 456);
        map.set("key3".to_string(), 789);
        assert_eq!(map.get("key1"), Some(123));
        assert_eq!(map.get("missing"), None);

        let mut seen = Vec::new();
        map.range(|k, v| {
            seen.push((k.clone(), *v));
            ControlFlow::Continue(())
        });
        seen.sort();
        assert_eq!(
            seen,
            vec![
                ("key1".to_string(), 123),
                ("key2".to_string(), 456),
                ("key3".to_string(), 789)
            ]
        );
    }

    #[test]
    fn range_stops_on_break() {
        let map = ConcurrentMap::with_shard_count(4);
        for i in 0..100 {
            map.set(i, i);
        }
        let mut visited = 0;
        map.range(|_, _| {
            visited += 1;
            if visited == 10 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert_eq!(visited, 10);
    }

    #[test]
    fn range_visitor_may_write() {
        let map = ConcurrentMap::with_shard_count(1);
        map.set(1u32, 10u32);
        map.set(2, 20);
        map.range(|k, v| {
            map.set(*k, v + 1);
            map.set(k + 100, 0);
            ControlFlow::Continue(())
        });
        assert_eq!(map.get(&1), Some(11));
        assert_eq!(map.get(&2), Some(21));
        assert_eq!(map.len(), 4);
    }

    #[test]
    fn delete_absent_is_noop() {
        let map: ConcurrentMap<u8, u8> = ConcurrentMap::default();
        map.delete(&1);
        map.set(1, 1);
        map.delete(&1);
        assert!(map.is_empty());
    }

    #[test]
    fn load_or_store_keeps_first() {
        let map = ConcurrentMap::new();
        assert_eq!(map.load_or_store("a", 1), (1, false));
        assert_eq!(map.load_or_store("a", 2), (1, true));
        assert_eq!(map.get("a"), Some(1));
    }

    #[test]
    fn swap_and_load_and_delete() {
        let map = ConcurrentMap::new();
        assert_eq!(map.swap(7, "x"), None);
        assert_eq!(map.swap(7, "y"), Some("x"));
        assert_eq!(map.load_and_delete(&7), Some("y"));
        assert_eq!(map.load_and_delete(&7), None);
        assert!(!map.contains_key(&7));
    }

    #[test]
    fn clear_empties_all_shards() {
        let map = ConcurrentMap::with_shard_count(3);
        for i in 0..30 {
            map.set(i, ());
        }
        assert_eq!(map.len(), 30);
        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.shard_count(), 3);
    }

    #[test]
    #[should_panic(expected = "shard count must be >= 1")]
    fn zero_shards_rejected() {
        let _ = ConcurrentMap::<u8, u8>::with_shard_count(0);
    }

    #[test]
    fn poisoned_shard_is_recovered() {
        let map = Arc::new(ConcurrentMap::with_shard_count(1));
        map.set(1, 1);
        let m = Arc::clone(&map);
        let result = std::thread::spawn(move || {
            m.range(|_, _| panic!("visitor panicked"));
        })
        .join();
        assert!(result.is_err());
        // The panic happened outside the lock, but the map must work either way.
        map.set(2, 2);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn parallel_writers_on_shared_map() {
        let map = Arc::new(ConcurrentMap::new());
        let handles: Vec<_> = (0..8u64)
            .map(|t| {
                let map = Arc::clone(&map);
                std::thread::spawn(move || {
                    for i in 0..250 {
                        map.set(t * 1000 + i, i);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(map.len(), 2000);
    }
}
