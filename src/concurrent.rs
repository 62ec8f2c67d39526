//! Sharded concurrent set and map.
//!
//! Keys are spread over a fixed number of shards, each an `ahash` table
//! behind its own `parking_lot::RwLock`. Reads take a shard read lock,
//! writes a shard write lock, so disjoint keys rarely contend. This is the
//! shape the tablebase layers and the solver's visited map need: insert-if-
//! absent, improve-under-lock, and bulk snapshots of finalized content.

use std::hash::Hash;

use ahash::{HashMap, HashSet, RandomState};
use parking_lot::RwLock;

const NUM_SHARDS: usize = 256;

pub struct ShardedSet<K> {
    hasher: RandomState,
    shards: Box<[RwLock<HashSet<K>>]>,
}

impl<K: Hash + Eq + Copy> ShardedSet<K> {
    pub fn new() -> Self {
        Self {
            hasher: RandomState::new(),
            shards: (0..NUM_SHARDS).map(|_| RwLock::new(HashSet::default())).collect(),
        }
    }

    #[inline]
    fn shard(&self, key: &K) -> usize {
        self.hasher.hash_one(key) as usize % NUM_SHARDS
    }

    /// Returns true when the key was newly inserted.
    pub fn insert(&self, key: K) -> bool {
        self.shards[self.shard(&key)].write().insert(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.shards[self.shard(key)].read().contains(key)
    }

    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.read().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|shard| shard.read().is_empty())
    }

    /// Copy the contents out, shard by shard. Meant for finalized sets that
    /// no longer change.
    pub fn snapshot(&self) -> Vec<K> {
        let mut out = Vec::with_capacity(self.len());
        for shard in self.shards.iter() {
            out.extend(shard.read().iter().copied());
        }
        out
    }
}

impl<K: Hash + Eq + Copy> Default for ShardedSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ShardedMap<K, V> {
    hasher: RandomState,
    shards: Box<[RwLock<HashMap<K, V>>]>,
}

impl<K: Hash + Eq + Copy, V: Copy> ShardedMap<K, V> {
    pub fn new() -> Self {
        Self {
            hasher: RandomState::new(),
            shards: (0..NUM_SHARDS).map(|_| RwLock::new(HashMap::default())).collect(),
        }
    }

    #[inline]
    fn shard(&self, key: &K) -> usize {
        self.hasher.hash_one(key) as usize % NUM_SHARDS
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.shards[self.shard(key)].read().get(key).copied()
    }

    /// Store `value` when the key is absent or `replaces` accepts the stored
    /// value; the check and the write happen under one shard lock. Returns
    /// whether the write happened.
    pub fn upsert_if<F>(&self, key: K, value: V, replaces: F) -> bool
    where
        F: FnOnce(&V) -> bool,
    {
        let mut shard = self.shards[self.shard(&key)].write();
        match shard.get(&key) {
            Some(existing) if !replaces(existing) => false,
            _ => {
                shard.insert(key, value);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.read().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|shard| shard.read().is_empty())
    }
}

impl<K: Hash + Eq + Copy, V: Copy> Default for ShardedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_insert_and_contains() {
        let set = ShardedSet::new();
        assert!(set.insert(17u64));
        assert!(!set.insert(17u64));
        assert!(set.contains(&17));
        assert!(!set.contains(&18));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn set_snapshot_returns_everything() {
        let set = ShardedSet::new();
        for i in 0..1000u64 {
            set.insert(i);
        }
        let mut snapshot = set.snapshot();
        snapshot.sort_unstable();
        assert_eq!(snapshot, (0..1000).collect::<Vec<_>>());
    }

    #[test]
    fn map_upsert_respects_the_predicate() {
        let map: ShardedMap<u64, u8> = ShardedMap::new();
        assert!(map.upsert_if(5, 10, |_| false));
        // equal is not an improvement
        assert!(!map.upsert_if(5, 10, |old| 10 < *old));
        assert!(map.upsert_if(5, 3, |old| 3 < *old));
        assert_eq!(map.get(&5), Some(3));
        assert!(!map.upsert_if(5, 7, |old| 7 < *old));
        assert_eq!(map.get(&5), Some(3));
    }

    #[test]
    fn concurrent_inserts_land() {
        let set = ShardedSet::new();
        std::thread::scope(|scope| {
            for t in 0..4u64 {
                let set = &set;
                scope.spawn(move || {
                    for i in 0..500 {
                        set.insert(t * 1000 + i);
                    }
                });
            }
        });
        assert_eq!(set.len(), 2000);
    }
}
