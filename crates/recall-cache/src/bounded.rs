//! Strict least-recently-used cache with hit/miss/eviction accounting.
//!
//! Recency order is global to the cache, so the map sits behind one mutex.
//! Counters are atomics and can be read without the lock.

use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

use lru::LruCache;
use parking_lot::Mutex;

use recall_core::errors::{RecallError, RecallResult};
use recall_core::models::CacheStatistics;
use recall_core::traits::ICacheEngine;

/// Fixed-capacity LRU cache.
pub struct BoundedCache<K: Hash + Eq, V> {
    entries: Mutex<LruCache<K, V>>,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl<K: Hash + Eq, V: Clone> BoundedCache<K, V> {
    /// Create a cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> RecallResult<Self> {
        let cap = NonZeroUsize::new(capacity).ok_or_else(|| {
            RecallError::ConfigError("cache capacity must be at least 1".into())
        })?;
        Ok(Self {
            entries: Mutex::new(LruCache::new(cap)),
            capacity,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        })
    }

    /// Look up a key. A hit moves it to the most-recently-used position.
    pub fn get(&self, key: &K) -> Option<V> {
        let found = self.entries.lock().get(key).cloned();
        match found {
            Some(v) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(v)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Insert or refresh a key. A new key at capacity evicts the LRU entry first.
    pub fn put(&self, key: K, value: V) {
        let mut entries = self.entries.lock();
        if !entries.contains(&key)
            && entries.len() >= self.capacity
            && entries.pop_lru().is_some()
        {
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }
        entries.put(key, value);
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        self.entries.lock().pop(key)
    }

    /// Presence check. Leaves recency order and counters untouched.
    pub fn contains(&self, key: &K) -> bool {
        self.entries.lock().contains(key)
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn statistics(&self) -> CacheStatistics {
        let hit_count = self.hits.load(Ordering::Relaxed);
        let miss_count = self.misses.load(Ordering::Relaxed);
        CacheStatistics {
            max_size: self.capacity as u64,
            current_size: self.len() as u64,
            hit_count,
            miss_count,
            eviction_count: self.evictions.load(Ordering::Relaxed),
            hit_rate: CacheStatistics::compute_hit_rate(hit_count, miss_count),
        }
    }
}

impl<K, V> ICacheEngine<K, V> for BoundedCache<K, V>
where
    K: Hash + Eq + Send,
    V: Clone + Send,
{
    fn get(&self, key: &K) -> Option<V> {
        BoundedCache::get(self, key)
    }

    fn put(&self, key: K, value: V) {
        BoundedCache::put(self, key, value)
    }

    fn remove(&self, key: &K) -> Option<V> {
        BoundedCache::remove(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        BoundedCache::contains(self, key)
    }

    fn clear(&self) {
        BoundedCache::clear(self)
    }

    fn statistics(&self) -> CacheStatistics {
        BoundedCache::statistics(self)
    }
}
