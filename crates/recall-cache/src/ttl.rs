//! Expiring cache backed by moka.
//!
//! TinyLFU admission, size-bounded, with either expire-after-write (TTL) or
//! expire-after-access (TTI). Tracks hits/misses/evictions.

use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;

use recall_core::config::{ExpirationPolicy, LayerConfig};
use recall_core::errors::{RecallError, RecallResult};
use recall_core::models::CacheStatistics;
use recall_core::traits::ICacheEngine;

/// Concurrent cache with per-layer expiration.
pub struct TtlCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    cache: Cache<K, V>,
    capacity: u64,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: Arc<AtomicU64>,
}

impl<K, V> TtlCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Create a cache with `capacity` entries whose entries expire `ttl` after
    /// write or after last access, depending on `policy`.
    pub fn new(capacity: u64, ttl: Duration, policy: ExpirationPolicy) -> RecallResult<Self> {
        if capacity == 0 {
            return Err(RecallError::ConfigError(
                "cache capacity must be at least 1".into(),
            ));
        }
        if ttl.is_zero() {
            return Err(RecallError::ConfigError("cache ttl must be non-zero".into()));
        }

        let evictions = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&evictions);
        let builder = Cache::builder()
            .max_capacity(capacity)
            .eviction_listener(move |_key, _value, cause| {
                if cause.was_evicted() {
                    counter.fetch_add(1, Ordering::Relaxed);
                }
            });
        let cache = match policy {
            ExpirationPolicy::AfterWrite => builder.time_to_live(ttl).build(),
            ExpirationPolicy::AfterAccess => builder.time_to_idle(ttl).build(),
        };

        Ok(Self {
            cache,
            capacity,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions,
        })
    }

    /// Create a cache from a layer section of the config.
    pub fn from_config(config: &LayerConfig) -> RecallResult<Self> {
        Self::new(
            config.capacity,
            Duration::from_secs(config.ttl_secs),
            config.expiration,
        )
    }

    pub fn get(&self, key: &K) -> Option<V> {
        match self.cache.get(key) {
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

    pub fn insert(&self, key: K, value: V) {
        self.cache.insert(key, value);
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        self.cache.remove(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.cache.contains_key(key)
    }

    /// Invalidate all entries.
    pub fn clear(&self) {
        self.cache.invalidate_all();
    }

    /// Entry count after flushing moka's pending maintenance.
    pub fn len(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn statistics(&self) -> CacheStatistics {
        let current_size = self.len();
        let hit_count = self.hits.load(Ordering::Relaxed);
        let miss_count = self.misses.load(Ordering::Relaxed);
        CacheStatistics {
            max_size: self.capacity,
            current_size,
            hit_count,
            miss_count,
            eviction_count: self.evictions.load(Ordering::Relaxed),
            hit_rate: CacheStatistics::compute_hit_rate(hit_count, miss_count),
        }
    }
}

impl<K, V> ICacheEngine<K, V> for TtlCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn get(&self, key: &K) -> Option<V> {
        TtlCache::get(self, key)
    }

    fn put(&self, key: K, value: V) {
        self.insert(key, value)
    }

    fn remove(&self, key: &K) -> Option<V> {
        TtlCache::remove(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        TtlCache::contains(self, key)
    }

    fn clear(&self) {
        TtlCache::clear(self)
    }

    fn statistics(&self) -> CacheStatistics {
        TtlCache::statistics(self)
    }
}
