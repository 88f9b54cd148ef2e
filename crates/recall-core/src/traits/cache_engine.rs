use crate::models::CacheStatistics;

/// A bounded key-value cache. Implementations decide the eviction and
/// expiration policy; callers only see this contract.
pub trait ICacheEngine<K, V>: Send + Sync {
    /// Look up a key, counting a hit or a miss.
    fn get(&self, key: &K) -> Option<V>;

    /// Insert or replace a value.
    fn put(&self, key: K, value: V);

    /// Remove a key, returning its value if present.
    fn remove(&self, key: &K) -> Option<V>;

    /// Presence check. Does not count as a hit or miss.
    fn contains(&self, key: &K) -> bool;

    /// Drop every entry. Counters are kept.
    fn clear(&self);

    fn statistics(&self) -> CacheStatistics;
}
