use serde::{Deserialize, Serialize};

use super::defaults;

/// When a cache entry's time-to-live clock is reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpirationPolicy {
    /// Entry expires a fixed time after it was written. Suits write-heavy layers.
    AfterWrite,
    /// Entry expires after it has gone unread for the TTL. Suits read-heavy layers.
    AfterAccess,
}

/// Backend used for a single cache layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheEngineKind {
    /// Concurrent moka cache with TTL/TTI expiration.
    Moka,
    /// Strict least-recently-used cache without expiration.
    Lru,
}

/// Configuration for one cache layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerConfig {
    /// Maximum number of entries.
    pub capacity: u64,
    /// Time-to-live in seconds. Ignored by the `lru` engine.
    pub ttl_secs: u64,
    pub expiration: ExpirationPolicy,
    pub engine: CacheEngineKind,
}

impl LayerConfig {
    fn with(capacity: u64, ttl_secs: u64) -> Self {
        Self {
            capacity,
            ttl_secs,
            expiration: ExpirationPolicy::AfterWrite,
            engine: CacheEngineKind::Moka,
        }
    }
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self::with(
            defaults::DEFAULT_RETRIEVAL_RESULT_CAPACITY,
            defaults::DEFAULT_RETRIEVAL_RESULT_TTL_SECS,
        )
    }
}

/// Tiered cache configuration: one section per layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// L1: normalized question → answer text.
    pub fast_answer: LayerConfig,
    /// L2: concept id → concept summary.
    pub concept_unit: LayerConfig,
    /// L3: normalized question → derived answer.
    pub derived_answer: LayerConfig,
    /// L4: query cache key → filtered and sorted retrieval result.
    pub retrieval_result: LayerConfig,
    /// Number of shards the retrieval layer is split across.
    pub retrieval_shards: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            fast_answer: LayerConfig::with(
                defaults::DEFAULT_FAST_ANSWER_CAPACITY,
                defaults::DEFAULT_FAST_ANSWER_TTL_SECS,
            ),
            concept_unit: LayerConfig::with(
                defaults::DEFAULT_CONCEPT_UNIT_CAPACITY,
                defaults::DEFAULT_CONCEPT_UNIT_TTL_SECS,
            ),
            derived_answer: LayerConfig::with(
                defaults::DEFAULT_DERIVED_ANSWER_CAPACITY,
                defaults::DEFAULT_DERIVED_ANSWER_TTL_SECS,
            ),
            retrieval_result: LayerConfig::with(
                defaults::DEFAULT_RETRIEVAL_RESULT_CAPACITY,
                defaults::DEFAULT_RETRIEVAL_RESULT_TTL_SECS,
            ),
            retrieval_shards: defaults::DEFAULT_RETRIEVAL_SHARDS,
        }
    }
}
