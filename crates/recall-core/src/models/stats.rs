use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::CacheLayer;

/// Counters of a single cache engine.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatistics {
    pub max_size: u64,
    pub current_size: u64,
    pub hit_count: u64,
    pub miss_count: u64,
    pub eviction_count: u64,
    /// hits / (hits + misses), 0.0 before any lookup.
    pub hit_rate: f64,
}

impl CacheStatistics {
    pub fn compute_hit_rate(hits: u64, misses: u64) -> f64 {
        let total = hits + misses;
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }

    /// Sum counters of several engines (e.g. shards of one layer).
    pub fn merge<'a>(parts: impl IntoIterator<Item = &'a CacheStatistics>) -> Self {
        let mut merged = Self::default();
        for part in parts {
            merged.max_size += part.max_size;
            merged.current_size += part.current_size;
            merged.hit_count += part.hit_count;
            merged.miss_count += part.miss_count;
            merged.eviction_count += part.eviction_count;
        }
        merged.hit_rate = Self::compute_hit_rate(merged.hit_count, merged.miss_count);
        merged
    }
}

/// Size and hit rate of one tiered-cache layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerStatistics {
    pub layer: CacheLayer,
    pub capacity: u64,
    pub size: u64,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub hit_rate: f64,
}

/// Statistics across all four layers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TieredCacheStatistics {
    pub layers: Vec<LayerStatistics>,
}

impl TieredCacheStatistics {
    pub fn layer(&self, layer: CacheLayer) -> Option<&LayerStatistics> {
        self.layers.iter().find(|l| l.layer == layer)
    }
}

/// Lifecycle state of a partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PartitionState {
    Unloaded,
    Loaded,
}

/// Read-only view of a partition for monitoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartitionStats {
    pub partition_id: String,
    pub state: PartitionState,
    pub document_count: u64,
    pub dimensions: usize,
    /// Distinct sub-partition ids among loaded entries.
    pub sub_partitions: usize,
    pub search_count: u64,
    pub last_loaded_at: Option<DateTime<Utc>>,
    pub last_saved_at: Option<DateTime<Utc>>,
    pub snapshot_path: Option<String>,
}
