use serde::{Deserialize, Serialize};

use super::defaults;

/// Vector index configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Embedding dimensions for newly registered partitions.
    pub dimensions: usize,
    /// Directory holding one snapshot file per partition. `None` keeps
    /// partitions purely in memory.
    pub snapshot_dir: Option<String>,
    /// Role partitions registered at startup.
    pub partitions: Vec<String>,
    /// Load every registered partition during runtime assembly.
    pub load_on_start: bool,
    /// Capacity of the query-embedding LRU cache.
    pub embedding_cache_size: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            dimensions: defaults::DEFAULT_VECTOR_DIMENSIONS,
            snapshot_dir: None,
            partitions: Vec::new(),
            load_on_start: defaults::DEFAULT_LOAD_ON_START,
            embedding_cache_size: defaults::DEFAULT_EMBEDDING_CACHE_SIZE,
        }
    }
}
