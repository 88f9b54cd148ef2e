//! PartitionVectorIndex: registry of role partitions.
//!
//! The registry exclusively owns each `PartitionIndex`; callers get `Arc`
//! handles. Operations on different partitions never share a lock.

use std::path::PathBuf;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::{info, warn};

use recall_core::config::IndexConfig;
use recall_core::errors::{RecallError, RecallResult};
use recall_core::models::PartitionStats;

use crate::partition::PartitionIndex;
use crate::snapshot::snapshot_path;

/// Typed registry of partitions keyed by role.
#[derive(Debug)]
pub struct PartitionVectorIndex {
    partitions: DashMap<String, Arc<PartitionIndex>>,
    default_dimensions: usize,
    snapshot_dir: Option<PathBuf>,
}

impl PartitionVectorIndex {
    pub fn new(default_dimensions: usize, snapshot_dir: Option<PathBuf>) -> Self {
        Self {
            partitions: DashMap::new(),
            default_dimensions,
            snapshot_dir,
        }
    }

    /// Build from config, registering every configured partition.
    pub fn from_config(config: &IndexConfig) -> RecallResult<Self> {
        let registry = Self::new(
            config.dimensions,
            config.snapshot_dir.as_ref().map(PathBuf::from),
        );
        for partition_id in &config.partitions {
            registry.register(partition_id)?;
        }
        Ok(registry)
    }

    pub fn default_dimensions(&self) -> usize {
        self.default_dimensions
    }

    /// Register a partition with the default dimensions. Returns the existing
    /// partition when already registered.
    pub fn register(&self, partition_id: &str) -> RecallResult<Arc<PartitionIndex>> {
        self.register_with_dimensions(partition_id, self.default_dimensions)
    }

    /// Register a partition with explicit dimensions. Re-registering with
    /// different dimensions is a validation error.
    pub fn register_with_dimensions(
        &self,
        partition_id: &str,
        dimensions: usize,
    ) -> RecallResult<Arc<PartitionIndex>> {
        if partition_id.trim().is_empty() {
            return Err(RecallError::ValidationError(
                "partition id must not be empty".into(),
            ));
        }
        if let Some(existing) = self.partitions.get(partition_id) {
            return Self::check_dimensions(existing.value(), dimensions);
        }

        let path = self
            .snapshot_dir
            .as_ref()
            .map(|dir| snapshot_path(dir, partition_id));
        let candidate = Arc::new(PartitionIndex::new(partition_id, dimensions, path)?);
        let entry = self
            .partitions
            .entry(partition_id.to_string())
            .or_insert_with(|| {
                info!(partition = partition_id, dimensions, "partition registered");
                candidate
            });
        Self::check_dimensions(entry.value(), dimensions)
    }

    fn check_dimensions(
        partition: &Arc<PartitionIndex>,
        dimensions: usize,
    ) -> RecallResult<Arc<PartitionIndex>> {
        if partition.dimensions() != dimensions {
            return Err(RecallError::ValidationError(format!(
                "partition {} already registered with {} dimensions",
                partition.partition_id(),
                partition.dimensions()
            )));
        }
        Ok(Arc::clone(partition))
    }

    pub fn get(&self, partition_id: &str) -> Option<Arc<PartitionIndex>> {
        self.partitions.get(partition_id).map(|p| Arc::clone(p.value()))
    }

    /// Like [`get`](Self::get) but an unknown partition is `NotFound`.
    pub fn require(&self, partition_id: &str) -> RecallResult<Arc<PartitionIndex>> {
        self.get(partition_id).ok_or_else(|| RecallError::NotFound {
            id: partition_id.to_string(),
        })
    }

    pub fn load(&self, partition_id: &str) -> RecallResult<()> {
        self.require(partition_id)?.load()
    }

    pub fn unload(&self, partition_id: &str) -> RecallResult<bool> {
        self.require(partition_id)?.unload()
    }

    pub fn save(&self, partition_id: &str) -> RecallResult<()> {
        self.require(partition_id)?.save()
    }

    /// Load every registered partition. Stops at the first failure.
    pub fn load_all(&self) -> RecallResult<()> {
        for partition in self.handles() {
            partition.load()?;
        }
        Ok(())
    }

    /// Save every loaded partition. Unloaded partitions are skipped; a
    /// failure on one partition does not stop the others. Returns the number
    /// saved, or the first error after all were attempted.
    pub fn save_all(&self) -> RecallResult<usize> {
        let mut saved = 0;
        let mut first_error = None;
        for partition in self.handles() {
            match partition.save() {
                Ok(()) => saved += 1,
                Err(RecallError::NotLoaded { .. }) => {}
                Err(e) => {
                    warn!(partition = partition.partition_id(), error = %e, "save failed");
                    first_error.get_or_insert(e);
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(saved),
        }
    }

    /// Unregister a partition, dropping its memory. The snapshot is kept.
    pub fn remove(&self, partition_id: &str) -> Option<Arc<PartitionIndex>> {
        let removed = self.partitions.remove(partition_id).map(|(_, p)| p);
        if removed.is_some() {
            info!(partition = partition_id, "partition removed");
        }
        removed
    }

    /// Registered partition ids, sorted.
    pub fn partition_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.partitions.iter().map(|p| p.key().clone()).collect();
        ids.sort();
        ids
    }

    /// Handles of loaded partitions, sorted by id.
    pub fn loaded_partitions(&self) -> Vec<Arc<PartitionIndex>> {
        self.handles()
            .into_iter()
            .filter(|p| p.is_loaded().unwrap_or(false))
            .collect()
    }

    pub fn statistics(&self, partition_id: &str) -> RecallResult<PartitionStats> {
        self.require(partition_id)?.statistics()
    }

    /// Statistics of every registered partition, sorted by id.
    pub fn all_statistics(&self) -> RecallResult<Vec<PartitionStats>> {
        self.handles().iter().map(|p| p.statistics()).collect()
    }

    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }

    // Handles are cloned out so no DashMap shard guard is held while a
    // partition does I/O.
    fn handles(&self) -> Vec<Arc<PartitionIndex>> {
        let mut handles: Vec<Arc<PartitionIndex>> =
            self.partitions.iter().map(|p| Arc::clone(p.value())).collect();
        handles.sort_by(|a, b| a.partition_id().cmp(b.partition_id()));
        handles
    }
}
