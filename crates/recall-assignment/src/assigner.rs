//! ConsistentAssigner: memoized weighted assignment via DashMap.

use chrono::Utc;
use dashmap::DashMap;
use tracing::debug;

use recall_core::errors::RecallResult;
use recall_core::models::{Assignment, Bucket};

use crate::hashing::select_bucket;

/// Thread-safe assigner. Each `(partition_key, entity_key)` pair is assigned
/// once; later calls return the stored assignment even if the bucket list
/// changed.
pub struct ConsistentAssigner {
    assignments: DashMap<(String, String), Assignment>,
}

impl ConsistentAssigner {
    pub fn new() -> Self {
        Self {
            assignments: DashMap::new(),
        }
    }

    /// Assign `entity_key` within `partition_key`, or return the existing assignment.
    pub fn assign(
        &self,
        partition_key: &str,
        entity_key: &str,
        buckets: &[Bucket],
    ) -> RecallResult<Assignment> {
        let key = (partition_key.to_string(), entity_key.to_string());
        if let Some(existing) = self.assignments.get(&key) {
            return Ok(existing.clone());
        }

        let bucket = select_bucket(entity_key, buckets)?;

        // A concurrent caller may have won the race; the entry API keeps
        // whichever assignment landed first.
        let entry = self.assignments.entry(key).or_insert_with(|| {
            debug!(
                partition = partition_key,
                entity = entity_key,
                bucket = %bucket.bucket_id,
                "new assignment"
            );
            Assignment {
                partition_key: partition_key.to_string(),
                entity_key: entity_key.to_string(),
                bucket_id: bucket.bucket_id.clone(),
                assigned_at: Utc::now(),
            }
        });
        Ok(entry.clone())
    }

    /// Existing assignment for a pair, if any. Never creates one.
    pub fn lookup(&self, partition_key: &str, entity_key: &str) -> Option<Assignment> {
        self.assignments
            .get(&(partition_key.to_string(), entity_key.to_string()))
            .map(|r| r.clone())
    }

    /// All assignments made within one partition.
    pub fn assignments_for(&self, partition_key: &str) -> Vec<Assignment> {
        self.assignments
            .iter()
            .filter(|r| r.key().0 == partition_key)
            .map(|r| r.value().clone())
            .collect()
    }

    /// End the life of a partition, dropping its assignments. Returns how many were removed.
    pub fn remove_partition(&self, partition_key: &str) -> usize {
        let before = self.assignments.len();
        self.assignments.retain(|(p, _), _| p != partition_key);
        before - self.assignments.len()
    }

    /// Total number of stored assignments.
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

impl Default for ConsistentAssigner {
    fn default() -> Self {
        Self::new()
    }
}
