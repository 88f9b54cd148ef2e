//! PartitionIndex: one role partition's vectors and lifecycle.
//!
//! State lives behind a single `RwLock<Option<LoadedPartition>>`: `None` is
//! UNLOADED. Snapshot I/O never happens while that lock is held.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use recall_core::constants::MAX_BATCH_SIZE;
use recall_core::errors::{RecallError, RecallResult};
use recall_core::models::{Document, PartitionState, PartitionStats, ScoredDocument, VectorEntry};

use crate::similarity::{cosine_with_norms, l2_norm};
use crate::snapshot::{read_snapshot, write_snapshot};
use crate::topk::TopK;

#[derive(Debug, Clone)]
struct StoredEntry {
    entry: VectorEntry,
    seq: u64,
    norm: f64,
}

#[derive(Debug, Default)]
struct LoadedPartition {
    entries: HashMap<String, StoredEntry>,
    next_seq: u64,
}

impl LoadedPartition {
    fn insert(&mut self, entry: VectorEntry) {
        let norm = l2_norm(&entry.vector);
        // Replacing a document keeps its original position for tie-breaks.
        let seq = match self.entries.get(&entry.document_id) {
            Some(existing) => existing.seq,
            None => {
                let seq = self.next_seq;
                self.next_seq += 1;
                seq
            }
        };
        self.entries
            .insert(entry.document_id.clone(), StoredEntry { entry, seq, norm });
    }

    fn ordered_entries(&self) -> Vec<VectorEntry> {
        let mut stored: Vec<&StoredEntry> = self.entries.values().collect();
        stored.sort_by_key(|s| s.seq);
        stored.into_iter().map(|s| s.entry.clone()).collect()
    }
}

#[derive(Debug, Default)]
struct Timestamps {
    last_loaded_at: Option<DateTime<Utc>>,
    last_saved_at: Option<DateTime<Utc>>,
}

/// In-memory nearest-neighbour index for one partition.
#[derive(Debug)]
pub struct PartitionIndex {
    partition_id: String,
    dimensions: usize,
    snapshot_path: Option<PathBuf>,
    state: RwLock<Option<LoadedPartition>>,
    save_lock: Mutex<()>,
    timestamps: Mutex<Timestamps>,
    search_count: AtomicU64,
}

impl PartitionIndex {
    /// Create an UNLOADED partition. Without a snapshot path the partition
    /// lives purely in memory.
    pub fn new(
        partition_id: impl Into<String>,
        dimensions: usize,
        snapshot_path: Option<PathBuf>,
    ) -> RecallResult<Self> {
        if dimensions == 0 {
            return Err(RecallError::ValidationError(
                "partition dimensions must be at least 1".into(),
            ));
        }
        Ok(Self {
            partition_id: partition_id.into(),
            dimensions,
            snapshot_path,
            state: RwLock::new(None),
            save_lock: Mutex::new(()),
            timestamps: Mutex::new(Timestamps::default()),
            search_count: AtomicU64::new(0),
        })
    }

    pub fn partition_id(&self) -> &str {
        &self.partition_id
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn read_state(&self) -> RecallResult<RwLockReadGuard<'_, Option<LoadedPartition>>> {
        self.state
            .read()
            .map_err(|e| RecallError::ConcurrencyError(e.to_string()))
    }

    fn write_state(&self) -> RecallResult<RwLockWriteGuard<'_, Option<LoadedPartition>>> {
        self.state
            .write()
            .map_err(|e| RecallError::ConcurrencyError(e.to_string()))
    }

    fn not_loaded(&self) -> RecallError {
        RecallError::NotLoaded {
            partition_id: self.partition_id.clone(),
        }
    }

    fn touch(&self, f: impl FnOnce(&mut Timestamps)) -> RecallResult<()> {
        let mut ts = self
            .timestamps
            .lock()
            .map_err(|e| RecallError::ConcurrencyError(e.to_string()))?;
        f(&mut ts);
        Ok(())
    }

    fn validate_entry(&self, entry: &VectorEntry) -> RecallResult<()> {
        if entry.document_id.trim().is_empty() {
            return Err(RecallError::ValidationError(
                "document_id must not be empty".into(),
            ));
        }
        if entry.vector.len() != self.dimensions {
            return Err(RecallError::ValidationError(format!(
                "vector for {} has {} dimensions, partition {} expects {}",
                entry.document_id,
                entry.vector.len(),
                self.partition_id,
                self.dimensions
            )));
        }
        if entry.vector.iter().any(|v| !v.is_finite()) {
            return Err(RecallError::ValidationError(format!(
                "vector for {} contains non-finite components",
                entry.document_id
            )));
        }
        Ok(())
    }

    pub fn is_loaded(&self) -> RecallResult<bool> {
        Ok(self.read_state()?.is_some())
    }

    /// UNLOADED → LOADED. Reads the snapshot if one exists, else starts
    /// empty. A no-op when already loaded.
    pub fn load(&self) -> RecallResult<()> {
        if self.read_state()?.is_some() {
            return Ok(());
        }

        let mut loaded = LoadedPartition::default();
        if let Some(path) = &self.snapshot_path {
            if let Some(snapshot) = read_snapshot(path, self.dimensions)? {
                for entry in snapshot.entries {
                    loaded.insert(entry);
                }
            }
        }

        let count = loaded.entries.len();
        {
            let mut state = self.write_state()?;
            if state.is_some() {
                // Lost a race with a concurrent load.
                return Ok(());
            }
            *state = Some(loaded);
        }
        self.touch(|ts| ts.last_loaded_at = Some(Utc::now()))?;
        info!(partition = %self.partition_id, documents = count, "partition loaded");
        Ok(())
    }

    /// LOADED → UNLOADED. Drops the in-memory entries; the snapshot file is
    /// kept. Returns whether the partition was loaded.
    pub fn unload(&self) -> RecallResult<bool> {
        let was_loaded = self.write_state()?.take().is_some();
        if was_loaded {
            info!(partition = %self.partition_id, "partition unloaded");
        }
        Ok(was_loaded)
    }

    /// Persist the current entries. State is unchanged.
    pub fn save(&self) -> RecallResult<()> {
        let _guard = self
            .save_lock
            .lock()
            .map_err(|e| RecallError::ConcurrencyError(e.to_string()))?;

        let entries = {
            let state = self.read_state()?;
            let loaded = state.as_ref().ok_or_else(|| self.not_loaded())?;
            loaded.ordered_entries()
        };

        let Some(path) = &self.snapshot_path else {
            debug!(partition = %self.partition_id, "no snapshot path, save skipped");
            return Ok(());
        };
        write_snapshot(path, self.dimensions, &entries)?;
        self.touch(|ts| ts.last_saved_at = Some(Utc::now()))?;
        info!(
            partition = %self.partition_id,
            documents = entries.len(),
            path = %path.display(),
            "partition saved"
        );
        Ok(())
    }

    /// Insert or replace one entry.
    pub fn add(&self, entry: VectorEntry) -> RecallResult<()> {
        self.validate_entry(&entry)?;
        let mut state = self.write_state()?;
        let loaded = state.as_mut().ok_or_else(|| self.not_loaded())?;
        loaded.insert(entry);
        Ok(())
    }

    /// Insert many entries. Every entry is validated before any is applied.
    pub fn add_batch(&self, entries: Vec<VectorEntry>) -> RecallResult<usize> {
        if entries.len() > MAX_BATCH_SIZE {
            return Err(RecallError::ValidationError(format!(
                "batch of {} exceeds maximum {MAX_BATCH_SIZE}",
                entries.len()
            )));
        }
        for entry in &entries {
            self.validate_entry(entry)?;
        }
        let count = entries.len();
        let mut state = self.write_state()?;
        let loaded = state.as_mut().ok_or_else(|| self.not_loaded())?;
        for entry in entries {
            loaded.insert(entry);
        }
        debug!(partition = %self.partition_id, count, "batch added");
        Ok(count)
    }

    /// Pair documents with their embeddings under `sub_partition`.
    pub fn add_documents(
        &self,
        sub_partition: &str,
        documents: &[Document],
        vectors: Vec<Vec<f32>>,
    ) -> RecallResult<usize> {
        if documents.len() != vectors.len() {
            return Err(RecallError::ValidationError(format!(
                "{} documents but {} vectors",
                documents.len(),
                vectors.len()
            )));
        }
        let entries = documents
            .iter()
            .zip(vectors)
            .map(|(doc, vector)| VectorEntry::from_document(doc, sub_partition, vector))
            .collect();
        self.add_batch(entries)
    }

    /// Remove a document. Returns whether it existed.
    pub fn delete(&self, document_id: &str) -> RecallResult<bool> {
        let mut state = self.write_state()?;
        let loaded = state.as_mut().ok_or_else(|| self.not_loaded())?;
        Ok(loaded.entries.remove(document_id).is_some())
    }

    /// Drop every entry while staying LOADED.
    pub fn clear(&self) -> RecallResult<()> {
        let mut state = self.write_state()?;
        let loaded = state.as_mut().ok_or_else(|| self.not_loaded())?;
        loaded.entries.clear();
        Ok(())
    }

    /// Look up one stored entry.
    pub fn get(&self, document_id: &str) -> RecallResult<Option<VectorEntry>> {
        let state = self.read_state()?;
        let loaded = state.as_ref().ok_or_else(|| self.not_loaded())?;
        Ok(loaded.entries.get(document_id).map(|s| s.entry.clone()))
    }

    /// Number of stored documents; 0 while unloaded.
    pub fn document_count(&self) -> RecallResult<usize> {
        Ok(self
            .read_state()?
            .as_ref()
            .map_or(0, |loaded| loaded.entries.len()))
    }

    /// The k most similar entries by cosine similarity, best first. Equal
    /// scores keep insertion order.
    pub fn search(
        &self,
        query: &[f32],
        k: usize,
        filter_partition: Option<&str>,
    ) -> RecallResult<Vec<ScoredDocument>> {
        let state = self.read_state()?;
        let loaded = state.as_ref().ok_or_else(|| self.not_loaded())?;
        if query.len() != self.dimensions {
            return Err(RecallError::ValidationError(format!(
                "query has {} dimensions, partition {} expects {}",
                query.len(),
                self.partition_id,
                self.dimensions
            )));
        }
        self.search_count.fetch_add(1, Ordering::Relaxed);

        let query_norm = l2_norm(query);
        if k == 0 || query_norm == 0.0 {
            return Ok(Vec::new());
        }

        let mut top = TopK::new(k);
        for stored in loaded.entries.values() {
            if filter_partition.is_some_and(|p| p != stored.entry.partition_id) {
                continue;
            }
            let score = cosine_with_norms(query, &stored.entry.vector, query_norm, stored.norm);
            top.push(score, stored.seq, stored);
        }

        Ok(top
            .into_sorted()
            .into_iter()
            .map(|(score, stored)| ScoredDocument::new(stored.entry.to_document(), score))
            .collect())
    }

    /// Visit every entry in insertion order, optionally restricted to one
    /// sub-partition. The visitor receives the entry's sequence number.
    pub fn for_each_entry(
        &self,
        filter_partition: Option<&str>,
        mut visit: impl FnMut(u64, &VectorEntry),
    ) -> RecallResult<()> {
        let state = self.read_state()?;
        let loaded = state.as_ref().ok_or_else(|| self.not_loaded())?;
        self.search_count.fetch_add(1, Ordering::Relaxed);
        let mut stored: Vec<&StoredEntry> = loaded
            .entries
            .values()
            .filter(|s| filter_partition.map_or(true, |p| p == s.entry.partition_id))
            .collect();
        stored.sort_by_key(|s| s.seq);
        for s in stored {
            visit(s.seq, &s.entry);
        }
        Ok(())
    }

    pub fn statistics(&self) -> RecallResult<PartitionStats> {
        let (state, document_count, sub_partitions) = {
            let guard = self.read_state()?;
            match guard.as_ref() {
                Some(loaded) => {
                    let subs: HashSet<&str> = loaded
                        .entries
                        .values()
                        .map(|s| s.entry.partition_id.as_str())
                        .collect();
                    (PartitionState::Loaded, loaded.entries.len() as u64, subs.len())
                }
                None => (PartitionState::Unloaded, 0, 0),
            }
        };
        let ts = self
            .timestamps
            .lock()
            .map_err(|e| RecallError::ConcurrencyError(e.to_string()))?;
        Ok(PartitionStats {
            partition_id: self.partition_id.clone(),
            state,
            document_count,
            dimensions: self.dimensions,
            sub_partitions,
            search_count: self.search_count.load(Ordering::Relaxed),
            last_loaded_at: ts.last_loaded_at,
            last_saved_at: ts.last_saved_at,
            snapshot_path: self
                .snapshot_path
                .as_ref()
                .map(|p| p.display().to_string()),
        })
    }
}
