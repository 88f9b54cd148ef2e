//! PartitionVectorIndex integration: persistence, top-k, concurrency.

use std::sync::Arc;
use std::thread;

use proptest::prelude::*;
use recall_core::errors::RecallError;
use recall_core::models::{PartitionState, VectorEntry};
use recall_index::{cosine_similarity, PartitionIndex, PartitionVectorIndex};
use test_fixtures::{seeded_entries, seeded_vector};

const DIMS: usize = 16;

fn brute_force(entries: &[VectorEntry], query: &[f32], k: usize) -> Vec<String> {
    let mut scored: Vec<(usize, f64)> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| (i, cosine_similarity(query, &e.vector)))
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    scored
        .into_iter()
        .take(k)
        .map(|(i, _)| entries[i].document_id.clone())
        .collect()
}

#[test]
fn save_and_reload_round_trips_exactly() {
    let dir = tempfile::tempdir().unwrap();
    let registry = PartitionVectorIndex::new(DIMS, Some(dir.path().to_path_buf()));
    let partition = registry.register("support").unwrap();
    partition.load().unwrap();
    let entries = seeded_entries("kb-1", 50, DIMS);
    partition.add_batch(entries.clone()).unwrap();
    partition.delete("doc-7").unwrap();
    registry.save("support").unwrap();

    let query = seeded_vector("query", DIMS);
    let before = partition.search(&query, 10, None).unwrap();

    assert!(registry.unload("support").unwrap());
    assert_eq!(
        registry.statistics("support").unwrap().state,
        PartitionState::Unloaded
    );
    registry.load("support").unwrap();

    assert_eq!(partition.document_count().unwrap(), 49);
    assert!(partition.get("doc-7").unwrap().is_none());
    assert_eq!(partition.get("doc-3").unwrap().unwrap(), entries[3]);
    assert_eq!(partition.search(&query, 10, None).unwrap(), before);
    assert!(registry.statistics("support").unwrap().last_saved_at.is_some());
}

#[test]
fn fresh_registry_reads_existing_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    {
        let registry = PartitionVectorIndex::new(DIMS, Some(dir.path().to_path_buf()));
        let p = registry.register("eng").unwrap();
        p.load().unwrap();
        p.add_batch(seeded_entries("kb", 5, DIMS)).unwrap();
        assert_eq!(registry.save_all().unwrap(), 1);
    }
    let registry = PartitionVectorIndex::new(DIMS, Some(dir.path().to_path_buf()));
    registry.register("eng").unwrap();
    registry.load("eng").unwrap();
    assert_eq!(registry.statistics("eng").unwrap().document_count, 5);
}

#[test]
fn unsaved_mutations_are_lost_across_unload() {
    let dir = tempfile::tempdir().unwrap();
    let registry = PartitionVectorIndex::new(DIMS, Some(dir.path().to_path_buf()));
    let p = registry.register("support").unwrap();
    p.load().unwrap();
    p.add_batch(seeded_entries("kb", 3, DIMS)).unwrap();
    p.save().unwrap();
    p.add(VectorEntry::new("late", "kb", seeded_vector("late", DIMS)))
        .unwrap();
    p.unload().unwrap();
    p.load().unwrap();
    assert_eq!(p.document_count().unwrap(), 3);
}

#[test]
fn corrupt_snapshot_leaves_partition_unloaded() {
    let dir = tempfile::tempdir().unwrap();
    let registry = PartitionVectorIndex::new(DIMS, Some(dir.path().to_path_buf()));
    let p = registry.register("support").unwrap();
    p.load().unwrap();
    p.add_batch(seeded_entries("kb", 3, DIMS)).unwrap();
    p.save().unwrap();
    p.unload().unwrap();

    let path = registry.statistics("support").unwrap().snapshot_path.unwrap();
    std::fs::write(&path, b"not a snapshot").unwrap();

    assert!(matches!(p.load(), Err(RecallError::PersistenceError(_))));
    assert!(!p.is_loaded().unwrap());
}

#[test]
fn damaged_header_dimensions_fail_load_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let registry = PartitionVectorIndex::new(2, Some(dir.path().to_path_buf()));
    let p = registry.register("support").unwrap();
    p.load().unwrap();
    p.add(VectorEntry::new("a", "kb", vec![1.0, 0.5])).unwrap();
    p.save().unwrap();
    p.unload().unwrap();

    let path = registry.statistics("support").unwrap().snapshot_path.unwrap();
    let mut raw = std::fs::read(&path).unwrap();
    raw[6..10].copy_from_slice(&u32::MAX.to_le_bytes());
    std::fs::write(&path, raw).unwrap();

    assert!(matches!(p.load(), Err(RecallError::PersistenceError(_))));
    assert!(!p.is_loaded().unwrap());
}

#[test]
fn snapshot_with_other_dimensions_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    {
        let registry = PartitionVectorIndex::new(4, Some(dir.path().to_path_buf()));
        let p = registry.register("x").unwrap();
        p.load().unwrap();
        p.add(VectorEntry::new("a", "kb", vec![1.0, 0.0, 0.0, 0.0])).unwrap();
        p.save().unwrap();
    }
    let registry = PartitionVectorIndex::new(8, Some(dir.path().to_path_buf()));
    registry.register("x").unwrap();
    assert!(registry.load("x").is_err());
}

#[test]
fn concurrent_load_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let registry = Arc::new(PartitionVectorIndex::new(
        DIMS,
        Some(dir.path().to_path_buf()),
    ));
    {
        let p = registry.register("support").unwrap();
        p.load().unwrap();
        p.add_batch(seeded_entries("kb", 20, DIMS)).unwrap();
        p.save().unwrap();
        p.unload().unwrap();
    }
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || registry.load("support").unwrap())
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(registry.statistics("support").unwrap().document_count, 20);
}

#[test]
fn concurrent_writers_and_readers() {
    let partition = Arc::new(PartitionIndex::new("p", DIMS, None).unwrap());
    partition.load().unwrap();
    let writers: Vec<_> = (0..4)
        .map(|t| {
            let p = Arc::clone(&partition);
            thread::spawn(move || {
                for i in 0..25 {
                    let id = format!("t{t}-{i}");
                    p.add(VectorEntry::new(&id, "kb", seeded_vector(&id, DIMS)))
                        .unwrap();
                }
            })
        })
        .collect();
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let p = Arc::clone(&partition);
            thread::spawn(move || {
                for _ in 0..25 {
                    let hits = p.search(&seeded_vector("q", DIMS), 5, None).unwrap();
                    assert!(hits.len() <= 5);
                }
            })
        })
        .collect();
    for h in writers.into_iter().chain(readers) {
        h.join().unwrap();
    }
    assert_eq!(partition.document_count().unwrap(), 100);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn top_k_matches_brute_force(count in 0usize..80, k in 0usize..20, seed in "[a-z]{1,8}") {
        let partition = PartitionIndex::new("p", DIMS, None).unwrap();
        partition.load().unwrap();
        let entries = seeded_entries("kb", count, DIMS);
        partition.add_batch(entries.clone()).unwrap();
        let query = seeded_vector(&seed, DIMS);

        let got: Vec<String> = partition
            .search(&query, k, None)
            .unwrap()
            .into_iter()
            .map(|h| h.document.id)
            .collect();
        prop_assert_eq!(got, brute_force(&entries, &query, k));
    }
}
