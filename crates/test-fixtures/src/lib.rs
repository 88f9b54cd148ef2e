//! Shared fixtures for Recall tests and benches.
//!
//! JSON datasets live under `data/`; vectors are derived deterministically
//! from a seed string so every crate sees identical embeddings.

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use recall_core::models::{Document, VectorEntry};

/// Directory holding the JSON fixture files.
pub fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// One document of the sample knowledge base with its routing info.
#[derive(Debug, Clone, Deserialize)]
pub struct FixtureDocument {
    pub role: String,
    pub knowledge_base: String,
    #[serde(flatten)]
    pub document: Document,
}

/// The sample knowledge base (`data/knowledge_base.json`).
pub fn knowledge_base() -> Vec<FixtureDocument> {
    load_fixture("knowledge_base.json")
}

/// Deterministic pseudo-random vector in [-1, 1] derived from `seed`.
pub fn seeded_vector(seed: &str, dimensions: usize) -> Vec<f32> {
    let mut reader = blake3::Hasher::new().update(seed.as_bytes()).finalize_xof();
    let mut bytes = vec![0u8; dimensions * 4];
    reader.fill(&mut bytes);
    bytes
        .chunks_exact(4)
        .map(|c| {
            let n = u32::from_le_bytes([c[0], c[1], c[2], c[3]]);
            (n as f64 / u32::MAX as f64 * 2.0 - 1.0) as f32
        })
        .collect()
}

/// `count` entries named `doc-0..` in sub-partition `partition_id`.
pub fn seeded_entries(partition_id: &str, count: usize, dimensions: usize) -> Vec<VectorEntry> {
    (0..count)
        .map(|i| {
            let id = format!("doc-{i}");
            let document = Document::new(&id, format!("Document {i}"), format!("Body of {id}"));
            VectorEntry::from_document(&document, partition_id, seeded_vector(&id, dimensions))
        })
        .collect()
}

/// Unit basis vector `e_i`.
pub fn basis_vector(i: usize, dimensions: usize) -> Vec<f32> {
    let mut v = vec![0.0; dimensions];
    v[i % dimensions] = 1.0;
    v
}
