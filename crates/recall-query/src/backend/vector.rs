//! Cosine search over the partition index.

use std::sync::Arc;

use rayon::prelude::*;
use tracing::debug;

use recall_cache::{normalize_key, BoundedCache};
use recall_core::errors::{RecallError, RecallResult};
use recall_core::models::{QueryRequest, ScoredDocument};
use recall_core::traits::{IEmbeddingProvider, ISearchBackend};
use recall_index::PartitionVectorIndex;

use super::{skip_unloaded, sub_partition, target_partitions};

/// Embeds the query (unless a vector is supplied) and searches the routed
/// partition, or every loaded partition in parallel.
pub struct VectorSearchBackend {
    registry: Arc<PartitionVectorIndex>,
    embedder: Arc<dyn IEmbeddingProvider>,
    embeddings: BoundedCache<String, Arc<Vec<f32>>>,
}

impl VectorSearchBackend {
    pub fn new(
        registry: Arc<PartitionVectorIndex>,
        embedder: Arc<dyn IEmbeddingProvider>,
        embedding_cache_size: usize,
    ) -> RecallResult<Self> {
        Ok(Self {
            registry,
            embedder,
            embeddings: BoundedCache::new(embedding_cache_size)?,
        })
    }

    /// Query embedding, memoized by normalized text.
    pub fn query_vector(&self, request: &QueryRequest) -> RecallResult<Arc<Vec<f32>>> {
        if let Some(vector) = &request.query_vector {
            return Ok(Arc::new(vector.clone()));
        }
        let key = blake3::hash(normalize_key(&request.query_text).as_bytes())
            .to_hex()
            .to_string();
        if let Some(cached) = self.embeddings.get(&key) {
            return Ok(cached);
        }
        let vector = Arc::new(self.embedder.embed(&request.query_text)?);
        debug!(provider = self.embedder.name(), dims = vector.len(), "query embedded");
        self.embeddings.put(key, Arc::clone(&vector));
        Ok(vector)
    }

    pub fn embedding_cache(&self) -> &BoundedCache<String, Arc<Vec<f32>>> {
        &self.embeddings
    }
}

impl ISearchBackend for VectorSearchBackend {
    fn search(
        &self,
        request: &QueryRequest,
        max_candidates: usize,
    ) -> RecallResult<Vec<ScoredDocument>> {
        let partitions = target_partitions(&self.registry, request)?;
        let query = self.query_vector(request)?;

        let matching: Vec<_> = partitions
            .into_iter()
            .filter(|p| p.dimensions() == query.len())
            .collect();
        if matching.is_empty() {
            return Err(RecallError::ValidationError(format!(
                "query vector has {} dimensions, no target partition matches",
                query.len()
            )));
        }

        let filter = sub_partition(request);
        let per_partition: Vec<Vec<ScoredDocument>> = matching
            .par_iter()
            .map(|p| skip_unloaded(p.search(&query, max_candidates, filter)))
            .collect::<RecallResult<Vec<_>>>()?
            .into_iter()
            .flatten()
            .collect();

        // Partitions arrive sorted by id; a stable sort keeps that order on ties.
        let mut merged: Vec<ScoredDocument> = per_partition.into_iter().flatten().collect();
        merged.sort_by(|a, b| b.score.total_cmp(&a.score));
        merged.truncate(max_candidates);
        Ok(merged)
    }

    fn name(&self) -> &str {
        "vector"
    }
}
