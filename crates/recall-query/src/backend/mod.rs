//! Search backends consulted on a cache miss.

mod hybrid;
mod lexical;
mod vector;

use std::sync::Arc;

use recall_core::config::{BackendKind, QueryConfig};
use recall_core::constants::{PARTITION_FILTER_KEY, ROLE_FILTER_KEY};
use recall_core::errors::{RecallError, RecallResult};
use recall_core::models::QueryRequest;
use recall_core::traits::{IEmbeddingProvider, ISearchBackend};
use recall_index::{PartitionIndex, PartitionVectorIndex};

pub use hybrid::{fuse, HybridSearchBackend};
pub use lexical::{within_one_edit, LexicalSearchBackend};
pub use vector::VectorSearchBackend;

/// Assemble the backend selected by `config.backend`.
pub fn build_backend(
    config: &QueryConfig,
    registry: Arc<PartitionVectorIndex>,
    embedder: Arc<dyn IEmbeddingProvider>,
    embedding_cache_size: usize,
) -> RecallResult<Arc<dyn ISearchBackend>> {
    Ok(match config.backend {
        BackendKind::Vector => Arc::new(VectorSearchBackend::new(
            registry,
            embedder,
            embedding_cache_size,
        )?),
        BackendKind::Lexical => Arc::new(LexicalSearchBackend::new(
            registry,
            config.fuzzy_min_term_len,
        )),
        BackendKind::Hybrid => Arc::new(HybridSearchBackend::new(
            VectorSearchBackend::new(Arc::clone(&registry), embedder, embedding_cache_size)?,
            LexicalSearchBackend::new(registry, config.fuzzy_min_term_len),
            config.rrf_k,
        )),
    })
}

/// Sub-partition named by the `partition` routing filter.
pub(crate) fn sub_partition(request: &QueryRequest) -> Option<&str> {
    request.filters.get(PARTITION_FILTER_KEY).map(String::as_str)
}

/// Partitions a request should scan: the one named by the `role` filter, or
/// every loaded partition. Nothing to scan is `IndexUnavailable`.
pub(crate) fn target_partitions(
    registry: &PartitionVectorIndex,
    request: &QueryRequest,
) -> RecallResult<Vec<Arc<PartitionIndex>>> {
    if let Some(role) = request.filters.get(ROLE_FILTER_KEY) {
        let partition = registry
            .get(role)
            .ok_or_else(|| RecallError::IndexUnavailable {
                reason: format!("partition {role} is not registered"),
            })?;
        if !partition.is_loaded()? {
            return Err(RecallError::IndexUnavailable {
                reason: format!("partition {role} is not loaded"),
            });
        }
        return Ok(vec![partition]);
    }
    let loaded = registry.loaded_partitions();
    if loaded.is_empty() {
        return Err(RecallError::IndexUnavailable {
            reason: "no loaded partitions".into(),
        });
    }
    Ok(loaded)
}

/// A partition unloaded mid-query is skipped rather than failing the scan.
pub(crate) fn skip_unloaded<T>(result: RecallResult<T>) -> RecallResult<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(RecallError::NotLoaded { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}
