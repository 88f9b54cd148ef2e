//! Value type of the retrieval-result layer.

use std::sync::Arc;

use recall_core::models::ScoredDocument;

/// A filtered and sorted result set, stored before pagination.
///
/// Shared behind an `Arc` so cache reads do not copy documents.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedRetrieval {
    pub scored_documents: Arc<Vec<ScoredDocument>>,
}

impl CachedRetrieval {
    pub fn new(scored_documents: Vec<ScoredDocument>) -> Self {
        Self {
            scored_documents: Arc::new(scored_documents),
        }
    }

    /// Number of hits before pagination.
    pub fn total_hits(&self) -> u64 {
        self.scored_documents.len() as u64
    }
}
