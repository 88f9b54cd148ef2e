use crate::errors::RecallResult;
use crate::models::{QueryRequest, ScoredDocument};

/// The index consulted on a cache miss.
pub trait ISearchBackend: Send + Sync {
    /// Return up to `max_candidates` documents ordered by descending score.
    ///
    /// Returns `RecallError::IndexUnavailable` when no index can serve the request.
    fn search(
        &self,
        request: &QueryRequest,
        max_candidates: usize,
    ) -> RecallResult<Vec<ScoredDocument>>;

    /// Human-readable backend name.
    fn name(&self) -> &str;
}
