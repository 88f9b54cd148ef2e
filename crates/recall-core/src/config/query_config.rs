use serde::{Deserialize, Serialize};

use super::defaults;

/// Which search backend answers cache misses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    Vector,
    Lexical,
    Hybrid,
}

/// Query processor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Page size used when a request asks for `limit = 0`.
    pub default_limit: usize,
    /// Largest page a single request may ask for.
    pub max_limit: usize,
    /// Candidates requested from the backend on a cache miss.
    pub max_candidates: usize,
    pub backend: BackendKind,
    /// RRF smoothing constant for the hybrid backend.
    pub rrf_k: u32,
    /// Shortest query term eligible for fuzzy matching.
    pub fuzzy_min_term_len: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_limit: defaults::DEFAULT_LIMIT,
            max_limit: defaults::DEFAULT_MAX_LIMIT,
            max_candidates: defaults::DEFAULT_MAX_CANDIDATES,
            backend: BackendKind::Vector,
            rrf_k: defaults::DEFAULT_RRF_K,
            fuzzy_min_term_len: defaults::DEFAULT_FUZZY_MIN_TERM_LEN,
        }
    }
}
