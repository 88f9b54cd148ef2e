//! Reciprocal Rank Fusion: score = Σ 1/(k + rank_i)
//!
//! Combines the vector and lexical rankings without normalizing their
//! incomparable scores.

use std::collections::HashMap;

use tracing::debug;

use recall_core::errors::RecallResult;
use recall_core::models::{QueryRequest, ScoredDocument};
use recall_core::traits::ISearchBackend;

use super::{LexicalSearchBackend, VectorSearchBackend};

/// Fuse ranked lists (best first) by document id. Ranks are 1-based. Equal
/// fused scores keep the order in which documents were first seen.
pub fn fuse(ranked_lists: &[Vec<ScoredDocument>], k: u32) -> Vec<ScoredDocument> {
    // id → (fused score, first-seen position, document)
    let mut fused: HashMap<&str, (f64, usize, &ScoredDocument)> = HashMap::new();
    let mut seen = 0usize;

    for list in ranked_lists {
        for (index, candidate) in list.iter().enumerate() {
            let rrf = 1.0 / (k as f64 + (index + 1) as f64);
            let slot = fused
                .entry(candidate.document.id.as_str())
                .or_insert_with(|| {
                    seen += 1;
                    (0.0, seen, candidate)
                });
            slot.0 += rrf;
        }
    }

    let mut candidates: Vec<(f64, usize, &ScoredDocument)> = fused.into_values().collect();
    candidates.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));
    candidates
        .into_iter()
        .map(|(score, _, c)| ScoredDocument::new(c.document.clone(), score))
        .collect()
}

pub struct HybridSearchBackend {
    vector: VectorSearchBackend,
    lexical: LexicalSearchBackend,
    k: u32,
}

impl HybridSearchBackend {
    pub fn new(vector: VectorSearchBackend, lexical: LexicalSearchBackend, k: u32) -> Self {
        Self { vector, lexical, k }
    }
}

impl ISearchBackend for HybridSearchBackend {
    fn search(
        &self,
        request: &QueryRequest,
        max_candidates: usize,
    ) -> RecallResult<Vec<ScoredDocument>> {
        let (semantic, lexical) = rayon::join(
            || self.vector.search(request, max_candidates),
            || self.lexical.search(request, max_candidates),
        );
        let lists = [semantic?, lexical?];
        debug!(
            vector = lists[0].len(),
            lexical = lists[1].len(),
            k = self.k,
            "fusing rankings"
        );
        let mut fused = fuse(&lists, self.k);
        fused.truncate(max_candidates);
        Ok(fused)
    }

    fn name(&self) -> &str {
        "hybrid"
    }
}
