//! Term-overlap search over document fields.

use std::collections::HashSet;
use std::sync::Arc;

use recall_core::constants::DEFAULT_SEARCH_FIELDS;
use recall_core::errors::RecallResult;
use recall_core::models::{QueryRequest, ScoredDocument};
use recall_core::traits::ISearchBackend;
use recall_index::PartitionVectorIndex;

use super::{skip_unloaded, sub_partition, target_partitions};
use crate::embedder::HashingEmbedder;

const FUZZY_WEIGHT: f64 = 0.5;

/// True when `a` and `b` differ by at most one insertion, deletion, or
/// substitution.
pub fn within_one_edit(a: &str, b: &str) -> bool {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (short, long) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };
    if long.len() - short.len() > 1 {
        return false;
    }
    let mut i = 0;
    let mut j = 0;
    let mut edits = 0;
    while i < short.len() && j < long.len() {
        if short[i] == long[j] {
            i += 1;
            j += 1;
            continue;
        }
        edits += 1;
        if edits > 1 {
            return false;
        }
        if short.len() == long.len() {
            i += 1;
        }
        j += 1;
    }
    edits + (long.len() - j) + (short.len() - i) <= 1
}

/// Distinct query terms in first-occurrence order.
fn query_terms(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut terms = HashingEmbedder::tokenize(text);
    terms.retain(|t| seen.insert(t.clone()));
    terms
}

/// Scores a document by the fraction of query terms found in the requested
/// fields. Exact matches count 1, fuzzy matches count 0.5.
pub struct LexicalSearchBackend {
    registry: Arc<PartitionVectorIndex>,
    fuzzy_min_term_len: usize,
}

impl LexicalSearchBackend {
    pub fn new(registry: Arc<PartitionVectorIndex>, fuzzy_min_term_len: usize) -> Self {
        Self {
            registry,
            fuzzy_min_term_len,
        }
    }

    fn term_score(&self, term: &str, tokens: &HashSet<String>, fuzzy: bool) -> f64 {
        if tokens.contains(term) {
            return 1.0;
        }
        if fuzzy
            && term.chars().count() >= self.fuzzy_min_term_len
            && tokens.iter().any(|t| within_one_edit(term, t))
        {
            return FUZZY_WEIGHT;
        }
        0.0
    }
}

impl ISearchBackend for LexicalSearchBackend {
    fn search(
        &self,
        request: &QueryRequest,
        max_candidates: usize,
    ) -> RecallResult<Vec<ScoredDocument>> {
        let partitions = target_partitions(&self.registry, request)?;

        let terms = query_terms(&request.query_text);
        if terms.is_empty() || max_candidates == 0 {
            return Ok(Vec::new());
        }

        let fields: Vec<&str> = if request.fields.is_empty() {
            DEFAULT_SEARCH_FIELDS.to_vec()
        } else {
            request.fields.iter().map(String::as_str).collect()
        };
        let filter = sub_partition(request);

        // (score, partition position, seq, doc)
        let mut scored: Vec<(f64, usize, u64, ScoredDocument)> = Vec::new();
        for (position, partition) in partitions.iter().enumerate() {
            skip_unloaded(partition.for_each_entry(filter, |seq, entry| {
                let document = entry.to_document();
                let tokens: HashSet<String> = fields
                    .iter()
                    .filter_map(|f| document.field(f))
                    .flat_map(HashingEmbedder::tokenize)
                    .collect();
                let total: f64 = terms
                    .iter()
                    .map(|t| self.term_score(t, &tokens, request.fuzzy))
                    .sum();
                if total > 0.0 {
                    let score = total / terms.len() as f64;
                    scored.push((score, position, seq, ScoredDocument::new(document, score)));
                }
            }))?;
        }

        scored.sort_by(|a, b| {
            b.0.total_cmp(&a.0)
                .then(a.1.cmp(&b.1))
                .then(a.2.cmp(&b.2))
        });
        Ok(scored
            .into_iter()
            .take(max_candidates)
            .map(|(_, _, _, doc)| doc)
            .collect())
    }

    fn name(&self) -> &str {
        "lexical"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_distance_one() {
        assert!(within_one_edit("password", "pasword"));
        assert!(within_one_edit("password", "passwords"));
        assert!(within_one_edit("password", "passward"));
        assert!(within_one_edit("same", "same"));
        assert!(!within_one_edit("password", "pswrd"));
        assert!(!within_one_edit("abcd", "bacd"));
        assert!(within_one_edit("abc", "xabc"));
    }
}
