//! Feature-hashing embedding provider.
//!
//! Maps each term to a signed bucket and weights it by term frequency. Not
//! semantic, but deterministic and dependency-free, so the engine runs
//! without an external model.

use std::collections::HashMap;

use recall_core::errors::{RecallError, RecallResult};
use recall_core::traits::IEmbeddingProvider;

pub struct HashingEmbedder {
    dimensions: usize,
}

impl HashingEmbedder {
    pub fn new(dimensions: usize) -> RecallResult<Self> {
        if dimensions == 0 {
            return Err(RecallError::ConfigError(
                "embedding dimensions must be at least 1".into(),
            ));
        }
        Ok(Self { dimensions })
    }

    /// FNV-1a. The top bit picks the sign so colliding terms tend to cancel.
    fn bucket(&self, term: &str) -> (usize, f32) {
        let mut h: u64 = 0xcbf29ce484222325;
        for b in term.as_bytes() {
            h ^= *b as u64;
            h = h.wrapping_mul(0x100000001b3);
        }
        let sign = if h >> 63 == 0 { 1.0 } else { -1.0 };
        ((h % self.dimensions as u64) as usize, sign)
    }

    pub fn tokenize(text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
            .collect()
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let mut vec = vec![0.0f32; self.dimensions];
        let tokens = Self::tokenize(text);
        if tokens.is_empty() {
            return vec;
        }

        let mut tf: HashMap<&str, f32> = HashMap::new();
        for tok in &tokens {
            *tf.entry(tok.as_str()).or_default() += 1.0;
        }
        let total = tokens.len() as f32;
        for (term, count) in tf {
            let (bucket, sign) = self.bucket(term);
            // Longer terms carry more signal than short function words.
            let weight = 1.0 + (term.chars().count() as f32).ln();
            vec[bucket] += sign * weight * count / total;
        }

        let norm: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for v in &mut vec {
                *v /= norm;
            }
        }
        vec
    }
}

impl IEmbeddingProvider for HashingEmbedder {
    fn embed(&self, text: &str) -> RecallResult<Vec<f32>> {
        Ok(self.vectorize(text))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "hashing-embedder"
    }
}
