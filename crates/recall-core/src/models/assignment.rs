use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A weighted target of consistent assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    pub bucket_id: String,
    pub weight: f64,
}

impl Bucket {
    pub fn new(bucket_id: impl Into<String>, weight: f64) -> Self {
        Self {
            bucket_id: bucket_id.into(),
            weight,
        }
    }

    /// `n` buckets named `0..n` with equal weight.
    pub fn uniform(n: usize) -> Vec<Self> {
        if n == 0 {
            return Vec::new();
        }
        let weight = 1.0 / n as f64;
        (0..n).map(|i| Self::new(i.to_string(), weight)).collect()
    }
}

/// A memoized mapping of an entity to a bucket. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub partition_key: String,
    pub entity_key: String,
    pub bucket_id: String,
    pub assigned_at: DateTime<Utc>,
}
