//! Stable hashing and weighted bucket selection.

use recall_core::constants::ASSIGNMENT_HASH_BUCKETS;
use recall_core::errors::{RecallError, RecallResult};
use recall_core::models::Bucket;

/// Stable 64-bit signed hash of a key. Identical across processes and platforms.
pub fn stable_hash(key: &str) -> i64 {
    let digest = blake3::hash(key.as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest.as_bytes()[..8]);
    i64::from_le_bytes(head)
}

/// Reduce a key to `r ∈ [0, 1)` as `|hash| mod 10000 / 10000`.
pub fn unit_interval(key: &str) -> f64 {
    let reduced = stable_hash(key).unsigned_abs() % ASSIGNMENT_HASH_BUCKETS;
    reduced as f64 / ASSIGNMENT_HASH_BUCKETS as f64
}

/// Pick the first bucket whose cumulative weight reaches the key's `r`.
///
/// Weights are not normalized. When rounding leaves every cumulative weight
/// below `r`, the first bucket is returned.
pub fn select_bucket<'a>(entity_key: &str, buckets: &'a [Bucket]) -> RecallResult<&'a Bucket> {
    let first = buckets.first().ok_or_else(|| {
        RecallError::ValidationError("bucket list must not be empty".into())
    })?;

    let r = unit_interval(entity_key);
    let mut cumulative = 0.0;
    for bucket in buckets {
        cumulative += bucket.weight;
        if cumulative >= r {
            return Ok(bucket);
        }
    }
    Ok(first)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_hash_is_deterministic() {
        assert_eq!(stable_hash("user-42"), stable_hash("user-42"));
        assert_ne!(stable_hash("user-42"), stable_hash("user-43"));
    }

    #[test]
    fn unit_interval_stays_in_range() {
        for i in 0..1_000 {
            let r = unit_interval(&format!("entity-{i}"));
            assert!((0.0..1.0).contains(&r), "r = {r}");
        }
    }

    #[test]
    fn empty_buckets_rejected() {
        let err = select_bucket("x", &[]).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn single_bucket_always_selected() {
        let buckets = vec![Bucket::new("only", 1.0)];
        for i in 0..100 {
            assert_eq!(select_bucket(&i.to_string(), &buckets).unwrap().bucket_id, "only");
        }
    }

    #[test]
    fn under_allocated_weights_fall_back_to_first() {
        // Cumulative weight never exceeds 0.0, so only keys with r == 0 match;
        // everything else falls back to the first bucket.
        let buckets = vec![Bucket::new("a", 0.0), Bucket::new("b", 0.0)];
        for i in 0..100 {
            assert_eq!(select_bucket(&format!("k{i}"), &buckets).unwrap().bucket_id, "a");
        }
    }

    #[test]
    fn split_roughly_follows_weights() {
        let buckets = vec![Bucket::new("control", 0.8), Bucket::new("treatment", 0.2)];
        let treatment = (0..10_000)
            .filter(|i| {
                select_bucket(&format!("user-{i}"), &buckets).unwrap().bucket_id == "treatment"
            })
            .count();
        assert!((1_500..2_500).contains(&treatment), "treatment = {treatment}");
    }
}
