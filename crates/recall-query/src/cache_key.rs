//! Deterministic retrieval-cache keys.
//!
//! Two requests that must return the same filtered, sorted result map to the
//! same key regardless of filter insertion order, field order, or cosmetic
//! differences in the query text.

use std::collections::BTreeMap;

use recall_cache::normalize_key;
use recall_core::models::QueryRequest;

/// Append `part` as `<byte len>:<part>` so no value can imitate a boundary.
fn push_part(out: &mut String, part: &str) {
    out.push_str(&part.len().to_string());
    out.push(':');
    out.push_str(part);
}

/// blake3 hex of the query embedding's little-endian bytes.
pub fn vector_fingerprint(vector: &[f32]) -> String {
    let mut hasher = blake3::Hasher::new();
    for v in vector {
        hasher.update(&v.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

/// Canonical form hashed into the key. Every component, field, filter key
/// and filter value is length-prefixed. Exposed for debugging.
pub fn canonical_form(request: &QueryRequest) -> String {
    let filters: BTreeMap<&str, &str> = request
        .filters
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    let mut filter_part = String::new();
    for (k, v) in filters {
        push_part(&mut filter_part, k);
        push_part(&mut filter_part, v);
    }

    let mut fields: Vec<&str> = request.fields.iter().map(String::as_str).collect();
    fields.sort_unstable();
    fields.dedup();
    let mut field_part = String::new();
    for field in fields {
        push_part(&mut field_part, field);
    }

    let vector = request
        .query_vector
        .as_deref()
        .map(vector_fingerprint)
        .unwrap_or_default();

    let mut out = String::new();
    for part in [
        normalize_key(&request.query_text),
        vector,
        field_part,
        request.limit.to_string(),
        request.offset.to_string(),
        filter_part,
        request.sort_field.clone().unwrap_or_default(),
        request.sort_order.as_str().to_string(),
        request.fuzzy.to_string(),
        format!("{:016x}", request.min_score.to_bits()),
    ] {
        push_part(&mut out, &part);
    }
    out
}

/// The L4 cache key for `request`.
pub fn query_cache_key(request: &QueryRequest) -> String {
    format!("q:{}", blake3::hash(canonical_form(request).as_bytes()).to_hex())
}
