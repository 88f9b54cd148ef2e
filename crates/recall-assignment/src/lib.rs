//! # recall-assignment
//!
//! Maps a stable key to one of N weighted buckets. The same entity always
//! lands in the same bucket: once an assignment exists for a
//! `(partition_key, entity_key)` pair it is memoized and never recomputed.
//!
//! The stateless [`select_bucket`] is reused for cache shard selection; the
//! memoizing [`ConsistentAssigner`] backs experiment-variant assignment.

pub mod assigner;
pub mod hashing;

pub use assigner::ConsistentAssigner;
pub use hashing::{select_bucket, stable_hash, unit_interval};
