//! # recall-cache
//!
//! Cache primitives and the four-layer tiered cache.
//!
//! ## Architecture
//!
//! ```text
//! TieredCache
//! ├── L1 fast-answer      (normalized question → answer)
//! ├── L2 concept-unit     (concept id → ConceptUnit)
//! ├── L3 derived-answer   (normalized question → derived answer)
//! └── L4 retrieval-result (query key → CachedRetrieval, sharded)
//!
//! each layer: Box<dyn ICacheEngine>
//! ├── TtlCache     (moka, expire-after-write / expire-after-access)
//! └── BoundedCache (strict LRU, hit/miss/eviction accounting)
//! ```

pub mod bounded;
pub mod normalize;
pub mod retrieval;
pub mod tiered;
pub mod ttl;

pub use bounded::BoundedCache;
pub use normalize::normalize_key;
pub use retrieval::CachedRetrieval;
pub use tiered::TieredCache;
pub use ttl::TtlCache;
