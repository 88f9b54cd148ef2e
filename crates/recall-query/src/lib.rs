//! # recall-query
//!
//! Orchestrates a query through the tiered cache and a search backend.
//!
//! ## Architecture
//!
//! ```text
//! QueryProcessor
//! ├── cache_key     deterministic key (normalized text, vector hash, sorted filters, ...)
//! ├── TieredCache   L4 retrieval-result lookup / populate
//! ├── backend       ISearchBackend on miss
//! │   ├── VectorSearchBackend   cosine over PartitionVectorIndex, rayon across partitions
//! │   ├── LexicalSearchBackend  term overlap, optional fuzzy matching
//! │   └── HybridSearchBackend   reciprocal rank fusion of the two
//! ├── ranking       min-score + metadata filters, relevance / field sort
//! └── pagination    offset/limit → PagedResult
//! ```

pub mod backend;
pub mod cache_key;
pub mod embedder;
pub mod pagination;
pub mod processor;
pub mod ranking;

pub use backend::{build_backend, HybridSearchBackend, LexicalSearchBackend, VectorSearchBackend};
pub use cache_key::query_cache_key;
pub use embedder::HashingEmbedder;
pub use processor::{QueryExecution, QueryProcessor, QueryStage};
