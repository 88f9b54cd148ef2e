//! # recall-runtime
//!
//! Wires configuration into a running engine. Every collaborator is built
//! in [`RecallRuntime::new`] and handed over explicitly; there is no global
//! state.
//!
//! ```text
//! RecallConfig ─► RecallRuntime
//!                 ├── TieredCache ◄── CacheMetrics (observer)
//!                 ├── PartitionVectorIndex
//!                 ├── ConsistentAssigner
//!                 ├── IEmbeddingProvider (HashingEmbedder unless injected)
//!                 └── QueryProcessor ─► ISearchBackend (vector | lexical | hybrid)
//! ```

pub mod runtime;

pub use runtime::{RecallRuntime, RuntimeOptions};
