//! # recall-index
//!
//! Nearest-neighbour search over role partitions.
//!
//! ## Architecture
//!
//! ```text
//! PartitionVectorIndex (DashMap<partition_id, Arc<PartitionIndex>>)
//! └── PartitionIndex
//!     ├── RwLock<Option<LoadedPartition>>   None = UNLOADED
//!     │   └── document_id → (VectorEntry, seq, norm)
//!     ├── save mutex                        serialises snapshot writes
//!     └── snapshot file                     <snapshot_dir>/<partition>.rvi
//! ```
//!
//! Search is a brute-force cosine scan with a bounded min-heap (O(n log k)).

pub mod partition;
pub mod registry;
pub mod similarity;
pub mod snapshot;
pub mod topk;

pub use partition::PartitionIndex;
pub use registry::PartitionVectorIndex;
pub use similarity::{cosine_similarity, l2_norm};
pub use topk::TopK;
