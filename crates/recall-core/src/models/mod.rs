mod assignment;
mod cache_layer;
mod concept;
mod document;
mod query;
mod result;
mod stats;

pub use assignment::{Assignment, Bucket};
pub use cache_layer::CacheLayer;
pub use concept::ConceptUnit;
pub use document::{Document, VectorEntry};
pub use query::{QueryRequest, SortOrder};
pub use result::{PagedResult, QueryResponse, ResponseData, ScoredDocument, SearchResult};
pub use stats::{
    CacheStatistics, LayerStatistics, PartitionState, PartitionStats, TieredCacheStatistics,
};
