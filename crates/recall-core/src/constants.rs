/// Recall system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Metadata key carrying a document's title inside a `VectorEntry`.
pub const TITLE_KEY: &str = "title";

/// Metadata key carrying a document's body inside a `VectorEntry`.
pub const CONTENT_KEY: &str = "content";

/// Filter key that routes a query to one role partition of the index.
pub const ROLE_FILTER_KEY: &str = "role";

/// Filter key that restricts a search to one sub-partition inside a role.
pub const PARTITION_FILTER_KEY: &str = "partition";

/// Fields searched by the lexical backend when a request names none.
pub const DEFAULT_SEARCH_FIELDS: &[&str] = &[TITLE_KEY, CONTENT_KEY];

/// Resolution of the consistent-assignment hash reduction (`|h| mod N / N`).
pub const ASSIGNMENT_HASH_BUCKETS: u64 = 10_000;

/// Snapshot file extension for persisted partitions.
pub const SNAPSHOT_EXTENSION: &str = "rvi";

/// Maximum batch size accepted by a single `add_batch` call.
pub const MAX_BATCH_SIZE: usize = 10_000;
