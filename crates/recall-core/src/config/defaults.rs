// Single source of truth for all default values.

// --- Cache: L1 fast-answer ---
pub const DEFAULT_FAST_ANSWER_CAPACITY: u64 = 1_000;
pub const DEFAULT_FAST_ANSWER_TTL_SECS: u64 = 1_800; // 30 minutes

// --- Cache: L2 concept-unit ---
pub const DEFAULT_CONCEPT_UNIT_CAPACITY: u64 = 10_000;
pub const DEFAULT_CONCEPT_UNIT_TTL_SECS: u64 = 3_600; // 1 hour

// --- Cache: L3 derived-answer ---
pub const DEFAULT_DERIVED_ANSWER_CAPACITY: u64 = 500;
pub const DEFAULT_DERIVED_ANSWER_TTL_SECS: u64 = 600; // 10 minutes

// --- Cache: L4 retrieval-result ---
pub const DEFAULT_RETRIEVAL_RESULT_CAPACITY: u64 = 2_000;
pub const DEFAULT_RETRIEVAL_RESULT_TTL_SECS: u64 = 1_800; // 30 minutes
pub const DEFAULT_RETRIEVAL_SHARDS: usize = 4;

// --- Index ---
pub const DEFAULT_VECTOR_DIMENSIONS: usize = 768;
pub const DEFAULT_EMBEDDING_CACHE_SIZE: usize = 4_096;
pub const DEFAULT_LOAD_ON_START: bool = true;

// --- Query ---
pub const DEFAULT_LIMIT: usize = 10;
pub const DEFAULT_MAX_LIMIT: usize = 1_000;
pub const DEFAULT_MAX_CANDIDATES: usize = 1_000;
pub const DEFAULT_RRF_K: u32 = 60;
pub const DEFAULT_FUZZY_MIN_TERM_LEN: usize = 4;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = true;
pub const DEFAULT_METRICS_ENABLED: bool = true;
