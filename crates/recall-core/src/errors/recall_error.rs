use super::{CacheError, PersistenceError};

/// Top-level error for every Recall subsystem.
#[derive(Debug, thiserror::Error)]
pub enum RecallError {
    /// Malformed request or argument. Never retried internally.
    #[error("validation failed: {0}")]
    ValidationError(String),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("partition not loaded: {partition_id}")]
    NotLoaded { partition_id: String },

    #[error("not found: {id}")]
    NotFound { id: String },

    #[error("index unavailable: {reason}")]
    IndexUnavailable { reason: String },

    #[error("persistence error: {0}")]
    PersistenceError(#[from] PersistenceError),

    #[error("cache error: {0}")]
    CacheError(#[from] CacheError),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("concurrency error: {0}")]
    ConcurrencyError(String),
}

impl RecallError {
    /// Whether the error was caused by the caller's input.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_))
    }

    /// Stable machine-readable code for the outbound response contract.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::ConfigError(_) => "CONFIGURATION_ERROR",
            Self::NotLoaded { .. } => "NOT_LOADED",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::IndexUnavailable { .. } => "INDEX_UNAVAILABLE",
            Self::PersistenceError(_) => "IO_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::SerializationError(_) => "SERIALIZATION_ERROR",
            Self::ConcurrencyError(_) => "CONCURRENCY_ERROR",
        }
    }
}
