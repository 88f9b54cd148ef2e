mod cache_error;
mod persistence_error;
mod recall_error;

pub use cache_error::CacheError;
pub use persistence_error::PersistenceError;
pub use recall_error::RecallError;

/// Result alias used throughout the workspace.
pub type RecallResult<T> = Result<T, RecallError>;
