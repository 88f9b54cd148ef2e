mod cache_engine;
mod cache_observer;
mod embedding;
mod search_backend;

pub use cache_engine::ICacheEngine;
pub use cache_observer::ICacheObserver;
pub use embedding::IEmbeddingProvider;
pub use search_backend::ISearchBackend;
