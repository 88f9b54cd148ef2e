//! Configuration for every subsystem, loaded from TOML.
//!
//! All sections use `#[serde(default)]`, so an empty document yields the
//! defaults in [`defaults`].

mod cache_config;
pub mod defaults;
mod index_config;
mod observability_config;
mod query_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{RecallError, RecallResult};

pub use cache_config::{CacheConfig, CacheEngineKind, ExpirationPolicy, LayerConfig};
pub use index_config::IndexConfig;
pub use observability_config::ObservabilityConfig;
pub use query_config::{BackendKind, QueryConfig};

/// Root configuration handed to the runtime as plain constructor input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecallConfig {
    pub cache: CacheConfig,
    pub index: IndexConfig,
    pub query: QueryConfig,
    pub observability: ObservabilityConfig,
}

impl RecallConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(toml_str: &str) -> RecallResult<Self> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| RecallError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a TOML file.
    pub fn from_file(path: &Path) -> RecallResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RecallError::ConfigError(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Serialize back to TOML.
    pub fn to_toml(&self) -> RecallResult<String> {
        toml::to_string(self).map_err(|e| RecallError::ConfigError(e.to_string()))
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> RecallResult<()> {
        let layers = [
            ("fast_answer", &self.cache.fast_answer),
            ("concept_unit", &self.cache.concept_unit),
            ("derived_answer", &self.cache.derived_answer),
            ("retrieval_result", &self.cache.retrieval_result),
        ];
        for (name, layer) in layers {
            if layer.capacity == 0 {
                return Err(RecallError::ConfigError(format!(
                    "cache.{name}.capacity must be at least 1"
                )));
            }
            if layer.ttl_secs == 0 {
                return Err(RecallError::ConfigError(format!(
                    "cache.{name}.ttl_secs must be at least 1"
                )));
            }
        }
        if self.cache.retrieval_shards == 0 {
            return Err(RecallError::ConfigError(
                "cache.retrieval_shards must be at least 1".into(),
            ));
        }
        if self.index.dimensions == 0 {
            return Err(RecallError::ConfigError(
                "index.dimensions must be at least 1".into(),
            ));
        }
        if self.index.embedding_cache_size == 0 {
            return Err(RecallError::ConfigError(
                "index.embedding_cache_size must be at least 1".into(),
            ));
        }
        if self.query.default_limit == 0 || self.query.default_limit > self.query.max_limit {
            return Err(RecallError::ConfigError(format!(
                "query.default_limit must be in 1..={}",
                self.query.max_limit
            )));
        }
        if self.query.max_candidates == 0 {
            return Err(RecallError::ConfigError(
                "query.max_candidates must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
