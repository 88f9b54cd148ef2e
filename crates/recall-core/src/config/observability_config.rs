use serde::{Deserialize, Serialize};

use super::defaults;

/// Logging and metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Fallback filter when `RECALL_LOG` is unset.
    pub log_level: String,
    pub json_logs: bool,
    /// Forward cache hit/miss observations to the metrics collector.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::DEFAULT_LOG_LEVEL.to_string(),
            json_logs: defaults::DEFAULT_JSON_LOGS,
            metrics_enabled: defaults::DEFAULT_METRICS_ENABLED,
        }
    }
}
