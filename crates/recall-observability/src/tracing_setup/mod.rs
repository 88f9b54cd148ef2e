//! Tracing setup: structured logging for every Recall crate.

use std::sync::Once;

use recall_core::config::ObservabilityConfig;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "RECALL_LOG";

static INIT: Once = Once::new();

/// Initialize the tracing subscriber with structured JSON output.
///
/// Respects `RECALL_LOG` for filtering, defaulting to `info`. Only the first
/// call installs a subscriber.
pub fn init_tracing() {
    init_tracing_with_config(&ObservabilityConfig::default());
}

/// Initialize from config. `RECALL_LOG` still overrides `log_level`.
pub fn init_tracing_with_config(config: &ObservabilityConfig) {
    let level = config.log_level.clone();
    let json = config.json_logs;
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(&level));
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true);
        // A host application may already own the global subscriber.
        let _ = if json {
            builder.json().try_init()
        } else {
            builder.try_init()
        };
    });
}

/// Initialize tracing with a custom filter string (for tests or embedding).
pub fn init_tracing_with_filter(filter: &str) {
    let filter = filter.to_string();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(filter))
            .with_target(true)
            .json()
            .try_init();
    });
}
