use crate::errors::RecallResult;
use crate::models::CacheLayer;

/// Receives one observation per cache access (external monitoring hook).
///
/// Failures are reported back but never fail the read path.
pub trait ICacheObserver: Send + Sync {
    fn record(&self, layer: CacheLayer, hit: bool) -> RecallResult<()>;
}
