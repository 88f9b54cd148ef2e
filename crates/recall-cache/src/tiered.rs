//! TieredCache: four independently configured cache layers.
//!
//! Questions are keyed by their normalized form; concepts by trimmed id;
//! retrieval results by the processor's query key. Every access reports a
//! hit or miss to the optional observer. Observer failures are logged and
//! never surface to the caller.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use recall_assignment::select_bucket;
use recall_core::config::{CacheConfig, CacheEngineKind, LayerConfig};
use recall_core::errors::RecallResult;
use recall_core::models::{
    Bucket, CacheLayer, CacheStatistics, ConceptUnit, LayerStatistics, TieredCacheStatistics,
};
use recall_core::traits::{ICacheEngine, ICacheObserver};

use crate::bounded::BoundedCache;
use crate::normalize::normalize_key;
use crate::retrieval::CachedRetrieval;
use crate::ttl::TtlCache;

type Engine<V> = Box<dyn ICacheEngine<String, V>>;

/// Build one layer engine. The backend is a configuration detail.
fn build_engine<V>(config: &LayerConfig, capacity: u64) -> RecallResult<Engine<V>>
where
    V: Clone + Send + Sync + 'static,
{
    Ok(match config.engine {
        CacheEngineKind::Moka => Box::new(TtlCache::new(
            capacity,
            Duration::from_secs(config.ttl_secs),
            config.expiration,
        )?),
        CacheEngineKind::Lru => Box::new(BoundedCache::new(capacity as usize)?),
    })
}

/// The four-layer cache.
pub struct TieredCache {
    fast_answer: Engine<String>,
    concept_unit: Engine<ConceptUnit>,
    derived_answer: Engine<String>,
    retrieval_shards: Vec<Engine<CachedRetrieval>>,
    shard_buckets: Vec<Bucket>,
    observer: Option<Arc<dyn ICacheObserver>>,
}

impl TieredCache {
    /// Build all layers from config. The retrieval layer's capacity is split
    /// evenly across `retrieval_shards` engines.
    pub fn new(config: &CacheConfig) -> RecallResult<Self> {
        let shards = config.retrieval_shards.max(1);
        let per_shard = config
            .retrieval_result
            .capacity
            .div_ceil(shards as u64)
            .max(1);
        let retrieval_shards = (0..shards)
            .map(|_| build_engine(&config.retrieval_result, per_shard))
            .collect::<RecallResult<Vec<_>>>()?;

        info!(
            fast_answer = config.fast_answer.capacity,
            concept_unit = config.concept_unit.capacity,
            derived_answer = config.derived_answer.capacity,
            retrieval_result = config.retrieval_result.capacity,
            shards,
            "TieredCache initialized"
        );

        Ok(Self {
            fast_answer: build_engine(&config.fast_answer, config.fast_answer.capacity)?,
            concept_unit: build_engine(&config.concept_unit, config.concept_unit.capacity)?,
            derived_answer: build_engine(
                &config.derived_answer,
                config.derived_answer.capacity,
            )?,
            retrieval_shards,
            shard_buckets: Bucket::uniform(shards),
            observer: None,
        })
    }

    /// Forward every hit/miss observation to `observer`.
    pub fn with_observer(mut self, observer: Arc<dyn ICacheObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    fn observe<V>(&self, layer: CacheLayer, key: &str, value: Option<V>) -> Option<V> {
        let hit = value.is_some();
        debug!(layer = layer.name(), key, hit, "cache access");
        if let Some(observer) = &self.observer {
            if let Err(e) = observer.record(layer, hit) {
                warn!(layer = layer.name(), error = %e, "cache observer failed");
            }
        }
        value
    }

    // --- L1 fast-answer ---

    pub fn get_fast_answer(&self, question: &str) -> Option<String> {
        let key = normalize_key(question);
        let value = self.fast_answer.get(&key);
        self.observe(CacheLayer::FastAnswer, &key, value)
    }

    pub fn put_fast_answer(&self, question: &str, answer: impl Into<String>) {
        self.fast_answer.put(normalize_key(question), answer.into());
    }

    // --- L2 concept-unit ---

    pub fn get_concept(&self, concept_id: &str) -> Option<ConceptUnit> {
        let key = concept_id.trim();
        let value = self.concept_unit.get(&key.to_string());
        self.observe(CacheLayer::ConceptUnit, key, value)
    }

    pub fn put_concept(&self, concept: ConceptUnit) {
        self.concept_unit
            .put(concept.concept_id.trim().to_string(), concept);
    }

    /// Drop a concept whose source documents changed.
    pub fn invalidate_concept(&self, concept_id: &str) -> Option<ConceptUnit> {
        self.concept_unit.remove(&concept_id.trim().to_string())
    }

    // --- L3 derived-answer ---

    pub fn get_derived_answer(&self, question: &str) -> Option<String> {
        let key = normalize_key(question);
        let value = self.derived_answer.get(&key);
        self.observe(CacheLayer::DerivedAnswer, &key, value)
    }

    pub fn put_derived_answer(&self, question: &str, answer: impl Into<String>) {
        self.derived_answer.put(normalize_key(question), answer.into());
    }

    // --- L4 retrieval-result ---

    fn shard_for(&self, key: &str) -> &Engine<CachedRetrieval> {
        let index = select_bucket(key, &self.shard_buckets)
            .ok()
            .and_then(|b| b.bucket_id.parse::<usize>().ok())
            .unwrap_or(0);
        &self.retrieval_shards[index.min(self.retrieval_shards.len() - 1)]
    }

    /// Look up a retrieval result by query cache key (already canonical).
    pub fn get_retrieval(&self, key: &str) -> Option<CachedRetrieval> {
        let value = self.shard_for(key).get(&key.to_string());
        self.observe(CacheLayer::RetrievalResult, key, value)
    }

    pub fn put_retrieval(&self, key: String, value: CachedRetrieval) {
        self.shard_for(&key).put(key, value);
    }

    // --- global ---

    pub fn clear_all(&self) {
        for layer in CacheLayer::ALL {
            self.clear_layer(layer);
        }
    }

    pub fn clear_layer(&self, layer: CacheLayer) {
        match layer {
            CacheLayer::FastAnswer => self.fast_answer.clear(),
            CacheLayer::ConceptUnit => self.concept_unit.clear(),
            CacheLayer::DerivedAnswer => self.derived_answer.clear(),
            CacheLayer::RetrievalResult => {
                for shard in &self.retrieval_shards {
                    shard.clear();
                }
            }
        }
        info!(layer = layer.name(), "cache layer cleared");
    }

    /// Clear a layer by its 1-based number.
    pub fn clear_layer_index(&self, index: u8) -> RecallResult<()> {
        self.clear_layer(CacheLayer::from_index(index)?);
        Ok(())
    }

    /// Raw counters of one layer (shards merged).
    pub fn layer_statistics(&self, layer: CacheLayer) -> CacheStatistics {
        match layer {
            CacheLayer::FastAnswer => self.fast_answer.statistics(),
            CacheLayer::ConceptUnit => self.concept_unit.statistics(),
            CacheLayer::DerivedAnswer => self.derived_answer.statistics(),
            CacheLayer::RetrievalResult => {
                let parts: Vec<CacheStatistics> =
                    self.retrieval_shards.iter().map(|s| s.statistics()).collect();
                CacheStatistics::merge(&parts)
            }
        }
    }

    /// Per-layer size and hit rate.
    pub fn statistics(&self) -> TieredCacheStatistics {
        let layers = CacheLayer::ALL
            .into_iter()
            .map(|layer| {
                let s = self.layer_statistics(layer);
                LayerStatistics {
                    layer,
                    capacity: s.max_size,
                    size: s.current_size,
                    hits: s.hit_count,
                    misses: s.miss_count,
                    evictions: s.eviction_count,
                    hit_rate: s.hit_rate,
                }
            })
            .collect();
        TieredCacheStatistics { layers }
    }

    pub fn retrieval_shard_count(&self) -> usize {
        self.retrieval_shards.len()
    }
}
