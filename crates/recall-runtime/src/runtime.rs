//! RecallRuntime: owns every engine component for the life of the process.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use recall_assignment::ConsistentAssigner;
use recall_cache::TieredCache;
use recall_core::config::RecallConfig;
use recall_core::errors::{RecallError, RecallResult};
use recall_core::models::{
    Assignment, Bucket, CacheLayer, Document, PagedResult, PartitionStats, QueryRequest,
    QueryResponse, SearchResult, TieredCacheStatistics,
};
use recall_core::traits::{IEmbeddingProvider, ISearchBackend};
use recall_index::{PartitionIndex, PartitionVectorIndex};
use recall_observability::{init_tracing_with_config, MetricsCollector, MetricsSnapshot};
use recall_query::{build_backend, HashingEmbedder, QueryExecution, QueryProcessor};

/// Options for assembling the runtime.
#[derive(Default)]
pub struct RuntimeOptions {
    /// Parsed configuration. Ignored when `config_toml` is set.
    pub config: Option<RecallConfig>,
    /// TOML configuration string. If neither is set, defaults apply.
    pub config_toml: Option<String>,
    /// Embedding provider for query text and documents ingested without a
    /// vector. Defaults to the hashing embedder.
    pub embedder: Option<Arc<dyn IEmbeddingProvider>>,
    /// Search backend override. Defaults to the backend named in config.
    pub backend: Option<Arc<dyn ISearchBackend>>,
    /// Install the global tracing subscriber from the observability config.
    pub init_tracing: bool,
}

pub struct RecallRuntime {
    config: RecallConfig,
    cache: Arc<TieredCache>,
    registry: Arc<PartitionVectorIndex>,
    assigner: ConsistentAssigner,
    embedder: Arc<dyn IEmbeddingProvider>,
    processor: QueryProcessor,
    metrics: Arc<MetricsCollector>,
}

impl RecallRuntime {
    pub fn new(opts: RuntimeOptions) -> RecallResult<Self> {
        let config = match (&opts.config_toml, opts.config) {
            (Some(toml_str), _) => RecallConfig::from_toml(toml_str)?,
            (None, Some(config)) => {
                config.validate()?;
                config
            }
            (None, None) => RecallConfig::default(),
        };

        if opts.init_tracing {
            init_tracing_with_config(&config.observability);
        }

        // Metrics
        let metrics = Arc::new(MetricsCollector::new());

        // Cache
        let mut cache = TieredCache::new(&config.cache)?;
        if config.observability.metrics_enabled {
            cache = cache.with_observer(metrics.cache.clone());
        }
        let cache = Arc::new(cache);

        // Index
        let registry = Arc::new(PartitionVectorIndex::from_config(&config.index)?);
        if config.index.load_on_start {
            registry.load_all()?;
        }

        // Embeddings
        let embedder: Arc<dyn IEmbeddingProvider> = match opts.embedder {
            Some(embedder) => embedder,
            None => Arc::new(HashingEmbedder::new(config.index.dimensions)?),
        };
        if embedder.dimensions() != config.index.dimensions {
            return Err(RecallError::ConfigError(format!(
                "embedder {} produces {} dimensions, index expects {}",
                embedder.name(),
                embedder.dimensions(),
                config.index.dimensions
            )));
        }

        // Query
        let backend = match opts.backend {
            Some(backend) => backend,
            None => build_backend(
                &config.query,
                Arc::clone(&registry),
                Arc::clone(&embedder),
                config.index.embedding_cache_size,
            )?,
        };
        let processor = QueryProcessor::new(Arc::clone(&cache), backend, config.query.clone());

        info!(
            backend = processor.backend_name(),
            embedder = embedder.name(),
            partitions = registry.len(),
            "RecallRuntime initialized"
        );

        Ok(Self {
            config,
            cache,
            registry,
            assigner: ConsistentAssigner::new(),
            embedder,
            processor,
            metrics,
        })
    }

    /// Assemble from a config with every other option defaulted.
    pub fn from_config(config: RecallConfig) -> RecallResult<Self> {
        Self::new(RuntimeOptions {
            config: Some(config),
            ..Default::default()
        })
    }

    pub fn config(&self) -> &RecallConfig {
        &self.config
    }

    /// The tiered cache, for collaborators that fill the answer layers.
    pub fn cache(&self) -> &TieredCache {
        &self.cache
    }

    pub fn registry(&self) -> &PartitionVectorIndex {
        &self.registry
    }

    // --- partitions ---

    /// Register a role partition and load it.
    pub fn create_partition(&self, role: &str) -> RecallResult<Arc<PartitionIndex>> {
        let partition = self.registry.register(role)?;
        partition.load()?;
        Ok(partition)
    }

    pub fn load_partition(&self, role: &str) -> RecallResult<()> {
        self.registry.load(role)
    }

    pub fn unload_partition(&self, role: &str) -> RecallResult<bool> {
        let unloaded = self.registry.unload(role)?;
        self.invalidate_results();
        Ok(unloaded)
    }

    pub fn save_partition(&self, role: &str) -> RecallResult<()> {
        self.registry.save(role)
    }

    /// Snapshot every loaded partition. Returns how many were saved.
    pub fn save_all(&self) -> RecallResult<usize> {
        self.registry.save_all()
    }

    // --- ingestion ---

    fn embed_document(&self, document: &Document) -> RecallResult<Vec<f32>> {
        self.embedder
            .embed(&format!("{} {}", document.title, document.content))
    }

    /// Add one document to `role`, tagged with `sub_partition`. Without an
    /// embedding the document's title and content are embedded.
    pub fn ingest(
        &self,
        role: &str,
        sub_partition: &str,
        document: Document,
        embedding: Option<Vec<f32>>,
    ) -> RecallResult<()> {
        self.ingest_batch(role, sub_partition, vec![document], embedding.map(|e| vec![e]))
            .map(|_| ())
    }

    /// Add many documents at once, all or nothing.
    pub fn ingest_batch(
        &self,
        role: &str,
        sub_partition: &str,
        documents: Vec<Document>,
        embeddings: Option<Vec<Vec<f32>>>,
    ) -> RecallResult<usize> {
        let partition = self.registry.require(role)?;
        let vectors = match embeddings {
            Some(vectors) => vectors,
            None => documents
                .iter()
                .map(|d| self.embed_document(d))
                .collect::<RecallResult<Vec<_>>>()?,
        };
        let added = partition.add_documents(sub_partition, &documents, vectors)?;
        self.invalidate_results();
        info!(role, sub_partition, added, "documents ingested");
        Ok(added)
    }

    pub fn delete_document(&self, role: &str, document_id: &str) -> RecallResult<bool> {
        let removed = self.registry.require(role)?.delete(document_id)?;
        if removed {
            self.invalidate_results();
        }
        Ok(removed)
    }

    // Retrieval results depend on index contents; answer layers do not.
    fn invalidate_results(&self) {
        self.cache.clear_layer(CacheLayer::RetrievalResult);
    }

    // --- queries ---

    fn execute(&self, request: &QueryRequest) -> RecallResult<QueryExecution> {
        let started = Instant::now();
        match self.processor.execute(request) {
            Ok(execution) => {
                let latency = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
                self.metrics.query.record_success(execution.cache_hit, latency);
                Ok(execution)
            }
            Err(e) => {
                self.metrics.query.record_failure(e.code());
                Err(e)
            }
        }
    }

    pub fn process(&self, request: &QueryRequest) -> RecallResult<SearchResult> {
        Ok(self.execute(request)?.page.into())
    }

    pub fn process_paged(&self, request: &QueryRequest) -> RecallResult<PagedResult> {
        Ok(self.execute(request)?.page)
    }

    /// Inbound JSON query → outbound `{success, data, error}` JSON.
    pub fn handle_query_json(&self, body: &str) -> String {
        let response = match serde_json::from_str::<QueryRequest>(body) {
            Ok(request) => match self.process(&request) {
                Ok(result) => QueryResponse::ok(result),
                Err(e) => QueryResponse::failed(format!("{}: {e}", e.code())),
            },
            Err(e) => {
                let e = RecallError::from(e);
                self.metrics.query.record_failure(e.code());
                QueryResponse::failed(format!("{}: {e}", e.code()))
            }
        };
        match serde_json::to_string(&response) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "response serialization failed");
                serde_json::json!({
                    "success": false,
                    "data": null,
                    "error": format!("SERIALIZATION_ERROR: {e}"),
                })
                .to_string()
            }
        }
    }

    pub fn clear_caches(&self) {
        self.processor.clear_cache();
    }

    // --- experiments ---

    /// Assign `user_id` to a variant of `experiment`. Sticky once made.
    pub fn assign_variant(
        &self,
        experiment: &str,
        user_id: &str,
        variants: &[Bucket],
    ) -> RecallResult<Assignment> {
        self.assigner.assign(experiment, user_id, variants)
    }

    // --- read API ---

    pub fn get_assignment(&self, experiment: &str, user_id: &str) -> Option<Assignment> {
        self.assigner.lookup(experiment, user_id)
    }

    pub fn get_cache_statistics(&self) -> TieredCacheStatistics {
        self.processor.cache_statistics()
    }

    pub fn get_partition_statistics(&self, role: &str) -> RecallResult<PartitionStats> {
        self.registry.statistics(role)
    }

    pub fn get_all_partition_statistics(&self) -> RecallResult<Vec<PartitionStats>> {
        self.registry.all_statistics()
    }

    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}
