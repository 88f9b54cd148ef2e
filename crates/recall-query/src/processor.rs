//! QueryProcessor: cache-aware query orchestration.
//!
//! RECEIVED → CACHE_CHECK → CACHE_HIT → RETURNED
//!                        ↘ CACHE_MISS → INDEX_SEARCH → FILTER → SORT
//!                          → PAGINATE → CACHE_POPULATE → RETURNED
//! Any error ends in FAILED. There is no stale fallback and no retry.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info_span, trace, warn};

use recall_cache::{CachedRetrieval, TieredCache};
use recall_core::config::QueryConfig;
use recall_core::errors::{RecallError, RecallResult};
use recall_core::models::{PagedResult, QueryRequest, SearchResult, TieredCacheStatistics};
use recall_core::traits::ISearchBackend;

use crate::cache_key::query_cache_key;
use crate::pagination::PageWindow;
use crate::ranking::{apply_filters, sort_candidates};

/// Lifecycle stage of one query, emitted as trace events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStage {
    Received,
    CacheCheck,
    CacheHit,
    CacheMiss,
    IndexSearch,
    Filter,
    Sort,
    Paginate,
    CachePopulate,
    Returned,
    Failed,
}

impl QueryStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Received => "RECEIVED",
            Self::CacheCheck => "CACHE_CHECK",
            Self::CacheHit => "CACHE_HIT",
            Self::CacheMiss => "CACHE_MISS",
            Self::IndexSearch => "INDEX_SEARCH",
            Self::Filter => "FILTER",
            Self::Sort => "SORT",
            Self::Paginate => "PAGINATE",
            Self::CachePopulate => "CACHE_POPULATE",
            Self::Returned => "RETURNED",
            Self::Failed => "FAILED",
        }
    }
}

/// Outcome of one processed query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryExecution {
    pub page: PagedResult,
    pub cache_hit: bool,
    pub cache_key: String,
}

pub struct QueryProcessor {
    cache: Arc<TieredCache>,
    backend: Arc<dyn ISearchBackend>,
    config: QueryConfig,
}

impl QueryProcessor {
    pub fn new(
        cache: Arc<TieredCache>,
        backend: Arc<dyn ISearchBackend>,
        config: QueryConfig,
    ) -> Self {
        Self {
            cache,
            backend,
            config,
        }
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    fn stage(stage: QueryStage) {
        trace!(stage = stage.as_str(), "query stage");
    }

    fn validate(&self, request: &QueryRequest) -> RecallResult<PageWindow> {
        let window = PageWindow::from_request(request, &self.config)?;
        if request.query_text.trim().is_empty() && request.query_vector.is_none() {
            return Err(RecallError::ValidationError(
                "query text or query vector is required".into(),
            ));
        }
        if let Some(vector) = &request.query_vector {
            if vector.is_empty() || vector.iter().any(|v| !v.is_finite()) {
                return Err(RecallError::ValidationError(
                    "query vector must be non-empty and finite".into(),
                ));
            }
        }
        if !request.min_score.is_finite() {
            return Err(RecallError::ValidationError(
                "minScore must be a finite number".into(),
            ));
        }
        Ok(window)
    }

    /// Run a query and report whether it was served from the cache.
    pub fn execute(&self, request: &QueryRequest) -> RecallResult<QueryExecution> {
        let started = Instant::now();
        let result = self.run(request, started);
        if let Err(e) = &result {
            Self::stage(QueryStage::Failed);
            warn!(code = e.code(), error = %e, "query failed");
        }
        result
    }

    fn run(&self, request: &QueryRequest, started: Instant) -> RecallResult<QueryExecution> {
        Self::stage(QueryStage::Received);
        let window = self.validate(request)?;
        let cache_key = query_cache_key(request);
        let span = info_span!("recall.query", key = %cache_key, backend = self.backend.name());
        let _entered = span.enter();

        Self::stage(QueryStage::CacheCheck);
        if let Some(cached) = self.cache.get_retrieval(&cache_key) {
            Self::stage(QueryStage::CacheHit);
            let page = window.apply(&cached.scored_documents, elapsed_ms(started));
            Self::stage(QueryStage::Returned);
            debug!(total_hits = page.total_hits, "served from cache");
            return Ok(QueryExecution {
                page,
                cache_hit: true,
                cache_key,
            });
        }
        Self::stage(QueryStage::CacheMiss);

        Self::stage(QueryStage::IndexSearch);
        let candidates = self.backend.search(request, self.config.max_candidates)?;
        let candidate_count = candidates.len();

        Self::stage(QueryStage::Filter);
        let mut hits = apply_filters(candidates, request);

        Self::stage(QueryStage::Sort);
        sort_candidates(&mut hits, request);

        Self::stage(QueryStage::Paginate);
        let page = window.apply(&hits, 0);

        Self::stage(QueryStage::CachePopulate);
        self.cache
            .put_retrieval(cache_key.clone(), CachedRetrieval::new(hits));

        let page = PagedResult {
            query_time_ms: elapsed_ms(started),
            ..page
        };
        Self::stage(QueryStage::Returned);
        debug!(
            candidates = candidate_count,
            total_hits = page.total_hits,
            elapsed_ms = page.query_time_ms,
            "query served from backend"
        );
        Ok(QueryExecution {
            page,
            cache_hit: false,
            cache_key,
        })
    }

    /// One page of results as a `SearchResult`.
    pub fn process(&self, request: &QueryRequest) -> RecallResult<SearchResult> {
        Ok(self.execute(request)?.page.into())
    }

    /// One page of results with navigation metadata.
    pub fn process_paged(&self, request: &QueryRequest) -> RecallResult<PagedResult> {
        Ok(self.execute(request)?.page)
    }

    pub fn clear_cache(&self) {
        self.cache.clear_all();
    }

    pub fn cache_statistics(&self) -> TieredCacheStatistics {
        self.cache.statistics()
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
