use serde::{Deserialize, Serialize};

use super::Document;

/// A document paired with its relevance score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    pub document: Document,
    pub score: f64,
}

impl ScoredDocument {
    pub fn new(document: Document, score: f64) -> Self {
        Self { document, score }
    }
}

/// One page of results plus the pre-pagination hit count.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub documents: Vec<Document>,
    pub scored_documents: Vec<ScoredDocument>,
    pub total_hits: u64,
    pub query_time_ms: u64,
}

/// A page with navigation metadata.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult {
    pub items: Vec<ScoredDocument>,
    pub total_hits: u64,
    pub page_size: u64,
    /// Zero-based page index.
    pub current_page: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_previous: bool,
    pub query_time_ms: u64,
}

/// One page reduced to its documents and hit count.
impl From<PagedResult> for SearchResult {
    fn from(page: PagedResult) -> Self {
        Self {
            documents: page.items.iter().map(|s| s.document.clone()).collect(),
            total_hits: page.total_hits,
            query_time_ms: page.query_time_ms,
            scored_documents: page.items,
        }
    }
}

/// Payload of a successful query response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseData {
    pub documents: Vec<Document>,
    pub total_hits: u64,
    pub query_time_ms: u64,
}

/// Outbound response envelope: `{success, data, error}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub success: bool,
    pub data: Option<ResponseData>,
    pub error: Option<String>,
}

impl QueryResponse {
    pub fn ok(result: SearchResult) -> Self {
        Self {
            success: true,
            data: Some(ResponseData {
                documents: result.documents,
                total_hits: result.total_hits,
                query_time_ms: result.query_time_ms,
            }),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}
