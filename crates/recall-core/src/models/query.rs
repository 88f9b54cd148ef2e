use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Result ordering requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    #[serde(alias = "asc")]
    Asc,
    #[serde(alias = "desc")]
    Desc,
    #[default]
    #[serde(alias = "relevance")]
    Relevance,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
            Self::Relevance => "RELEVANCE",
        }
    }
}

/// A query as submitted by the API layer. Treated as immutable by the processor.
///
/// `limit` and `offset` stay signed so a malformed request can be rejected
/// with a validation error rather than failing deserialization.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryRequest {
    pub query_text: String,
    /// Precomputed query embedding. When present the vector backend skips
    /// embedding the text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_vector: Option<Vec<f32>>,
    pub fields: Vec<String>,
    /// Page size; `0` selects the configured default.
    pub limit: i64,
    pub offset: i64,
    pub filters: HashMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_field: Option<String>,
    pub sort_order: SortOrder,
    #[serde(rename = "enableFuzzy")]
    pub fuzzy: bool,
    pub min_score: f64,
}

impl QueryRequest {
    pub fn new(query_text: impl Into<String>) -> Self {
        Self {
            query_text: query_text.into(),
            ..Default::default()
        }
    }

    pub fn with_vector(mut self, vector: Vec<f32>) -> Self {
        self.query_vector = Some(vector);
        self
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_page(mut self, limit: i64, offset: i64) -> Self {
        self.limit = limit;
        self.offset = offset;
        self
    }

    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    pub fn with_sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort_field = Some(field.into());
        self.sort_order = order;
        self
    }

    pub fn with_fuzzy(mut self, fuzzy: bool) -> Self {
        self.fuzzy = fuzzy;
        self
    }

    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = min_score;
        self
    }
}
