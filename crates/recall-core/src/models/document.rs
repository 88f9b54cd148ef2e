use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::constants::{CONTENT_KEY, TITLE_KEY};

/// An already-parsed document handed over by the ingestion layer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl Document {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Value of a named field: `id`, `title`, `content`, or a metadata key.
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            "id" => Some(self.id.as_str()),
            TITLE_KEY => Some(self.title.as_str()),
            CONTENT_KEY => Some(self.content.as_str()),
            other => self.metadata.get(other).map(String::as_str),
        }
    }
}

/// One stored embedding. `partition_id` names the sub-partition (for example a
/// knowledge base) inside the role partition that owns the entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorEntry {
    pub document_id: String,
    pub partition_id: String,
    pub vector: Vec<f32>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl VectorEntry {
    pub fn new(
        document_id: impl Into<String>,
        partition_id: impl Into<String>,
        vector: Vec<f32>,
    ) -> Self {
        Self {
            document_id: document_id.into(),
            partition_id: partition_id.into(),
            vector,
            metadata: HashMap::new(),
        }
    }

    /// Pack a document and its embedding into an entry. Title and content ride
    /// in metadata under the reserved keys.
    pub fn from_document(
        document: &Document,
        partition_id: impl Into<String>,
        vector: Vec<f32>,
    ) -> Self {
        let mut metadata = document.metadata.clone();
        metadata.insert(TITLE_KEY.to_string(), document.title.clone());
        metadata.insert(CONTENT_KEY.to_string(), document.content.clone());
        Self {
            document_id: document.id.clone(),
            partition_id: partition_id.into(),
            vector,
            metadata,
        }
    }

    /// Rebuild the document this entry was created from.
    pub fn to_document(&self) -> Document {
        let mut metadata = self.metadata.clone();
        let title = metadata.remove(TITLE_KEY).unwrap_or_default();
        let content = metadata.remove(CONTENT_KEY).unwrap_or_default();
        Document {
            id: self.document_id.clone(),
            title,
            content,
            metadata,
        }
    }

    pub fn dimensions(&self) -> usize {
        self.vector.len()
    }
}
