use serde::{Deserialize, Serialize};

/// Summary of one concept, the value type of the concept-unit cache layer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptUnit {
    pub concept_id: String,
    pub title: String,
    pub summary: String,
    #[serde(default)]
    pub document_ids: Vec<String>,
}
