use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{CacheError, RecallResult};

/// The four layers of the tiered cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheLayer {
    FastAnswer,
    ConceptUnit,
    DerivedAnswer,
    RetrievalResult,
}

impl CacheLayer {
    pub const ALL: [CacheLayer; 4] = [
        CacheLayer::FastAnswer,
        CacheLayer::ConceptUnit,
        CacheLayer::DerivedAnswer,
        CacheLayer::RetrievalResult,
    ];

    /// Layer by its 1-based number (L1..L4).
    pub fn from_index(index: u8) -> RecallResult<Self> {
        match index {
            1 => Ok(Self::FastAnswer),
            2 => Ok(Self::ConceptUnit),
            3 => Ok(Self::DerivedAnswer),
            4 => Ok(Self::RetrievalResult),
            _ => Err(CacheError::InvalidLayer { index }.into()),
        }
    }

    pub fn index(self) -> u8 {
        match self {
            Self::FastAnswer => 1,
            Self::ConceptUnit => 2,
            Self::DerivedAnswer => 3,
            Self::RetrievalResult => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::FastAnswer => "fast_answer",
            Self::ConceptUnit => "concept_unit",
            Self::DerivedAnswer => "derived_answer",
            Self::RetrievalResult => "retrieval_result",
        }
    }
}

impl fmt::Display for CacheLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{} {}", self.index(), self.name())
    }
}
