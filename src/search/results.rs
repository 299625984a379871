use serde::de::DeserializeOwned;
use crate::core::error::Result;
use crate::core::json::deserialize_fields;
use crate::core::types::{DocId, Document};

/// Search results container
#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    pub hits: Vec<Hit>,
    /// Matches before paging
    pub total_hits: u64,
    pub took_ms: u64,
    /// Evaluation stopped early; `hits` and `total_hits` are partial
    pub timed_out: bool,
}

/// One page entry
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub id: DocId,
    pub version: u64,
    pub document: Document,
}

impl Hit {
    /// Converts the hit's source into a typed record
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        deserialize_fields(&self.document.fields)
    }
}

impl SearchResults {
    pub fn ids(&self) -> Vec<&str> {
        self.hits.iter().map(|hit| hit.id.as_str()).collect()
    }

    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        self.hits.iter().map(Hit::deserialize).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}
