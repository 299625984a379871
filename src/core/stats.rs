use serde::{Serialize, Deserialize};

/// Point-in-time counters of an index
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    pub doc_count: usize,
    /// Distinct indexed leaf paths
    pub field_count: usize,
    /// Distinct (path, value) postings entries
    pub term_count: usize,
    /// Distinct (path, token) entries of the analyzed index
    pub token_count: usize,
    /// Next internal ordinal; ordinals are never reused
    pub next_ordinal: u32,
}
