use std::time::Duration;
use serde::{Serialize, Deserialize};
use crate::query::ast::Query;

/// Sorts by document id instead of a field value
pub const ID_FIELD: &str = "_id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortField {
    pub field: String,
    pub order: SortOrder,
}

impl SortField {
    pub fn asc(field: impl Into<String>) -> Self {
        SortField {
            field: field.into(),
            order: SortOrder::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        SortField {
            field: field.into(),
            order: SortOrder::Desc,
        }
    }
}

/// Query plus post-filter, ordering and paging
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: Query,
    pub post_filter: Option<Query>,
    pub sort: Vec<SortField>,
    pub from: usize,
    /// `None` takes `Config::default_page_size`
    pub size: Option<usize>,
    pub timeout: Option<Duration>,
}

impl SearchRequest {
    pub fn new(query: impl Into<Query>) -> Self {
        SearchRequest {
            query: query.into(),
            ..SearchRequest::default()
        }
    }

    pub fn match_all() -> Self {
        Self::new(Query::MatchAll)
    }

    pub fn post_filter(mut self, filter: impl Into<Query>) -> Self {
        self.post_filter = Some(filter.into());
        self
    }

    pub fn sort(mut self, sort: SortField) -> Self {
        self.sort.push(sort);
        self
    }

    pub fn from(mut self, from: usize) -> Self {
        self.from = from;
        self
    }

    pub fn size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
