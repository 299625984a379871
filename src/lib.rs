//! Embeddable in-memory document search index.
//!
//! Documents are JSON-like field maps stored under string ids. Every write
//! goes through the mutation gateway, which keeps the per-field postings in
//! step with the stored documents, and searches evaluate structured queries
//! (term, range, wildcard, match, bool) against those postings.

pub mod core;
pub mod analysis;
pub mod index;
pub mod query;
pub mod search;
pub mod store;
pub mod writer;
pub mod storage;
pub mod model;

pub use crate::core::config::Config;
pub use crate::core::database::SearchIndex;
pub use crate::core::error::{Error, ErrorKind, Result};
pub use crate::core::types::{DocId, Document, FieldValue, Fields};
pub use crate::query::ast::{BoolQuery, Query, RangeQuery};
pub use crate::search::request::{SearchRequest, SortField, SortOrder};
pub use crate::search::results::{Hit, SearchResults};
pub use crate::writer::batch::{BulkItemOutcome, BulkOperation, BulkRequest, BulkResponse};
