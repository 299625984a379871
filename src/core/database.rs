use std::path::Path;
use std::sync::Arc;
use parking_lot::RwLock;
use tracing::info;
use crate::core::config::Config;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::state::IndexState;
use crate::core::stats::IndexStats;
use crate::core::types::{DocId, Document, Fields};
use crate::model::Entity;
use crate::query::ast::Query;
use crate::search::executor::{collect_matches, finish_search, QueryEvaluator};
use crate::search::request::SearchRequest;
use crate::search::results::SearchResults;
use crate::storage::snapshot::Snapshot;
use crate::writer::batch::{BulkOperation, BulkResponse};
use crate::writer::gateway::MutationGateway;

/// In-memory document search index.
///
/// Reads share one lock over the store and the field index; writes go
/// through the [`MutationGateway`], which serializes them per id.
pub struct SearchIndex {
    config: Config,
    state: Arc<RwLock<IndexState>>,
    gateway: MutationGateway,
}

impl SearchIndex {
    pub fn new(config: Config) -> Self {
        Self::with_state(IndexState::new(), config)
    }

    pub fn in_memory() -> Self {
        Self::new(Config::default())
    }

    /// Rebuilds an index from a snapshot, keeping every document's version.
    pub fn open_snapshot(path: impl AsRef<Path>, config: Config) -> Result<Self> {
        let path = path.as_ref();
        let snapshot = Snapshot::load(path)?;
        let doc_count = snapshot.documents.len();

        let mut state = IndexState::new();
        state.restore(snapshot.documents);

        info!(path = %path.display(), doc_count, created_at = %snapshot.header.created_at, "Snapshot loaded");
        Ok(Self::with_state(state, config))
    }

    fn with_state(state: IndexState, config: Config) -> Self {
        let state = Arc::new(RwLock::new(state));
        let gateway = MutationGateway::new(state.clone(), config.lock_stripes);
        SearchIndex { config, state, gateway }
    }

    /// Creates or fully replaces a document; returns its new version.
    pub fn index(&self, id: impl Into<DocId>, fields: Fields) -> Result<u64> {
        Ok(self.gateway.index(id.into(), fields)?.version)
    }

    /// Indexes under a freshly generated id.
    pub fn index_auto(&self, fields: Fields) -> Result<(DocId, u64)> {
        let id = DocId::generate();
        let version = self.index(id.clone(), fields)?;
        Ok((id, version))
    }

    pub fn index_entity<E: Entity>(&self, entity: &E) -> Result<u64> {
        self.index(entity.doc_id(), entity.to_fields()?)
    }

    pub fn get(&self, id: &str) -> Option<Document> {
        self.state.read().store.get(id)
    }

    pub fn exists(&self, id: &str) -> bool {
        self.state.read().store.exists(id)
    }

    /// One slot per requested id, in request order
    pub fn multi_get<S: AsRef<str>>(&self, ids: &[S]) -> Vec<Option<Document>> {
        self.state.read().store.multi_get(ids)
    }

    /// Merges `partial` over the top-level fields of an existing document.
    pub fn update(&self, id: impl Into<DocId>, partial: Fields) -> Result<u64> {
        Ok(self.gateway.update(&id.into(), partial)?.version)
    }

    pub fn delete(&self, id: &str) -> bool {
        self.gateway.delete(id)
    }

    pub fn bulk(&self, operations: impl Into<Vec<BulkOperation>>) -> BulkResponse {
        self.gateway.bulk(operations.into())
    }

    pub fn delete_by_query(&self, query: &Query) -> u64 {
        self.gateway.delete_by_query(query)
    }

    /// Matches under the read lock; sorting and hydration run after it
    /// is released.
    pub fn search(&self, request: &SearchRequest) -> SearchResults {
        let matched = {
            let state = self.state.read();
            collect_matches(&state, request, &self.config)
        };
        finish_search(matched, request, &self.config)
    }

    /// Number of documents matching `query`
    pub fn count(&self, query: &Query) -> u64 {
        let state = self.state.read();
        QueryEvaluator::new(&state).evaluate(query).len()
    }

    pub fn stats(&self) -> IndexStats {
        self.state.read().stats()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Writes a snapshot to `path`, or to the configured snapshot path.
    pub fn save_snapshot(&self, path: Option<&Path>) -> Result<u64> {
        let path = path
            .or(self.config.snapshot_path.as_deref())
            .ok_or_else(|| Error::new(ErrorKind::Io, "no snapshot path given or configured".to_string()))?;

        let snapshot = Snapshot::capture(&self.state.read().store);
        let bytes = snapshot.save(path)?;
        info!(path = %path.display(), doc_count = snapshot.header.doc_count, bytes, "Snapshot saved");
        Ok(bytes)
    }
}

impl Default for SearchIndex {
    fn default() -> Self {
        Self::in_memory()
    }
}
