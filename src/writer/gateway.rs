use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Instant;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info};
use crate::analysis::tokenizer::Tokenizer;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::state::IndexState;
use crate::core::types::{validate_document, DocId, Document, Fields};
use crate::index::field_index::PostingsDiff;
use crate::query::ast::Query;
use crate::search::executor::QueryEvaluator;
use crate::store::document_store::{merge_fields, StoreChange};
use crate::writer::batch::{BulkItem, BulkItemOutcome, BulkOperation, BulkResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOutcome {
    pub version: u64,
    pub created: bool,
}

/// Serializes writes per document id and publishes store and postings
/// changes together.
///
/// A write holds its id's stripe for the whole operation, prepares the new
/// document and its postings diff without the state lock, then takes the
/// write lock only to publish.
pub struct MutationGateway {
    state: Arc<RwLock<IndexState>>,
    stripes: Vec<Mutex<()>>,
    tokenizer: Arc<dyn Tokenizer>,
}

impl MutationGateway {
    pub fn new(state: Arc<RwLock<IndexState>>, stripes: usize) -> Self {
        let tokenizer = state.read().index.tokenizer();
        debug!(stripes, tokenizer = tokenizer.name(), "Mutation gateway created");
        MutationGateway {
            state,
            stripes: (0..stripes.max(1)).map(|_| Mutex::new(())).collect(),
            tokenizer,
        }
    }

    pub fn index(&self, id: DocId, fields: Fields) -> Result<WriteOutcome> {
        validate_document(&id, &fields)?;
        let _stripe = self.stripe(id.as_str()).lock();

        let base = self.current(id.as_str());
        self.publish(id, fields, base)
    }

    pub fn update(&self, id: &DocId, partial: Fields) -> Result<WriteOutcome> {
        let _stripe = self.stripe(id.as_str()).lock();

        let base = self
            .current(id.as_str())
            .ok_or_else(|| Error::new(ErrorKind::NotFound, format!("document '{}' not found", id)))?;
        let merged = merge_fields(&base.fields, partial);
        validate_document(id, &merged)?;
        self.publish(id.clone(), merged, Some(base))
    }

    pub fn delete(&self, id: &str) -> bool {
        let _stripe = self.stripe(id).lock();

        let Some(base) = self.current(id) else {
            return false;
        };
        let diff = PostingsDiff::between(self.tokenizer.as_ref(), Some(&base.fields), None);

        let mut state = self.state.write();
        let Some(change) = state.store.remove(id) else {
            return false;
        };
        Self::apply(&mut state, &change, diff, Some(&base));
        drop(state);

        debug!(id, version = change.version, "Document deleted");
        true
    }

    /// Runs every operation independently; one failure never stops the rest.
    pub fn bulk(&self, operations: Vec<BulkOperation>) -> BulkResponse {
        let start = Instant::now();
        let mut items = Vec::with_capacity(operations.len());

        for operation in operations {
            let (id, outcome) = match operation {
                BulkOperation::Index { id, fields } => {
                    let outcome = match self.index(id.clone(), fields) {
                        Ok(WriteOutcome { version, created: true }) => BulkItemOutcome::Created { version },
                        Ok(WriteOutcome { version, created: false }) => BulkItemOutcome::Updated { version },
                        Err(e) => BulkItemOutcome::Failed { reason: e.to_string() },
                    };
                    (id, outcome)
                }
                BulkOperation::Update { id, fields } => {
                    let outcome = match self.update(&id, fields) {
                        Ok(WriteOutcome { version, .. }) => BulkItemOutcome::Updated { version },
                        Err(e) => BulkItemOutcome::Failed { reason: e.to_string() },
                    };
                    (id, outcome)
                }
                BulkOperation::Delete { id } => {
                    let outcome = if self.delete(id.as_str()) {
                        BulkItemOutcome::Deleted
                    } else {
                        BulkItemOutcome::NotFound
                    };
                    (id, outcome)
                }
            };
            items.push(BulkItem { id, outcome });
        }

        let response = BulkResponse {
            items,
            took_ms: start.elapsed().as_millis() as u64,
        };
        info!(
            items = response.items.len(),
            failures = response.failure_count(),
            took_ms = response.took_ms,
            "Bulk request applied"
        );
        response
    }

    /// Matches once against a consistent snapshot, then deletes one by one.
    /// Documents removed concurrently in between are skipped and not counted.
    pub fn delete_by_query(&self, query: &Query) -> u64 {
        let ids = {
            let state = self.state.read();
            QueryEvaluator::new(&state).matching_ids(query)
        };

        let matched = ids.len();
        let deleted = ids.iter().filter(|id| self.delete(id.as_str())).count() as u64;
        info!(matched, deleted, "Delete by query finished");
        deleted
    }

    fn current(&self, id: &str) -> Option<Arc<Document>> {
        self.state.read().store.stored(id).map(|stored| stored.doc.clone())
    }

    fn publish(&self, id: DocId, fields: Fields, base: Option<Arc<Document>>) -> Result<WriteOutcome> {
        let diff = PostingsDiff::between(
            self.tokenizer.as_ref(),
            base.as_ref().map(|doc| &doc.fields),
            Some(&fields),
        );

        let mut state = self.state.write();
        let change = state.store.replace(id, fields);
        Self::apply(&mut state, &change, diff, base.as_ref());
        drop(state);

        let outcome = WriteOutcome {
            version: change.version,
            created: change.created(),
        };
        debug!(
            id = %change.current.as_ref().map(|doc| doc.id.as_str()).unwrap_or_default(),
            version = outcome.version,
            created = outcome.created,
            "Document indexed"
        );
        Ok(outcome)
    }

    /// Uses the prepared diff when the store still held the document it was
    /// prepared against, otherwise rebuilds the postings from the change.
    fn apply(state: &mut IndexState, change: &StoreChange, diff: PostingsDiff, base: Option<&Arc<Document>>) {
        let unchanged = match (&change.previous, base) {
            (Some(previous), Some(base)) => Arc::ptr_eq(previous, base),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            state.publish(change, diff);
        } else {
            debug!(version = change.version, "Document moved under a prepared write, reindexing");
            state.reindex(change);
        }
    }

    fn stripe(&self, id: &str) -> &Mutex<()> {
        let mut hasher = DefaultHasher::new();
        id.hash(&mut hasher);
        &self.stripes[(hasher.finish() as usize) % self.stripes.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use crate::core::json::fields_from_json;
    use crate::index::key::IndexKey;
    use serde_json::json;

    fn gateway() -> (Arc<RwLock<IndexState>>, MutationGateway) {
        let state = Arc::new(RwLock::new(IndexState::new()));
        let gateway = MutationGateway::new(state.clone(), 8);
        (state, gateway)
    }

    fn named(name: &str) -> Fields {
        fields_from_json(json!({ "name": name })).unwrap()
    }

    #[test]
    fn index_reports_created_then_updated() {
        let (_, gateway) = gateway();
        let first = gateway.index(DocId::from("a"), named("x")).unwrap();
        let second = gateway.index(DocId::from("a"), named("y")).unwrap();
        assert_eq!(first, WriteOutcome { version: 1, created: true });
        assert_eq!(second, WriteOutcome { version: 2, created: false });
    }

    #[test]
    fn publication_keeps_postings_in_step() {
        let (state, gateway) = gateway();
        gateway.index(DocId::from("a"), named("x")).unwrap();
        gateway.update(&DocId::from("a"), named("y")).unwrap();

        let state = state.read();
        assert!(state.index.term_lookup("name", &IndexKey::text("x")).is_empty());
        assert_eq!(state.index.term_lookup("name", &IndexKey::text("y")).len(), 1);
    }

    #[test]
    fn update_of_missing_document_fails_with_not_found() {
        let (_, gateway) = gateway();
        let err = gateway.update(&DocId::from("ghost"), named("x")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[test]
    fn bulk_failures_are_per_item() {
        let (_, gateway) = gateway();
        let response = gateway.bulk(vec![
            BulkOperation::Index { id: DocId::from("a"), fields: named("x") },
            BulkOperation::Index { id: DocId::from(""), fields: named("bad") },
            BulkOperation::Update { id: DocId::from("missing"), fields: named("y") },
            BulkOperation::Index { id: DocId::from("a"), fields: named("z") },
            BulkOperation::Delete { id: DocId::from("a") },
            BulkOperation::Delete { id: DocId::from("a") },
        ]);

        let outcomes = response.outcomes();
        assert_eq!(outcomes[0], &BulkItemOutcome::Created { version: 1 });
        assert!(outcomes[1].is_failure());
        assert!(outcomes[2].is_failure());
        assert_eq!(outcomes[3], &BulkItemOutcome::Updated { version: 2 });
        assert_eq!(outcomes[4], &BulkItemOutcome::Deleted);
        assert_eq!(outcomes[5], &BulkItemOutcome::NotFound);
        assert_eq!(response.failure_count(), 2);
    }

    #[test]
    fn concurrent_writers_on_one_id_serialize_versions() {
        let (state, gateway) = gateway();
        let gateway = Arc::new(gateway);
        gateway.index(DocId::from("counter"), named("start")).unwrap();

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let gateway = gateway.clone();
                thread::spawn(move || {
                    for i in 0..25 {
                        gateway
                            .update(&DocId::from("counter"), named(&format!("t{}-{}", t, i)))
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let state = state.read();
        let doc = state.store.get("counter").unwrap();
        assert_eq!(doc.version, 101);
        // exactly one name value is indexed for the document
        assert_eq!(state.index.exists_lookup("name").len(), 1);
        assert_eq!(state.index.term_count(), 1);
    }

    #[test]
    fn delete_by_query_counts_only_removed_documents() {
        let (_, gateway) = gateway();
        for (id, name) in [("a", "keep"), ("b", "drop"), ("c", "drop")] {
            gateway.index(DocId::from(id), named(name)).unwrap();
        }
        assert_eq!(gateway.delete_by_query(&Query::term("name", "drop")), 2);
        assert_eq!(gateway.delete_by_query(&Query::term("name", "drop")), 0);
    }
}
