use crate::core::stats::IndexStats;
use crate::core::types::Document;
use crate::index::field_index::{FieldIndex, PostingsDiff};
use crate::store::document_store::{DocumentStore, StoreChange};

/// Store and field index, published together under one lock so readers
/// never see a document version without its postings.
#[derive(Default)]
pub struct IndexState {
    pub store: DocumentStore,
    pub index: FieldIndex,
}

impl IndexState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a prepared postings diff for `change`.
    pub fn publish(&mut self, change: &StoreChange, diff: PostingsDiff) {
        self.index.apply(change.num, diff);
    }

    /// Recomputes the postings diff from the change itself.
    pub fn reindex(&mut self, change: &StoreChange) {
        let old = change.previous.as_ref().map(|doc| &doc.fields);
        let new = change.current.as_ref().map(|doc| &doc.fields);
        self.index.on_document_changed(change.num, old, new);
    }

    pub fn restore(&mut self, docs: Vec<Document>) {
        for doc in docs {
            let change = self.store.restore(doc);
            self.reindex(&change);
        }
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            doc_count: self.store.len(),
            field_count: self.index.field_count(),
            term_count: self.index.term_count(),
            token_count: self.index.token_count(),
            next_ordinal: self.store.next_ordinal(),
        }
    }
}
