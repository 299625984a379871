use std::collections::HashMap;
use std::sync::Arc;
use roaring::RoaringBitmap;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{validate_document, DocId, DocNum, Document, Fields};

/// A live document with its postings ordinal
#[derive(Debug, Clone)]
pub struct StoredDocument {
    pub num: DocNum,
    pub doc: Arc<Document>,
}

/// Result of one store mutation, carrying what the field index needs
#[derive(Debug, Clone)]
pub struct StoreChange {
    pub num: DocNum,
    pub version: u64,
    pub previous: Option<Arc<Document>>,
    pub current: Option<Arc<Document>>,
}

impl StoreChange {
    pub fn created(&self) -> bool {
        self.previous.is_none() && self.current.is_some()
    }
}

/// Owns document contents. Ordinals are handed out once and never reused.
#[derive(Debug, Default)]
pub struct DocumentStore {
    docs: HashMap<DocId, StoredDocument>,
    ordinals: HashMap<u32, DocId>,
    live: RoaringBitmap,
    next_ordinal: u32,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or fully replaces `id`, returning the new version.
    pub fn put(&mut self, id: impl Into<DocId>, fields: Fields) -> Result<u64> {
        let id = id.into();
        validate_document(&id, &fields)?;
        Ok(self.replace(id, fields).version)
    }

    pub fn get(&self, id: &str) -> Option<Document> {
        self.docs.get(id).map(|stored| (*stored.doc).clone())
    }

    /// Shallow merge per top-level key; nested values are replaced whole.
    pub fn update(&mut self, id: &str, partial: Fields) -> Result<u64> {
        let base = self
            .docs
            .get(id)
            .map(|stored| stored.doc.clone())
            .ok_or_else(|| Error::new(ErrorKind::NotFound, format!("document '{}' not found", id)))?;
        let merged = merge_fields(&base.fields, partial);
        validate_document(&base.id, &merged)?;
        Ok(self.replace(base.id.clone(), merged).version)
    }

    pub fn delete(&mut self, id: &str) -> bool {
        self.remove(id).is_some()
    }

    pub fn multi_get<S: AsRef<str>>(&self, ids: &[S]) -> Vec<Option<Document>> {
        ids.iter().map(|id| self.get(id.as_ref())).collect()
    }

    pub fn exists(&self, id: &str) -> bool {
        self.docs.contains_key(id)
    }

    pub fn stored(&self, id: &str) -> Option<&StoredDocument> {
        self.docs.get(id)
    }

    pub fn by_ordinal(&self, num: u32) -> Option<&StoredDocument> {
        self.ordinals.get(&num).and_then(|id| self.docs.get(id))
    }

    /// Ordinals of every live document
    pub fn live(&self) -> &RoaringBitmap {
        &self.live
    }

    /// Live ids in ascending order
    pub fn ids(&self) -> Vec<DocId> {
        let mut ids: Vec<DocId> = self.docs.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn documents(&self) -> impl Iterator<Item = &Arc<Document>> {
        self.docs.values().map(|stored| &stored.doc)
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn next_ordinal(&self) -> u32 {
        self.next_ordinal
    }

    /// Unvalidated write used by the mutation gateway after it validated
    /// the fields outside the publication lock.
    pub fn replace(&mut self, id: DocId, fields: Fields) -> StoreChange {
        let previous = self.docs.get(&id).cloned();
        let version = previous.as_ref().map(|p| p.doc.version + 1).unwrap_or(1);
        self.insert_at_version(id, fields, version, previous)
    }

    /// Writes a document with a known version, as snapshot restore does.
    pub fn restore(&mut self, doc: Document) -> StoreChange {
        let previous = self.docs.get(&doc.id).cloned();
        self.insert_at_version(doc.id, doc.fields, doc.version, previous)
    }

    pub fn remove(&mut self, id: &str) -> Option<StoreChange> {
        let stored = self.docs.remove(id)?;
        self.ordinals.remove(&stored.num.0);
        self.live.remove(stored.num.0);
        Some(StoreChange {
            num: stored.num,
            version: stored.doc.version,
            previous: Some(stored.doc),
            current: None,
        })
    }

    fn insert_at_version(
        &mut self,
        id: DocId,
        fields: Fields,
        version: u64,
        previous: Option<StoredDocument>,
    ) -> StoreChange {
        let num = match &previous {
            Some(stored) => stored.num,
            None => {
                let num = DocNum(self.next_ordinal);
                self.next_ordinal += 1;
                self.ordinals.insert(num.0, id.clone());
                self.live.insert(num.0);
                num
            }
        };

        let doc = Arc::new(Document::new(id.clone(), version, fields));
        self.docs.insert(id, StoredDocument { num, doc: doc.clone() });

        StoreChange {
            num,
            version,
            previous: previous.map(|stored| stored.doc),
            current: Some(doc),
        }
    }
}

/// `partial` keys overwrite `base` keys; everything else is kept.
pub fn merge_fields(base: &Fields, partial: Fields) -> Fields {
    let mut merged = base.clone();
    for (name, value) in partial {
        merged.insert(name, value);
    }
    merged
}
