use std::cmp::Ordering;
use std::sync::Arc;
use crate::core::types::Document;
use crate::index::flatten::values_at_path;
use crate::index::key::IndexKey;
use crate::search::request::{SortField, SortOrder, ID_FIELD};

/// Orders documents by the sort fields, then by id ascending.
/// Documents without a value for a sort field go last in either direction.
pub fn sort_documents(docs: Vec<Arc<Document>>, sort: &[SortField]) -> Vec<Arc<Document>> {
    let mut entries: Vec<(Vec<Option<IndexKey>>, Arc<Document>)> = docs
        .into_iter()
        .map(|doc| {
            let keys = sort.iter().map(|field| sort_key(&doc, field)).collect();
            (keys, doc)
        })
        .collect();

    entries.sort_by(|(a_keys, a), (b_keys, b)| {
        compare_keys(a_keys, b_keys, sort).then_with(|| a.id.cmp(&b.id))
    });

    entries.into_iter().map(|(_, doc)| doc).collect()
}

/// Multi-valued fields sort by their smallest value ascending and their
/// largest value descending.
fn sort_key(doc: &Document, field: &SortField) -> Option<IndexKey> {
    if field.field == ID_FIELD {
        return Some(IndexKey::text(doc.id.as_str()));
    }
    let keys = values_at_path(&doc.fields, &field.field)
        .into_iter()
        .filter_map(IndexKey::from_value);
    match field.order {
        SortOrder::Asc => keys.min(),
        SortOrder::Desc => keys.max(),
    }
}

fn compare_keys(a: &[Option<IndexKey>], b: &[Option<IndexKey>], sort: &[SortField]) -> Ordering {
    for ((left, right), field) in a.iter().zip(b).zip(sort) {
        let ordering = match (left, right) {
            (Some(x), Some(y)) => match field.order {
                SortOrder::Asc => x.cmp(y),
                SortOrder::Desc => y.cmp(x),
            },
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}
