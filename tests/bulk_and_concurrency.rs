mod common;

use std::sync::Arc;
use std::thread;
use serde_json::json;
use pocketsearch::core::types::FieldValue;
use pocketsearch::{BulkItemOutcome, BulkRequest, Query, SearchIndex, SearchRequest};
use common::fields;

#[test]
fn bulk_reports_every_item_in_order() {
    let index = SearchIndex::in_memory();
    index.index("existing", fields(json!({ "n": 0 }))).unwrap();

    let request = BulkRequest::new()
        .index("a", fields(json!({ "n": 1 })))
        .index("existing", fields(json!({ "n": 2 })))
        .index("bad", fields(json!({ "x.y": 1 })))
        .update("a", fields(json!({ "m": 1 })))
        .update("ghost", fields(json!({ "m": 1 })))
        .delete("existing")
        .delete("never");
    let response = index.bulk(request);

    assert_eq!(response.items.len(), 7);
    let ids: Vec<&str> = response.items.iter().map(|item| item.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "existing", "bad", "a", "ghost", "existing", "never"]);

    let outcomes = response.outcomes();
    assert_eq!(outcomes[0], &BulkItemOutcome::Created { version: 1 });
    assert_eq!(outcomes[1], &BulkItemOutcome::Updated { version: 2 });
    assert!(outcomes[2].is_failure());
    assert_eq!(outcomes[3], &BulkItemOutcome::Updated { version: 2 });
    assert!(outcomes[4].is_failure());
    assert_eq!(outcomes[5], &BulkItemOutcome::Deleted);
    assert_eq!(outcomes[6], &BulkItemOutcome::NotFound);
    assert_eq!(response.failure_count(), 2);
    assert!(response.has_failures());

    assert_eq!(index.get("a").unwrap().fields, fields(json!({ "n": 1, "m": 1 })));
    assert!(index.get("bad").is_none());
    assert!(index.get("existing").is_none());
}

#[test]
fn clean_bulk_has_no_failures() {
    let index = SearchIndex::in_memory();
    let request = BulkRequest::new().index("a", fields(json!({ "n": 1 }))).delete("a");
    assert_eq!(request.len(), 2);
    assert!(BulkRequest::new().is_empty());

    let response = index.bulk(request);
    assert!(!response.has_failures());
    assert_eq!(response.outcomes(), vec![&BulkItemOutcome::Created { version: 1 }, &BulkItemOutcome::Deleted]);
}

#[test]
fn concurrent_writers_on_distinct_ids() {
    let index = Arc::new(SearchIndex::in_memory());

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let index = index.clone();
            thread::spawn(move || {
                for i in 0..50 {
                    let id = format!("t{}-{}", t, i);
                    index.index(id.clone(), fields(json!({ "thread": t, "i": i }))).unwrap();
                    if i % 5 == 0 {
                        assert!(index.delete(&id));
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(index.stats().doc_count, 8 * 40);
    assert_eq!(index.count(&Query::term("thread", 3)), 40);
    assert_eq!(index.count(&Query::MatchAll), 8 * 40);
}

#[test]
fn readers_never_see_stale_postings() {
    let index = Arc::new(SearchIndex::in_memory());
    for i in 0..20 {
        index.index(format!("doc{}", i), fields(json!({ "state": "a" }))).unwrap();
    }

    let writer = {
        let index = index.clone();
        thread::spawn(move || {
            for round in 0..30 {
                let state = if round % 2 == 0 { "b" } else { "a" };
                for i in 0..20 {
                    index.update(format!("doc{}", i), fields(json!({ "state": state }))).unwrap();
                }
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let index = index.clone();
            thread::spawn(move || {
                for _ in 0..100 {
                    let results = index.search(&SearchRequest::new(Query::term("state", "b")).size(100));
                    for hit in &results.hits {
                        assert_eq!(hit.document.get_field("state"), Some(&FieldValue::from("b")));
                    }
                    assert_eq!(results.total_hits as usize, results.hits.len());
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }

    // last round (29) wrote "a"
    assert_eq!(index.count(&Query::term("state", "a")), 20);
    assert_eq!(index.get("doc0").unwrap().version, 31);
}

#[test]
fn concurrent_delete_by_query_counts_each_document_once() {
    let index = Arc::new(SearchIndex::in_memory());
    for i in 0..200 {
        index.index(format!("doc{}", i), fields(json!({ "kind": "temp" }))).unwrap();
    }

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let index = index.clone();
            thread::spawn(move || index.delete_by_query(&Query::term("kind", "temp")))
        })
        .collect();
    let deleted: u64 = handles.into_iter().map(|h| h.join().unwrap()).sum();

    assert_eq!(deleted, 200);
    assert!(index.search(&SearchRequest::match_all()).is_empty());
}
