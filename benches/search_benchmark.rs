use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pocketsearch::core::types::{DocId, FieldValue, Fields};
use pocketsearch::query::ast::Query;
use pocketsearch::search::request::{SearchRequest, SortField};
use pocketsearch::writer::batch::BulkRequest;
use pocketsearch::SearchIndex;
use rand::Rng;

/// Helper to create test documents
fn create_test_fields(id: u64, content_size: usize) -> Fields {
    let mut rng = rand::thread_rng();
    let words = ["the", "quick", "brown", "fox", "jumps", "over", "lazy", "dog"];
    let content: String = (0..content_size)
        .map(|_| words[rng.gen_range(0..words.len())])
        .collect::<Vec<_>>()
        .join(" ");

    Fields::from([
        ("title".to_string(), FieldValue::from(format!("Document {}", id))),
        ("content".to_string(), FieldValue::from(content)),
        ("category".to_string(), FieldValue::from(format!("category_{}", id % 10))),
        ("score".to_string(), FieldValue::from(rng.gen_range(0.0f64..100.0))),
    ])
}

fn populated_index(docs: u64) -> SearchIndex {
    let index = SearchIndex::in_memory();
    for id in 0..docs {
        index.index(DocId::from(id.to_string()), create_test_fields(id, 20)).unwrap();
    }
    index
}

fn bench_single_insert(c: &mut Criterion) {
    let index = SearchIndex::in_memory();

    c.bench_function("single_document_index", |b| {
        let mut id = 0u64;
        b.iter(|| {
            index.index(DocId::from(id.to_string()), create_test_fields(id, 100)).unwrap();
            id += 1;
        });
    });
}

fn bench_bulk(c: &mut Criterion) {
    let mut group = c.benchmark_group("bulk_index");

    for batch_size in [10, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(batch_size), batch_size, |b, &batch_size| {
            let index = SearchIndex::in_memory();
            let mut id_counter = 0u64;

            b.iter(|| {
                let mut request = BulkRequest::new();
                for _ in 0..batch_size {
                    request = request.index(id_counter.to_string(), create_test_fields(id_counter, 50));
                    id_counter += 1;
                }
                black_box(index.bulk(request));
            });
        });
    }

    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let index = populated_index(10_000);
    let mut group = c.benchmark_group("search");

    let queries = [
        ("term", Query::term("category", "category_3")),
        ("range", Query::range("score").gte(25.0).lt(75.0).into()),
        ("wildcard", Query::wildcard("title", "Document 1*")),
        ("match", Query::match_text("content", "quick fox")),
        (
            "bool",
            Query::bool()
                .must(Query::match_text("content", "lazy"))
                .filter(Query::range("score").gt(50.0))
                .must_not(Query::term("category", "category_0"))
                .into(),
        ),
    ];

    for (name, query) in queries {
        let request = SearchRequest::new(query).size(20);
        group.bench_function(name, |b| {
            b.iter(|| black_box(index.search(&request)));
        });
    }

    let sorted = SearchRequest::new(Query::range("score").gte(10.0))
        .sort(SortField::desc("score"))
        .from(100)
        .size(20);
    group.bench_function("range_sorted_page", |b| {
        b.iter(|| black_box(index.search(&sorted)));
    });

    group.finish();
}

criterion_group!(benches, bench_single_insert, bench_bulk, bench_queries);
criterion_main!(benches);
