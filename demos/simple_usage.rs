/// pocketsearch API demo
///
/// Indexes a few articles, runs the main query kinds, applies a bulk
/// request and round-trips a document through JSON text.

use pocketsearch::core::json::{fields_from_str, fields_to_string};
use pocketsearch::model::Article;
use pocketsearch::{BulkRequest, Query, SearchIndex, SearchRequest, SortField};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Creating index...");
    let index = SearchIndex::in_memory();

    println!("Step 1: INDEX - adding articles");
    let articles = [
        Article::new(1, "Rust Programming").with_description("learn the rust language").with_price(29.5).with_active(true),
        Article::new(2, "Database Systems").with_description("sql and nosql databases").with_price(45.0).with_active(true),
        Article::new(3, "Web Development").with_description("building web apps in rust").with_price(19.9),
    ];
    for article in &articles {
        let version = index.index_entity(article)?;
        println!("  article {} -> version {}", article.id, version);
    }

    println!("Step 2: SEARCH");
    let rust = index.search(&SearchRequest::new(Query::match_text("description", "rust")));
    println!("  match 'rust': {:?}", rust.ids());

    let cheap = index.search(
        &SearchRequest::new(Query::range("price").lt(30.0)).sort(SortField::asc("price")),
    );
    println!("  price < 30, cheapest first: {:?}", cheap.ids());

    let active_rust = Query::bool()
        .must(Query::match_text("description", "rust"))
        .filter(Query::term("active", true));
    println!("  active rust articles: {:?}", index.search(&SearchRequest::new(active_rust)).ids());

    let anywhere = Query::multi_match("45", ["price", "name"]);
    println!("  '45' in price or name: {:?}", index.search(&SearchRequest::new(anywhere)).ids());

    println!("Step 3: BULK");
    let request = BulkRequest::new()
        .index("4", fields_from_str(r#"{ "id": 4, "name": "Compilers", "price": 60.0, "active": true }"#)?)
        .update("1", fields_from_str(r#"{ "price": 25.0 }"#)?)
        .delete("3")
        .delete("99");
    println!("  {} operations", request.len());
    let response = index.bulk(request);
    for item in &response.items {
        println!("  {} -> {:?}", item.id, item.outcome);
    }
    if response.has_failures() {
        println!("  {} failed", response.failure_count());
    }

    println!("Step 4: GET");
    if let Some(doc) = index.get("1") {
        println!("  article 1 v{}: {}", doc.version, fields_to_string(&doc.fields)?);
    }

    let stats = index.stats();
    println!("Stats: {:?}", stats);
    Ok(())
}
