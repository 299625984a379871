#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;
use pocketsearch::core::json::fields_from_json;
use pocketsearch::model::{Article, Entity, Order, Product};
use pocketsearch::{Fields, SearchIndex};

pub fn fields(value: Value) -> Fields {
    fields_from_json(value).unwrap()
}

pub fn article1() -> Article {
    Article::new(1, "name1").with_description("description 1").with_price(1.01).with_active(true)
}

pub fn article2() -> Article {
    Article::new(2, "name2").with_description("description 2").with_price(2.02).with_active(true)
}

pub fn article3() -> Article {
    Article::new(3, "name3").with_description("description 3").with_price(3.03).with_active(false)
}

pub fn articles() -> Vec<Article> {
    vec![article1(), article2(), article3()]
}

pub fn orders() -> Vec<Order> {
    vec![
        Order::new(1, "order1").with_item(article1(), 1).with_item(article2(), 1),
        Order::new(2, "order2").with_item(article3(), 2),
        Order::new(3, "order3").with_item(article1(), 5),
    ]
}

/// Fixed reference time so date ranges are deterministic
pub fn reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap()
}

pub fn products() -> Vec<Product> {
    let now = reference_time();
    vec![
        Product::new(1, "Dell 1111 computure")
            .with_description("Dell computure (32GB), Black)")
            .with_image("http://localhost:8080/resources/image1.gif")
            .with_product_type("Type1")
            .with_price(10.01)
            .with_total(12.01)
            .with_active(true)
            .with_created_date(now - Duration::days(1)),
        Product::new(2, "Dell 2222 motherboard")
            .with_description("Dell motherboard, 16Gb)")
            .with_image("http://localhost:8080/resources/image2.gif")
            .with_product_type("Type2")
            .with_price(11.01)
            .with_total(13.01)
            .with_active(true)
            .with_created_date(now - Duration::days(2)),
        Product::new(3, "Dell 2222 keyboard")
            .with_description("Dell keyboard, Black")
            .with_image("http://localhost:8080/resources/image3.gif")
            .with_product_type("Type3")
            .with_price(12.01)
            .with_total(14.01)
            .with_active(true)
            .with_created_date(now - Duration::days(3)),
    ]
}

pub fn inactive_product() -> Product {
    Product::new(4, "Dell bag")
        .with_description("Dell bag, Red")
        .with_image("http://localhost:8080/resources/image4.gif")
        .with_product_type("Type4")
        .with_price(12.01)
        .with_total(14.01)
        .with_active(false)
        .with_created_date(reference_time() - Duration::days(3))
}

/// Indexes `entities` under `<prefix><id>`, e.g. `article1`
pub fn seed<E: Entity>(index: &SearchIndex, prefix: &str, entities: &[E]) {
    for entity in entities {
        let id = format!("{}{}", prefix, entity.id());
        index.index(id, entity.to_fields().unwrap()).unwrap();
    }
}

pub fn article_index() -> SearchIndex {
    let index = SearchIndex::in_memory();
    seed(&index, "article", &articles());
    index
}
