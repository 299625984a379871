use serde::{Deserialize, Serialize};
use crate::model::{Article, Entity};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub article: Article,
    pub quantity: u32,
}

impl OrderItem {
    pub fn new(article: Article, quantity: u32) -> Self {
        OrderItem { article, quantity }
    }

    pub fn amount(&self) -> f64 {
        self.article.price * self.quantity as f64
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub order_no: String,
    pub order_items: Vec<OrderItem>,
}

impl Order {
    pub fn new(id: i64, order_no: impl Into<String>) -> Self {
        Order {
            id,
            order_no: order_no.into(),
            order_items: Vec::new(),
        }
    }

    pub fn with_item(mut self, article: Article, quantity: u32) -> Self {
        self.order_items.push(OrderItem::new(article, quantity));
        self
    }

    /// Sum of `price * quantity`, rounded to cents
    pub fn total_amount(&self) -> f64 {
        let total: f64 = self.order_items.iter().map(OrderItem::amount).sum();
        (total * 100.0).round() / 100.0
    }
}

impl Entity for Order {
    fn id(&self) -> i64 {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::json::{deserialize_fields, fields_from_serializable};
    use crate::core::types::FieldValue;

    fn order() -> Order {
        Order::new(1, "order1")
            .with_item(Article::new(1, "name1").with_price(1.01), 1)
            .with_item(Article::new(2, "name2").with_price(2.02), 3)
    }

    #[test]
    fn total_amount_sums_items() {
        assert_eq!(order().total_amount(), 7.07);
        assert_eq!(Order::new(2, "empty").total_amount(), 0.0);
    }

    #[test]
    fn fields_use_camel_case_and_round_trip() {
        let order = order();
        let fields = fields_from_serializable(&order).unwrap();
        assert_eq!(fields.get("orderNo"), Some(&FieldValue::from("order1")));
        assert!(matches!(fields.get("orderItems"), Some(FieldValue::Array(items)) if items.len() == 2));

        let back: Order = deserialize_fields(&fields).unwrap();
        assert_eq!(back, order);
    }

    #[test]
    fn doc_id_is_the_numeric_id() {
        assert_eq!(order().doc_id().as_str(), "1");
    }
}
