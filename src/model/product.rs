use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::model::Entity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub image: String,
    pub product_type: String,
    pub price: f64,
    pub total: f64,
    pub active: bool,
    /// Stored as epoch milliseconds so it is range-searchable
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_date: DateTime<Utc>,
}

impl Product {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Product {
            id,
            name: name.into(),
            description: String::new(),
            image: String::new(),
            product_type: String::new(),
            price: 0.0,
            total: 0.0,
            active: false,
            created_date: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    pub fn with_product_type(mut self, product_type: impl Into<String>) -> Self {
        self.product_type = product_type.into();
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    pub fn with_total(mut self, total: f64) -> Self {
        self.total = total;
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn with_created_date(mut self, created_date: DateTime<Utc>) -> Self {
        self.created_date = created_date;
        self
    }
}

impl Entity for Product {
    fn id(&self) -> i64 {
        self.id
    }
}
