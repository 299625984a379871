use serde::{Deserialize, Serialize};
use crate::model::Entity;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub active: bool,
}

impl Article {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Article {
            id,
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
}

impl Entity for Article {
    fn id(&self) -> i64 {
        self.id
    }
}
