pub mod article;
pub mod order;
pub mod product;

use serde::de::DeserializeOwned;
use serde::Serialize;
use crate::core::error::Result;
use crate::core::json::fields_from_serializable;
use crate::core::types::{DocId, Fields};

pub use article::Article;
pub use order::{Order, OrderItem};
pub use product::Product;

/// A typed record stored under its numeric id
pub trait Entity: Serialize + DeserializeOwned {
    fn id(&self) -> i64;

    fn doc_id(&self) -> DocId {
        DocId::from(self.id().to_string())
    }

    fn to_fields(&self) -> Result<Fields> {
        fields_from_serializable(self)
    }
}
