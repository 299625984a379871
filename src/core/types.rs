use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;
use serde::{Serialize, Deserialize};
use uuid::Uuid;
use crate::core::error::{Error, ErrorKind, Result};

/// Field name -> value. Ordered so two documents with the same fields compare equal.
pub type Fields = BTreeMap<String, FieldValue>;

/// External document identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocId(pub String);

impl DocId {
    pub fn new(id: impl Into<String>) -> Self {
        DocId(id.into())
    }

    /// Random id for documents indexed without one
    pub fn generate() -> Self {
        DocId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DocId {
    fn from(id: &str) -> Self {
        DocId(id.to_string())
    }
}

impl From<String> for DocId {
    fn from(id: String) -> Self {
        DocId(id)
    }
}

impl From<&DocId> for DocId {
    fn from(id: &DocId) -> Self {
        id.clone()
    }
}

impl Borrow<str> for DocId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Dense internal ordinal of a live document, used as the postings key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocNum(pub u32);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Null,
    Boolean(bool),
    Number(f64),
    Text(String),
    Object(Fields),
    Array(Vec<FieldValue>),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Fields> {
        match self {
            FieldValue::Object(fields) => Some(fields),
            _ => None,
        }
    }

    fn validate(&self, path: &str) -> Result<()> {
        match self {
            FieldValue::Number(n) if !n.is_finite() => Err(Error::new(
                ErrorKind::InvalidDocument,
                format!("field '{}' holds a non-finite number", path),
            )),
            FieldValue::Object(fields) => validate_fields_at(fields, path),
            FieldValue::Array(items) => {
                for item in items {
                    item.validate(path)?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<Fields> for FieldValue {
    fn from(value: Fields) -> Self {
        FieldValue::Object(value)
    }
}

impl From<Vec<FieldValue>> for FieldValue {
    fn from(value: Vec<FieldValue>) -> Self {
        FieldValue::Array(value)
    }
}

/// Versioned snapshot of a stored document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub version: u64,
    pub fields: Fields,
}

impl Document {
    pub fn new(id: DocId, version: u64, fields: Fields) -> Self {
        Document { id, version, fields }
    }

    pub fn get_field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }
}

/// Rejects empty ids, empty or dotted field names and non-finite numbers.
pub fn validate_document(id: &DocId, fields: &Fields) -> Result<()> {
    if id.0.is_empty() {
        return Err(Error::new(ErrorKind::InvalidDocument, "document id must not be empty".to_string()));
    }
    validate_fields_at(fields, "")
}

fn validate_fields_at(fields: &Fields, prefix: &str) -> Result<()> {
    for (name, value) in fields {
        if name.is_empty() {
            return Err(Error::new(
                ErrorKind::InvalidDocument,
                format!("empty field name under '{}'", prefix),
            ));
        }
        if name.contains('.') {
            return Err(Error::new(
                ErrorKind::InvalidDocument,
                format!("field name '{}' must not contain '.'", name),
            ));
        }
        let path = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{}.{}", prefix, name)
        };
        value.validate(&path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotted_field_names_are_rejected() {
        let mut fields = Fields::new();
        fields.insert("a.b".to_string(), FieldValue::from(1));
        let err = validate_document(&DocId::from("x"), &fields).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidDocument));
    }

    #[test]
    fn nested_nan_is_rejected() {
        let mut inner = Fields::new();
        inner.insert("price".to_string(), FieldValue::Number(f64::NAN));
        let mut fields = Fields::new();
        fields.insert("items".to_string(), FieldValue::Array(vec![FieldValue::Object(inner)]));

        let err = validate_document(&DocId::from("x"), &fields).unwrap_err();
        assert!(err.context.contains("items.price"));
    }

    #[test]
    fn empty_id_is_rejected() {
        assert!(validate_document(&DocId::from(""), &Fields::new()).is_err());
        assert!(validate_document(&DocId::from("ok"), &Fields::new()).is_ok());
    }
}
