use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value};
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{FieldValue, Fields};

// Integral numbers within this bound are emitted as JSON integers so typed
// records with integer fields deserialize back.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Boolean(b),
            Value::Number(n) => n.as_f64().map(FieldValue::Number).unwrap_or(FieldValue::Null),
            Value::String(s) => FieldValue::Text(s),
            Value::Array(items) => FieldValue::Array(items.into_iter().map(FieldValue::from).collect()),
            Value::Object(map) => FieldValue::Object(
                map.into_iter().map(|(k, v)| (k, FieldValue::from(v))).collect(),
            ),
        }
    }
}

impl From<&FieldValue> for Value {
    fn from(value: &FieldValue) -> Self {
        match value {
            FieldValue::Null => Value::Null,
            FieldValue::Boolean(b) => Value::Bool(*b),
            FieldValue::Number(n) => number_to_json(*n),
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::Array(items) => Value::Array(items.iter().map(Value::from).collect()),
            FieldValue::Object(fields) => fields_to_json(fields),
        }
    }
}

fn number_to_json(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < MAX_EXACT_INTEGER {
        Value::Number(Number::from(n as i64))
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}

/// Top-level JSON object -> field map
pub fn fields_from_json(value: Value) -> Result<Fields> {
    match value {
        Value::Object(map) => Ok(map.into_iter().map(|(k, v)| (k, FieldValue::from(v))).collect()),
        other => Err(Error::new(
            ErrorKind::InvalidDocument,
            format!("document source must be a JSON object, got {}", json_kind(&other)),
        )),
    }
}

pub fn fields_to_json(fields: &Fields) -> Value {
    let map: Map<String, Value> = fields
        .iter()
        .map(|(k, v)| (k.clone(), Value::from(v)))
        .collect();
    Value::Object(map)
}

pub fn fields_from_str(json: &str) -> Result<Fields> {
    fields_from_json(serde_json::from_str(json)?)
}

pub fn fields_to_string(fields: &Fields) -> Result<String> {
    Ok(serde_json::to_string(&fields_to_json(fields))?)
}

pub fn fields_from_serializable<T: Serialize>(value: &T) -> Result<Fields> {
    fields_from_json(serde_json::to_value(value)?)
}

pub fn deserialize_fields<T: DeserializeOwned>(fields: &Fields) -> Result<T> {
    Ok(serde_json::from_value(fields_to_json(fields))?)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
