use crate::core::types::{FieldValue, Fields};

/// Every scalar leaf with its dot-joined path. Arrays are transparent: each
/// element is reported under the array's own path, so `orderItems.article.id`
/// yields one entry per line item.
pub fn leaf_values(fields: &Fields) -> Vec<(String, &FieldValue)> {
    let mut leaves = Vec::new();
    for (name, value) in fields {
        collect(name.clone(), value, &mut leaves);
    }
    leaves
}

fn collect<'a>(path: String, value: &'a FieldValue, leaves: &mut Vec<(String, &'a FieldValue)>) {
    match value {
        FieldValue::Object(fields) => {
            for (name, child) in fields {
                collect(format!("{}.{}", path, name), child, leaves);
            }
        }
        FieldValue::Array(items) => {
            for item in items {
                collect(path.clone(), item, leaves);
            }
        }
        FieldValue::Null => {}
        scalar => leaves.push((path, scalar)),
    }
}

/// Scalar values found at `path`, walking through arrays.
pub fn values_at_path<'a>(fields: &'a Fields, path: &str) -> Vec<&'a FieldValue> {
    let mut segments = path.split('.');
    let mut current: Vec<&FieldValue> = match segments.next().and_then(|head| fields.get(head)) {
        Some(value) => vec![value],
        None => return Vec::new(),
    };

    for segment in segments {
        let mut next = Vec::new();
        for value in current {
            step(value, segment, &mut next);
        }
        current = next;
    }

    let mut leaves = Vec::new();
    for value in current {
        scalars(value, &mut leaves);
    }
    leaves
}

fn step<'a>(value: &'a FieldValue, segment: &str, out: &mut Vec<&'a FieldValue>) {
    match value {
        FieldValue::Object(fields) => {
            if let Some(child) = fields.get(segment) {
                out.push(child);
            }
        }
        FieldValue::Array(items) => {
            for item in items {
                step(item, segment, out);
            }
        }
        _ => {}
    }
}

fn scalars<'a>(value: &'a FieldValue, out: &mut Vec<&'a FieldValue>) {
    match value {
        FieldValue::Array(items) => {
            for item in items {
                scalars(item, out);
            }
        }
        FieldValue::Object(_) | FieldValue::Null => {}
        scalar => out.push(scalar),
    }
}
