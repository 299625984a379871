use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::ops::Bound;
use crate::core::types::FieldValue;

/// Totally ordered postings key. Kinds sort `Bool < Number < Text`.
#[derive(Debug, Clone)]
pub enum IndexKey {
    Bool(bool),
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyKind {
    Bool,
    Number,
    Text,
}

impl IndexKey {
    /// Numbers are stored with `-0.0` folded into `0.0`.
    pub fn number(n: f64) -> Self {
        IndexKey::Number(if n == 0.0 { 0.0 } else { n })
    }

    pub fn text(s: impl Into<String>) -> Self {
        IndexKey::Text(s.into())
    }

    /// Scalar leaves only; null, objects and arrays have no key.
    pub fn from_value(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::Boolean(b) => Some(IndexKey::Bool(*b)),
            FieldValue::Number(n) if n.is_finite() => Some(IndexKey::number(*n)),
            FieldValue::Text(s) => Some(IndexKey::Text(s.clone())),
            _ => None,
        }
    }

    /// Keys a query value may match. A string that reads as a number or a
    /// boolean also matches the numeric or boolean key.
    pub fn candidates(value: &FieldValue) -> Vec<IndexKey> {
        let mut keys = Vec::new();
        if let Some(key) = IndexKey::from_value(value) {
            keys.push(key);
        }
        if let FieldValue::Text(s) = value {
            if let Some(n) = parse_number(s) {
                keys.push(IndexKey::number(n));
            }
            match s.as_str() {
                "true" => keys.push(IndexKey::Bool(true)),
                "false" => keys.push(IndexKey::Bool(false)),
                _ => {}
            }
        }
        keys
    }

    /// Range bound form of a query value. Numeric-looking strings bound
    /// numbers, so `"1.00"` ranges over prices.
    pub fn for_range(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::Text(s) => match parse_number(s) {
                Some(n) => Some(IndexKey::number(n)),
                None => Some(IndexKey::Text(s.clone())),
            },
            other => IndexKey::from_value(other),
        }
    }

    pub fn kind(&self) -> KeyKind {
        match self {
            IndexKey::Bool(_) => KeyKind::Bool,
            IndexKey::Number(_) => KeyKind::Number,
            IndexKey::Text(_) => KeyKind::Text,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            IndexKey::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl KeyKind {
    /// Bounds covering every key of this kind and nothing else
    pub fn bounds(self) -> (Bound<IndexKey>, Bound<IndexKey>) {
        match self {
            KeyKind::Bool => (
                Bound::Included(IndexKey::Bool(false)),
                Bound::Included(IndexKey::Bool(true)),
            ),
            KeyKind::Number => (
                Bound::Included(IndexKey::Number(f64::NEG_INFINITY)),
                Bound::Included(IndexKey::Number(f64::INFINITY)),
            ),
            KeyKind::Text => (Bound::Included(IndexKey::Text(String::new())), Bound::Unbounded),
        }
    }
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

impl Ord for IndexKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (IndexKey::Bool(a), IndexKey::Bool(b)) => a.cmp(b),
            (IndexKey::Number(a), IndexKey::Number(b)) => a.total_cmp(b),
            (IndexKey::Text(a), IndexKey::Text(b)) => a.cmp(b),
            _ => self.kind().cmp(&other.kind()),
        }
    }
}

impl PartialOrd for IndexKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for IndexKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for IndexKey {}

impl Hash for IndexKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        match self {
            IndexKey::Bool(b) => b.hash(state),
            IndexKey::Number(n) => n.to_bits().hash(state),
            IndexKey::Text(s) => s.hash(state),
        }
    }
}

/// Whether `BTreeMap::range` accepts these bounds (it panics on an empty or
/// inverted range).
pub fn is_valid_range(lower: &Bound<IndexKey>, upper: &Bound<IndexKey>) -> bool {
    match (lower, upper) {
        (Bound::Unbounded, _) | (_, Bound::Unbounded) => true,
        (Bound::Included(l), Bound::Included(u)) => l <= u,
        (Bound::Included(l), Bound::Excluded(u))
        | (Bound::Excluded(l), Bound::Included(u))
        | (Bound::Excluded(l), Bound::Excluded(u)) => l < u,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_order_before_values() {
        let mut keys = vec![
            IndexKey::text("a"),
            IndexKey::number(10.0),
            IndexKey::Bool(true),
            IndexKey::number(-1.5),
            IndexKey::Bool(false),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                IndexKey::Bool(false),
                IndexKey::Bool(true),
                IndexKey::number(-1.5),
                IndexKey::number(10.0),
                IndexKey::text("a"),
            ]
        );
    }

    #[test]
    fn negative_zero_is_folded() {
        assert_eq!(IndexKey::number(-0.0), IndexKey::number(0.0));
    }

    #[test]
    fn numeric_strings_bound_numbers() {
        assert_eq!(IndexKey::for_range(&FieldValue::from("1.00")), Some(IndexKey::number(1.0)));
        assert_eq!(IndexKey::for_range(&FieldValue::from("abc")), Some(IndexKey::text("abc")));
        assert_eq!(
            IndexKey::candidates(&FieldValue::from("1")),
            vec![IndexKey::text("1"), IndexKey::number(1.0)]
        );
    }

    #[test]
    fn inverted_ranges_are_invalid() {
        let lower = Bound::Excluded(IndexKey::number(5.0));
        let upper = Bound::Excluded(IndexKey::number(5.0));
        assert!(!is_valid_range(&lower, &upper));
        assert!(is_valid_range(&Bound::Included(IndexKey::number(5.0)), &Bound::Included(IndexKey::number(5.0))));
    }
}
