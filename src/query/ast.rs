use serde::{Serialize, Deserialize};
use crate::core::types::FieldValue;

/// Immutable predicate tree evaluated against the field index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Query {
    MatchAll,
    Term(TermQuery),             // Exact value
    Terms(TermsQuery),           // Any of several exact values
    Range(RangeQuery),           // Numeric/text range
    Prefix(PrefixQuery),
    Wildcard(WildcardQuery),     // `*` and `?` globs
    Match(MatchQuery),           // Analyzed text on one field
    MultiMatch(MultiMatchQuery), // Analyzed text on several fields
    Exists(ExistsQuery),
    Bool(BoolQuery),             // Boolean combinations
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermQuery {
    pub field: String,
    pub value: FieldValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermsQuery {
    pub field: String,
    pub values: Vec<FieldValue>,
}

/// Range query; a missing side is open. `gt` wins over `gte` and `lt`
/// over `lte` when both are set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RangeQuery {
    pub field: String,
    pub gt: Option<FieldValue>,
    pub gte: Option<FieldValue>,
    pub lt: Option<FieldValue>,
    pub lte: Option<FieldValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrefixQuery {
    pub field: String,
    pub prefix: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WildcardQuery {
    pub field: String,
    pub pattern: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchQuery {
    pub field: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiMatchQuery {
    pub fields: Vec<String>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExistsQuery {
    pub field: String,
}

/// Boolean query with must/should/must_not/filter clauses
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BoolQuery {
    pub must: Vec<Query>,      // All must match (AND)
    pub should: Vec<Query>,    // Optional unless alone or minimum_should_match is set
    pub must_not: Vec<Query>,  // None may match (NOT)
    pub filter: Vec<Query>,    // Same as must; kept apart to mirror request shape
    pub minimum_should_match: Option<u32>,
}

impl Query {
    pub fn match_all() -> Self {
        Query::MatchAll
    }

    pub fn term(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Query::Term(TermQuery {
            field: field.into(),
            value: value.into(),
        })
    }

    pub fn terms<V: Into<FieldValue>>(field: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Query::Terms(TermsQuery {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        })
    }

    pub fn range(field: impl Into<String>) -> RangeQuery {
        RangeQuery {
            field: field.into(),
            ..RangeQuery::default()
        }
    }

    pub fn prefix(field: impl Into<String>, prefix: impl Into<String>) -> Self {
        Query::Prefix(PrefixQuery {
            field: field.into(),
            prefix: prefix.into(),
        })
    }

    pub fn wildcard(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Query::Wildcard(WildcardQuery {
            field: field.into(),
            pattern: pattern.into(),
        })
    }

    pub fn match_text(field: impl Into<String>, text: impl Into<String>) -> Self {
        Query::Match(MatchQuery {
            field: field.into(),
            text: text.into(),
        })
    }

    pub fn multi_match<F: Into<String>>(text: impl Into<String>, fields: impl IntoIterator<Item = F>) -> Self {
        Query::MultiMatch(MultiMatchQuery {
            fields: fields.into_iter().map(Into::into).collect(),
            text: text.into(),
        })
    }

    pub fn exists(field: impl Into<String>) -> Self {
        Query::Exists(ExistsQuery { field: field.into() })
    }

    pub fn bool() -> BoolQuery {
        BoolQuery::new()
    }

    /// Number of predicate nodes in the tree
    pub fn node_count(&self) -> usize {
        match self {
            Query::Bool(bq) => {
                1 + bq
                    .must
                    .iter()
                    .chain(&bq.should)
                    .chain(&bq.must_not)
                    .chain(&bq.filter)
                    .map(Query::node_count)
                    .sum::<usize>()
            }
            _ => 1,
        }
    }
}

impl Default for Query {
    fn default() -> Self {
        Query::MatchAll
    }
}

impl RangeQuery {
    pub fn gt(mut self, value: impl Into<FieldValue>) -> Self {
        self.gt = Some(value.into());
        self
    }

    pub fn gte(mut self, value: impl Into<FieldValue>) -> Self {
        self.gte = Some(value.into());
        self
    }

    pub fn lt(mut self, value: impl Into<FieldValue>) -> Self {
        self.lt = Some(value.into());
        self
    }

    pub fn lte(mut self, value: impl Into<FieldValue>) -> Self {
        self.lte = Some(value.into());
        self
    }
}

impl From<RangeQuery> for Query {
    fn from(query: RangeQuery) -> Self {
        Query::Range(query)
    }
}

impl BoolQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn must(mut self, query: impl Into<Query>) -> Self {
        self.must.push(query.into());
        self
    }

    pub fn should(mut self, query: impl Into<Query>) -> Self {
        self.should.push(query.into());
        self
    }

    pub fn must_not(mut self, query: impl Into<Query>) -> Self {
        self.must_not.push(query.into());
        self
    }

    pub fn filter(mut self, query: impl Into<Query>) -> Self {
        self.filter.push(query.into());
        self
    }

    pub fn minimum_should_match(mut self, count: u32) -> Self {
        self.minimum_should_match = Some(count);
        self
    }

    /// True when no must/filter clause constrains the result
    pub fn has_required_clauses(&self) -> bool {
        !self.must.is_empty() || !self.filter.is_empty()
    }
}

impl From<BoolQuery> for Query {
    fn from(query: BoolQuery) -> Self {
        Query::Bool(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_produce_expected_nodes() {
        let query: Query = Query::bool()
            .must(Query::range("price").gt("1.00").lt("5.00"))
            .must(Query::wildcard("name", "name*"))
            .into();

        match &query {
            Query::Bool(bq) => {
                assert_eq!(bq.must.len(), 2);
                assert!(bq.has_required_clauses());
                match &bq.must[0] {
                    Query::Range(rq) => {
                        assert_eq!(rq.gt, Some(FieldValue::from("1.00")));
                        assert_eq!(rq.lt, Some(FieldValue::from("5.00")));
                        assert!(rq.gte.is_none());
                    }
                    other => panic!("unexpected {:?}", other),
                }
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(query.node_count(), 3);
    }

    #[test]
    fn terms_collects_mixed_values() {
        match Query::terms("name", ["computure", "motherboard"]) {
            Query::Terms(tq) => assert_eq!(tq.values.len(), 2),
            other => panic!("unexpected {:?}", other),
        }
    }
}
