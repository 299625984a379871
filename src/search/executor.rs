use std::collections::HashMap;
use std::ops::Bound;
use std::sync::Arc;
use std::time::Instant;
use roaring::RoaringBitmap;
use tracing::{debug, warn};
use crate::core::config::Config;
use crate::core::state::IndexState;
use crate::core::types::{DocId, Document, FieldValue};
use crate::index::key::IndexKey;
use crate::query::ast::{BoolQuery, Query, RangeQuery};
use crate::query::wildcard::WildcardPattern;
use crate::search::request::{SearchRequest, ID_FIELD};
use crate::search::results::{Hit, SearchResults};
use crate::search::sort::sort_documents;

/// Evaluates a query tree bottom-up into a set of document ordinals.
///
/// With a deadline, the clock is checked before every node; once it has
/// passed, remaining nodes evaluate to nothing and `timed_out` is set.
pub struct QueryEvaluator<'a> {
    state: &'a IndexState,
    deadline: Option<Instant>,
    timed_out: bool,
}

impl<'a> QueryEvaluator<'a> {
    pub fn new(state: &'a IndexState) -> Self {
        QueryEvaluator {
            state,
            deadline: None,
            timed_out: false,
        }
    }

    pub fn with_deadline(mut self, deadline: Option<Instant>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    pub fn evaluate(&mut self, query: &Query) -> RoaringBitmap {
        if self.expired() {
            return RoaringBitmap::new();
        }

        match query {
            Query::MatchAll => self.state.store.live().clone(),
            Query::Term(tq) => self.term(&tq.field, &tq.value),
            Query::Terms(tq) => {
                let mut docs = RoaringBitmap::new();
                for value in &tq.values {
                    docs |= self.term(&tq.field, value);
                }
                docs
            }
            Query::Range(rq) => self.range(rq),
            Query::Prefix(pq) => self.state.index.prefix_lookup(&pq.field, &pq.prefix),
            Query::Wildcard(wq) => match WildcardPattern::compile(&wq.pattern) {
                Ok(pattern) => self.state.index.wildcard_lookup(&wq.field, &pattern),
                Err(e) => {
                    warn!(field = %wq.field, error = %e, "Wildcard evaluates to no documents");
                    RoaringBitmap::new()
                }
            },
            Query::Match(mq) => self.analyzed(std::slice::from_ref(&mq.field), &mq.text),
            Query::MultiMatch(mq) => self.analyzed(&mq.fields, &mq.text),
            Query::Exists(eq) => self.state.index.exists_lookup(&eq.field),
            Query::Bool(bq) => self.bool(bq),
        }
    }

    /// Ordinals matched by `query` resolved to ids, in ordinal order.
    pub fn matching_ids(&mut self, query: &Query) -> Vec<DocId> {
        let state = self.state;
        self.evaluate(query)
            .iter()
            .filter_map(|num| state.store.by_ordinal(num))
            .map(|stored| stored.doc.id.clone())
            .collect()
    }

    fn expired(&mut self) -> bool {
        if !self.timed_out {
            if let Some(deadline) = self.deadline {
                if Instant::now() >= deadline {
                    warn!("Search deadline reached, returning partial results");
                    self.timed_out = true;
                }
            }
        }
        self.timed_out
    }

    fn term(&self, field: &str, value: &FieldValue) -> RoaringBitmap {
        if field == ID_FIELD {
            return value
                .as_str()
                .and_then(|id| self.state.store.stored(id))
                .map(|stored| std::iter::once(stored.num.0).collect())
                .unwrap_or_default();
        }

        let mut docs = RoaringBitmap::new();
        for key in IndexKey::candidates(value) {
            docs |= self.state.index.term_lookup(field, &key);
        }
        docs
    }

    fn range(&self, rq: &RangeQuery) -> RoaringBitmap {
        let lower = match (&rq.gt, &rq.gte) {
            (Some(v), _) => Some((v, false)),
            (None, Some(v)) => Some((v, true)),
            (None, None) => None,
        };
        let upper = match (&rq.lt, &rq.lte) {
            (Some(v), _) => Some((v, false)),
            (None, Some(v)) => Some((v, true)),
            (None, None) => None,
        };

        let lower = match lower.map(|(v, inclusive)| (IndexKey::for_range(v), inclusive)) {
            Some((None, _)) => return self.unusable_range(rq),
            Some((Some(key), inclusive)) => Some(bound(key, inclusive)),
            None => None,
        };
        let upper = match upper.map(|(v, inclusive)| (IndexKey::for_range(v), inclusive)) {
            Some((None, _)) => return self.unusable_range(rq),
            Some((Some(key), inclusive)) => Some(bound(key, inclusive)),
            None => None,
        };

        let (lower, upper) = match (lower, upper) {
            (None, None) => return self.state.index.exists_lookup(&rq.field),
            (Some(lower), None) => {
                let Some(kind) = bound_key(&lower).map(IndexKey::kind) else {
                    return RoaringBitmap::new();
                };
                (lower, kind.bounds().1)
            }
            (None, Some(upper)) => {
                let Some(kind) = bound_key(&upper).map(IndexKey::kind) else {
                    return RoaringBitmap::new();
                };
                (kind.bounds().0, upper)
            }
            (Some(lower), Some(upper)) => {
                if bound_key(&lower).map(IndexKey::kind) != bound_key(&upper).map(IndexKey::kind) {
                    return self.unusable_range(rq);
                }
                (lower, upper)
            }
        };

        self.state.index.range_lookup(&rq.field, lower, upper)
    }

    fn unusable_range(&self, rq: &RangeQuery) -> RoaringBitmap {
        warn!(field = %rq.field, "Range bounds are not comparable, evaluating to no documents");
        RoaringBitmap::new()
    }

    /// A document matches when any token of `text` occurs in any field, or
    /// when a field holds `text` itself as a term (numbers and booleans have
    /// no tokens).
    fn analyzed(&self, fields: &[String], text: &str) -> RoaringBitmap {
        let tokens = self.state.index.analyze(text);
        let whole = FieldValue::Text(text.to_string());
        let mut docs = RoaringBitmap::new();
        for field in fields {
            for token in &tokens {
                docs |= self.state.index.token_lookup(field, token);
            }
            docs |= self.term(field, &whole);
        }
        docs
    }

    /// Once the deadline has passed mid-way, the whole bool evaluates to
    /// nothing: a skipped `must_not` clause would otherwise let excluded
    /// documents through.
    fn bool(&mut self, bq: &BoolQuery) -> RoaringBitmap {
        let mut required: Option<RoaringBitmap> = None;
        for clause in bq.must.iter().chain(&bq.filter) {
            let docs = self.evaluate(clause);
            required = Some(intersect(required, docs));
        }
        if self.timed_out {
            return RoaringBitmap::new();
        }

        // should only filters when it is alone or a minimum is requested
        let minimum_should = match bq.minimum_should_match {
            Some(count) => count as usize,
            None if !bq.has_required_clauses() && !bq.should.is_empty() => 1,
            None => 0,
        };
        if minimum_should > 0 {
            let sets: Vec<RoaringBitmap> = bq.should.iter().map(|clause| self.evaluate(clause)).collect();
            if self.timed_out {
                return RoaringBitmap::new();
            }
            required = Some(intersect(required, at_least(&sets, minimum_should)));
        }

        let mut docs = required.unwrap_or_else(|| self.state.store.live().clone());
        for clause in &bq.must_not {
            let excluded = self.evaluate(clause);
            if self.timed_out {
                return RoaringBitmap::new();
            }
            docs -= &excluded;
        }
        docs
    }
}

fn bound(key: IndexKey, inclusive: bool) -> Bound<IndexKey> {
    if inclusive {
        Bound::Included(key)
    } else {
        Bound::Excluded(key)
    }
}

fn bound_key(bound: &Bound<IndexKey>) -> Option<&IndexKey> {
    match bound {
        Bound::Included(key) | Bound::Excluded(key) => Some(key),
        Bound::Unbounded => None,
    }
}

fn intersect(acc: Option<RoaringBitmap>, docs: RoaringBitmap) -> RoaringBitmap {
    match acc {
        None => docs,
        Some(mut acc) => {
            acc &= &docs;
            acc
        }
    }
}

/// Documents present in at least `n` of `sets`
fn at_least(sets: &[RoaringBitmap], n: usize) -> RoaringBitmap {
    if n > sets.len() {
        return RoaringBitmap::new();
    }
    if n <= 1 {
        let mut docs = RoaringBitmap::new();
        for set in sets {
            docs |= set;
        }
        return docs;
    }

    let mut counts: HashMap<u32, usize> = HashMap::new();
    for set in sets {
        for num in set {
            *counts.entry(num).or_insert(0) += 1;
        }
    }
    counts
        .into_iter()
        .filter(|(_, count)| *count >= n)
        .map(|(num, _)| num)
        .collect()
}

/// Matched documents captured under the state read lock. Sorting, paging
/// and hydration work on these handles after the lock is released.
pub struct MatchedDocuments {
    pub docs: Vec<Arc<Document>>,
    pub timed_out: bool,
    started: Instant,
}

/// Evaluates the query and post filter against one consistent state.
pub fn collect_matches(state: &IndexState, request: &SearchRequest, config: &Config) -> MatchedDocuments {
    let started = Instant::now();
    let deadline = request
        .timeout
        .or_else(|| config.default_search_timeout())
        .map(|timeout| started + timeout);

    let mut evaluator = QueryEvaluator::new(state).with_deadline(deadline);
    let mut matched = evaluator.evaluate(&request.query);
    if let Some(filter) = &request.post_filter {
        matched &= &evaluator.evaluate(filter);
    }

    let docs = matched
        .iter()
        .filter_map(|num| state.store.by_ordinal(num))
        .map(|stored| stored.doc.clone())
        .collect();

    MatchedDocuments {
        docs,
        timed_out: evaluator.timed_out(),
        started,
    }
}

/// Sorts, pages and hydrates previously collected matches.
pub fn finish_search(matched: MatchedDocuments, request: &SearchRequest, config: &Config) -> SearchResults {
    let total_hits = matched.docs.len() as u64;
    let size = request
        .size
        .unwrap_or(config.default_page_size)
        .min(config.max_result_window.saturating_sub(request.from));

    let hits: Vec<Hit> = sort_documents(matched.docs, &request.sort)
        .into_iter()
        .skip(request.from)
        .take(size)
        .map(|doc| Hit {
            id: doc.id.clone(),
            version: doc.version,
            document: (*doc).clone(),
        })
        .collect();

    let took_ms = matched.started.elapsed().as_millis() as u64;
    debug!(
        nodes = request.query.node_count(),
        total_hits,
        returned = hits.len(),
        took_ms,
        "Search executed"
    );

    SearchResults {
        hits,
        total_hits,
        took_ms,
        timed_out: matched.timed_out,
    }
}

/// Runs a full search request against one consistent state.
pub fn execute_search(state: &IndexState, request: &SearchRequest, config: &Config) -> SearchResults {
    finish_search(collect_matches(state, request, config), request, config)
}
