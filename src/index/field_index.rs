use std::collections::{BTreeMap, HashMap, HashSet};
use std::ops::Bound;
use std::sync::Arc;
use roaring::RoaringBitmap;
use crate::analysis::tokenizer::{StandardTokenizer, Tokenizer};
use crate::core::types::{DocNum, FieldValue, Fields};
use crate::index::flatten::leaf_values;
use crate::index::key::{is_valid_range, IndexKey, KeyKind};
use crate::query::wildcard::WildcardPattern;

/// Sorted value -> documents holding that value
pub type Postings = BTreeMap<IndexKey, RoaringBitmap>;

/// Incremental postings change for one document mutation
#[derive(Debug, Clone, Default)]
pub struct PostingsDiff {
    pub added_terms: Vec<(String, IndexKey)>,
    pub removed_terms: Vec<(String, IndexKey)>,
    pub added_tokens: Vec<(String, String)>,
    pub removed_tokens: Vec<(String, String)>,
}

impl PostingsDiff {
    /// Set difference of the indexable values of `old` and `new`.
    pub fn between(tokenizer: &dyn Tokenizer, old: Option<&Fields>, new: Option<&Fields>) -> Self {
        let (old_terms, old_tokens) = old.map(|f| extract(tokenizer, f)).unwrap_or_default();
        let (new_terms, new_tokens) = new.map(|f| extract(tokenizer, f)).unwrap_or_default();

        PostingsDiff {
            added_terms: new_terms.difference(&old_terms).cloned().collect(),
            removed_terms: old_terms.difference(&new_terms).cloned().collect(),
            added_tokens: new_tokens.difference(&old_tokens).cloned().collect(),
            removed_tokens: old_tokens.difference(&new_tokens).cloned().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added_terms.is_empty()
            && self.removed_terms.is_empty()
            && self.added_tokens.is_empty()
            && self.removed_tokens.is_empty()
    }
}

type TermSet = HashSet<(String, IndexKey)>;
type TokenSet = HashSet<(String, String)>;

fn extract(tokenizer: &dyn Tokenizer, fields: &Fields) -> (TermSet, TokenSet) {
    let mut terms = HashSet::new();
    let mut tokens = HashSet::new();

    for (path, value) in leaf_values(fields) {
        if let FieldValue::Text(text) = value {
            for token in tokenizer.tokenize(text) {
                tokens.insert((path.clone(), token.text));
            }
        }
        if let Some(key) = IndexKey::from_value(value) {
            terms.insert((path, key));
        }
    }

    (terms, tokens)
}

/// Per-field inverted structures over the live documents
pub struct FieldIndex {
    fields: HashMap<String, Postings>,
    tokens: HashMap<String, HashMap<String, RoaringBitmap>>,
    tokenizer: Arc<dyn Tokenizer>,
}

impl FieldIndex {
    pub fn new() -> Self {
        Self::with_tokenizer(Arc::new(StandardTokenizer::default()))
    }

    pub fn with_tokenizer(tokenizer: Arc<dyn Tokenizer>) -> Self {
        FieldIndex {
            fields: HashMap::new(),
            tokens: HashMap::new(),
            tokenizer,
        }
    }

    pub fn tokenizer(&self) -> Arc<dyn Tokenizer> {
        self.tokenizer.clone()
    }

    pub fn diff(&self, old: Option<&Fields>, new: Option<&Fields>) -> PostingsDiff {
        PostingsDiff::between(self.tokenizer.as_ref(), old, new)
    }

    /// Brings the postings of `num` from `old` to `new` in one step.
    pub fn on_document_changed(&mut self, num: DocNum, old: Option<&Fields>, new: Option<&Fields>) {
        let diff = self.diff(old, new);
        self.apply(num, diff);
    }

    pub fn apply(&mut self, num: DocNum, diff: PostingsDiff) {
        for (path, key) in diff.removed_terms {
            if let Some(postings) = self.fields.get_mut(&path) {
                if let Some(docs) = postings.get_mut(&key) {
                    docs.remove(num.0);
                    if docs.is_empty() {
                        postings.remove(&key);
                    }
                }
                if postings.is_empty() {
                    self.fields.remove(&path);
                }
            }
        }
        for (path, key) in diff.added_terms {
            self.fields
                .entry(path)
                .or_default()
                .entry(key)
                .or_default()
                .insert(num.0);
        }

        for (path, token) in diff.removed_tokens {
            if let Some(dictionary) = self.tokens.get_mut(&path) {
                if let Some(docs) = dictionary.get_mut(&token) {
                    docs.remove(num.0);
                    if docs.is_empty() {
                        dictionary.remove(&token);
                    }
                }
                if dictionary.is_empty() {
                    self.tokens.remove(&path);
                }
            }
        }
        for (path, token) in diff.added_tokens {
            self.tokens
                .entry(path)
                .or_default()
                .entry(token)
                .or_default()
                .insert(num.0);
        }
    }

    pub fn term_lookup(&self, path: &str, key: &IndexKey) -> RoaringBitmap {
        self.fields
            .get(path)
            .and_then(|postings| postings.get(key))
            .cloned()
            .unwrap_or_default()
    }

    /// Union of postings between the bounds. Callers keep both bounds within
    /// one key kind; see `KeyKind::bounds`.
    pub fn range_lookup(&self, path: &str, lower: Bound<IndexKey>, upper: Bound<IndexKey>) -> RoaringBitmap {
        let mut docs = RoaringBitmap::new();
        let Some(postings) = self.fields.get(path) else {
            return docs;
        };
        if !is_valid_range(&lower, &upper) {
            return docs;
        }
        for (_, ids) in postings.range((lower, upper)) {
            docs |= ids;
        }
        docs
    }

    pub fn prefix_lookup(&self, path: &str, prefix: &str) -> RoaringBitmap {
        let mut docs = RoaringBitmap::new();
        for (_, ids) in self.text_keys_from(path, prefix) {
            docs |= ids;
        }
        docs
    }

    pub fn wildcard_lookup(&self, path: &str, pattern: &WildcardPattern) -> RoaringBitmap {
        let mut docs = RoaringBitmap::new();
        for (key, ids) in self.text_keys_from(path, pattern.literal_prefix()) {
            if key.as_str().is_some_and(|value| pattern.is_match(value)) {
                docs |= ids;
            }
        }
        docs
    }

    pub fn token_lookup(&self, path: &str, token: &str) -> RoaringBitmap {
        self.tokens
            .get(path)
            .and_then(|dictionary| dictionary.get(token))
            .cloned()
            .unwrap_or_default()
    }

    /// Documents holding any non-null value at `path`
    pub fn exists_lookup(&self, path: &str) -> RoaringBitmap {
        let mut docs = RoaringBitmap::new();
        if let Some(postings) = self.fields.get(path) {
            for ids in postings.values() {
                docs |= ids;
            }
        }
        docs
    }

    /// Tokens of `text` as the index sees them
    pub fn analyze(&self, text: &str) -> Vec<String> {
        self.tokenizer.tokenize(text).into_iter().map(|t| t.text).collect()
    }

    /// Number of postings entries (terms and tokens) referencing `num`
    pub fn postings_for(&self, num: DocNum) -> usize {
        let terms = self
            .fields
            .values()
            .flat_map(|postings| postings.values())
            .filter(|ids| ids.contains(num.0))
            .count();
        let tokens = self
            .tokens
            .values()
            .flat_map(|dictionary| dictionary.values())
            .filter(|ids| ids.contains(num.0))
            .count();
        terms + tokens
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn term_count(&self) -> usize {
        self.fields.values().map(|postings| postings.len()).sum()
    }

    pub fn token_count(&self) -> usize {
        self.tokens.values().map(|dictionary| dictionary.len()).sum()
    }

    fn text_keys_from<'a>(
        &'a self,
        path: &str,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a IndexKey, &'a RoaringBitmap)> + 'a {
        let (lower, upper) = if prefix.is_empty() {
            KeyKind::Text.bounds()
        } else {
            (Bound::Included(IndexKey::text(prefix)), Bound::Unbounded)
        };
        self.fields
            .get(path)
            .into_iter()
            .flat_map(move |postings| postings.range((lower.clone(), upper.clone())))
            .take_while(move |(key, _)| key.as_str().is_some_and(|value| value.starts_with(prefix)))
    }
}

impl Default for FieldIndex {
    fn default() -> Self {
        Self::new()
    }
}
