use regex::Regex;
use crate::core::error::{Error, ErrorKind, Result};

/// Compiled glob: `*` matches any run of characters, `?` exactly one.
/// Matching is case-sensitive and anchored at both ends of the value.
#[derive(Debug, Clone)]
pub struct WildcardPattern {
    pattern: String,
    literal_prefix: String,
    regex: Regex,
}

impl WildcardPattern {
    pub fn compile(pattern: &str) -> Result<Self> {
        let mut regex_pattern = String::from("(?s)^");
        let mut literal = String::new();

        for ch in pattern.chars() {
            match ch {
                '*' | '?' => {
                    regex_pattern.push_str(&regex::escape(&literal));
                    literal.clear();
                    regex_pattern.push_str(if ch == '*' { ".*" } else { "." });
                }
                other => literal.push(other),
            }
        }
        regex_pattern.push_str(&regex::escape(&literal));
        regex_pattern.push('$');

        let regex = Regex::new(&regex_pattern)
            .map_err(|e| Error::new(ErrorKind::InvalidQuery, format!("Invalid wildcard '{}': {}", pattern, e)))?;

        let literal_prefix = pattern
            .chars()
            .take_while(|c| *c != '*' && *c != '?')
            .collect();

        Ok(WildcardPattern {
            pattern: pattern.to_string(),
            literal_prefix,
            regex,
        })
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }

    /// Characters before the first wildcard; every match starts with them.
    pub fn literal_prefix(&self) -> &str {
        &self.literal_prefix
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_is_anchored_prefix() {
        let pattern = WildcardPattern::compile("name*").unwrap();
        assert!(pattern.is_match("name1"));
        assert!(pattern.is_match("name"));
        assert!(!pattern.is_match("xname1"));
        assert!(!pattern.is_match("Name1"));
        assert_eq!(pattern.literal_prefix(), "name");
    }

    #[test]
    fn question_mark_matches_one_char() {
        let pattern = WildcardPattern::compile("n?me").unwrap();
        assert!(pattern.is_match("name"));
        assert!(!pattern.is_match("nme"));
        assert!(!pattern.is_match("naame"));
    }

    #[test]
    fn regex_metacharacters_are_literal() {
        let pattern = WildcardPattern::compile("a.b(*").unwrap();
        assert!(pattern.is_match("a.b(c)"));
        assert!(!pattern.is_match("axb(c)"));
    }

    #[test]
    fn pattern_without_wildcards_is_exact() {
        let pattern = WildcardPattern::compile("Samsung").unwrap();
        assert!(pattern.is_match("Samsung"));
        assert!(!pattern.is_match("Samsung Galaxy"));
    }
}
