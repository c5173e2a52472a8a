//! Wildcard patterns matched against indexed terms.

use std::sync::Arc;

use regex::Regex;

use crate::error::{Result, SiftError};

/// A compiled wildcard pattern.
///
/// `*` matches zero or more characters; every other character is literal.
/// Patterns are anchored, so `sho*` is a prefix match and `*oes` a suffix
/// match.
#[derive(Debug, Clone)]
pub struct WildcardPattern {
    pattern: String,
    regex: Arc<Regex>,
}

impl WildcardPattern {
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into().to_lowercase();
        let regex_pattern = Self::compile_pattern(&pattern);
        let regex = Regex::new(&regex_pattern)
            .map_err(|e| SiftError::invalid_argument(format!("Invalid wildcard pattern: {e}")))?;

        Ok(WildcardPattern {
            pattern,
            regex: Arc::new(regex),
        })
    }

    /// Compile a wildcard pattern into a regex string.
    fn compile_pattern(pattern: &str) -> String {
        let mut regex_pattern = String::with_capacity(pattern.len() + 8);
        regex_pattern.push('^');

        let mut first = true;
        for literal in pattern.split('*') {
            if !first {
                regex_pattern.push_str(".*");
            }
            regex_pattern.push_str(&regex::escape(literal));
            first = false;
        }

        regex_pattern.push('$');
        regex_pattern
    }

    /// The wildcard pattern as written (lowercased).
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The literal prefix before the first `*`, usable to narrow a term scan.
    pub fn literal_prefix(&self) -> &str {
        self.pattern.split('*').next().unwrap_or("")
    }

    /// Check if a term matches the wildcard pattern.
    pub fn matches(&self, term: &str) -> bool {
        self.regex.is_match(term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_compilation() {
        assert_eq!(WildcardPattern::compile_pattern("sho*"), "^sho.*$");
        assert_eq!(WildcardPattern::compile_pattern("*oes"), "^.*oes$");
        assert_eq!(WildcardPattern::compile_pattern("a.b*"), "^a\\.b.*$");
    }

    #[test]
    fn test_prefix_and_suffix_matching() {
        let prefix = WildcardPattern::new("Sho*").unwrap();
        assert!(prefix.matches("shoes"));
        assert!(prefix.matches("sho"));
        assert!(!prefix.matches("ashore"));
        assert_eq!(prefix.literal_prefix(), "sho");

        let suffix = WildcardPattern::new("*oes").unwrap();
        assert!(suffix.matches("shoes"));
        assert!(!suffix.matches("oesx"));
        assert_eq!(suffix.literal_prefix(), "");
    }

    #[test]
    fn test_special_regex_characters_are_literal() {
        let pattern = WildcardPattern::new("c++*").unwrap();
        assert!(pattern.matches("c++17"));
        assert!(!pattern.matches("cc"));
    }
}
