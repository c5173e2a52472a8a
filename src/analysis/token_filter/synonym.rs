use std::collections::HashMap;
use std::sync::Arc;

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// Built-in synonym map.
pub const DEFAULT_SYNONYMS: &[(&str, &[&str])] = &[
    ("shoes", &["sneakers", "footwear"]),
    ("sneakers", &["shoes"]),
    ("tv", &["television"]),
    ("television", &["tv"]),
    ("laptop", &["notebook"]),
    ("phone", &["mobile", "smartphone"]),
    ("couch", &["sofa"]),
    ("sofa", &["couch"]),
    ("cheap", &["inexpensive", "affordable"]),
];

/// Expands tokens with their synonyms.
///
/// Expansion is additive: the original token is kept and every synonym is
/// emitted right after it, at the same position.
#[derive(Debug, Clone)]
pub struct SynonymFilter {
    synonyms: Arc<HashMap<String, Vec<String>>>,
}

impl Default for SynonymFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl SynonymFilter {
    /// Filter using [`DEFAULT_SYNONYMS`].
    pub fn new() -> Self {
        let map = DEFAULT_SYNONYMS
            .iter()
            .map(|(word, syns)| {
                (
                    word.to_string(),
                    syns.iter().map(|s| s.to_string()).collect(),
                )
            })
            .collect();
        Self::with_map(map)
    }

    /// Filter using a custom synonym map. Keys are matched lowercase.
    pub fn with_map(map: HashMap<String, Vec<String>>) -> Self {
        let synonyms = map
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), v))
            .collect();
        SynonymFilter {
            synonyms: Arc::new(synonyms),
        }
    }

    pub fn synonyms_of(&self, word: &str) -> Option<&[String]> {
        self.synonyms.get(word).map(|v| v.as_slice())
    }
}

impl Filter for SynonymFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let synonyms = self.synonyms.clone();
        Ok(Box::new(tokens.flat_map(move |token| {
            let mut expanded: Vec<Token> = Vec::with_capacity(1);
            if let Some(syns) = synonyms.get(&token.text) {
                expanded.extend(syns.iter().map(|s| token.derive(s.clone())));
            }
            expanded.insert(0, token);
            expanded
        })))
    }

    fn name(&self) -> &'static str {
        "synonym"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::texts;

    #[test]
    fn test_synonyms_are_additive() {
        let input: TokenStream = Box::new(vec![Token::new("red", 0), Token::new("shoes", 1)].into_iter());
        let output: Vec<Token> = SynonymFilter::new().filter(input).unwrap().collect();

        let words: Vec<&str> = output.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(words, vec!["red", "shoes", "sneakers", "footwear"]);
        assert!(output[1..].iter().all(|t| t.position == 1));
    }

    #[test]
    fn test_custom_map() {
        let mut map = HashMap::new();
        map.insert("Quick".to_string(), vec!["fast".to_string()]);
        let filter = SynonymFilter::with_map(map);
        assert_eq!(filter.synonyms_of("quick"), Some(&["fast".to_string()][..]));

        let input: TokenStream = Box::new(vec![Token::new("quick", 0)].into_iter());
        assert_eq!(texts(filter.filter(input).unwrap()), vec!["quick", "fast"]);
    }
}
