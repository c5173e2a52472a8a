//! Keyword analyzer for exact-match fields such as categories and tags.

use std::any::Any;

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::token::{Token, TokenStream};
use crate::error::Result;

/// Emits the whole trimmed, lowercased input as a single token.
#[derive(Debug, Clone, Default)]
pub struct KeywordAnalyzer;

impl KeywordAnalyzer {
    pub fn new() -> Self {
        KeywordAnalyzer
    }
}

impl Analyzer for KeywordAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(Box::new(std::iter::empty()));
        }

        let start = text.len() - text.trim_start().len();
        let token = Token::new(trimmed.to_lowercase(), 0).with_offsets(start, start + trimmed.len());
        Ok(Box::new(std::iter::once(token)))
    }

    fn name(&self) -> &str {
        "keyword"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::texts;

    #[test]
    fn test_keyword_single_token() {
        let analyzer = KeywordAnalyzer::new();
        let tokens: Vec<Token> = analyzer.analyze("  Running Shoes ").unwrap().collect();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "running shoes");
        assert_eq!((tokens[0].start_offset, tokens[0].end_offset), (2, 15));
    }

    #[test]
    fn test_keyword_blank_input() {
        let analyzer = KeywordAnalyzer::new();
        assert!(texts(analyzer.analyze("   ").unwrap()).is_empty());
    }
}
