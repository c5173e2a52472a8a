use std::sync::Arc;

use ahash::AHashSet;

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// Common English stop words.
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "from", "has", "have", "he",
    "her", "his", "if", "in", "into", "is", "it", "its", "no", "not", "of", "on", "or", "she",
    "such", "that", "the", "their", "then", "there", "these", "they", "this", "to", "was", "we",
    "were", "will", "with", "you", "your",
];

/// Removes stop words from the stream.
#[derive(Debug, Clone)]
pub struct StopFilter {
    words: Arc<AHashSet<String>>,
}

impl Default for StopFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl StopFilter {
    /// Filter using [`ENGLISH_STOP_WORDS`].
    pub fn new() -> Self {
        Self::with_words(ENGLISH_STOP_WORDS.iter().copied())
    }

    /// Filter using a custom word list.
    pub fn with_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words = words.into_iter().map(|w| w.into().to_lowercase()).collect();
        StopFilter {
            words: Arc::new(words),
        }
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.words.contains(word)
    }
}

impl Filter for StopFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let words = self.words.clone();
        Ok(Box::new(tokens.filter(move |token| !words.contains(&token.text))))
    }

    fn name(&self) -> &'static str {
        "stop"
    }
}
