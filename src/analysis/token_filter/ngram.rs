use crate::analysis::token::{Token, TokenStream};
use crate::analysis::token_filter::Filter;
use crate::error::{Result, SiftError};

/// Adds the character n-grams of every token.
///
/// The original token is kept; grams identical to it are not repeated.
#[derive(Debug, Clone)]
pub struct NGramFilter {
    min_gram: usize,
    max_gram: usize,
}

impl NGramFilter {
    pub fn new(min_gram: usize, max_gram: usize) -> Result<Self> {
        if min_gram == 0 {
            return Err(SiftError::invalid_argument("min_gram must be at least 1"));
        }
        if min_gram > max_gram {
            return Err(SiftError::invalid_argument(format!(
                "min_gram ({min_gram}) must not exceed max_gram ({max_gram})"
            )));
        }
        Ok(NGramFilter { min_gram, max_gram })
    }

    pub fn min_gram(&self) -> usize {
        self.min_gram
    }

    pub fn max_gram(&self) -> usize {
        self.max_gram
    }

    fn expand(token: Token, min_gram: usize, max_gram: usize) -> Vec<Token> {
        let chars: Vec<char> = token.text.chars().collect();
        let mut out = Vec::new();

        for len in min_gram..=max_gram.min(chars.len()) {
            for window in chars.windows(len) {
                let gram: String = window.iter().collect();
                if gram != token.text {
                    out.push(token.derive(gram));
                }
            }
        }

        out.insert(0, token);
        out
    }
}

impl Filter for NGramFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let (min_gram, max_gram) = (self.min_gram, self.max_gram);
        Ok(Box::new(
            tokens.flat_map(move |token| Self::expand(token, min_gram, max_gram)),
        ))
    }

    fn name(&self) -> &'static str {
        "ngram"
    }
}
