//! Stemming analyzer with a small suffix-stripping rule set.

use std::any::Any;

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::analyzer::standard::split_lowercase;
use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Strip a trailing `ing` or `ed`, then a trailing `s` that does not follow
/// another `s`. A suffix is only removed when something remains.
pub fn stem(word: &str) -> String {
    let mut stem = word;

    for suffix in ["ing", "ed"] {
        if stem.len() > suffix.len() && stem.ends_with(suffix) {
            stem = &stem[..stem.len() - suffix.len()];
            break;
        }
    }

    if stem.len() > 1 && stem.ends_with('s') && !stem.ends_with("ss") {
        stem = &stem[..stem.len() - 1];
    }

    stem.to_string()
}

/// Standard analysis followed by [`stem`].
#[derive(Debug, Clone, Default)]
pub struct StemmingAnalyzer;

impl StemmingAnalyzer {
    pub fn new() -> Self {
        StemmingAnalyzer
    }
}

impl Analyzer for StemmingAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        let tokens = split_lowercase(text)
            .into_iter()
            .map(|token| {
                let stemmed = stem(&token.text);
                token.derive(stemmed)
            });
        Ok(Box::new(tokens.collect::<Vec<_>>().into_iter()))
    }

    fn name(&self) -> &str {
        "stemming"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
