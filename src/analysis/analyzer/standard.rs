//! Standard analyzer: lowercase and split on whitespace and punctuation.

use std::any::Any;

use lazy_static::lazy_static;
use regex::Regex;

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::token::{Token, TokenStream};
use crate::error::Result;

lazy_static! {
    static ref SEPARATORS: Regex = Regex::new(r#"[\s\-_,.;:!?'"]+"#).unwrap();
}

/// Split `text` on the standard separator set, lowercasing every piece.
///
/// Offsets refer to the original (not lowercased) text. Empty pieces are
/// dropped, so positions are contiguous.
pub(crate) fn split_lowercase(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut start = 0;

    let push = |from: usize, to: usize, tokens: &mut Vec<Token>| {
        if from < to {
            let position = tokens.len();
            tokens.push(Token::new(text[from..to].to_lowercase(), position).with_offsets(from, to));
        }
    };

    for sep in SEPARATORS.find_iter(text) {
        push(start, sep.start(), &mut tokens);
        start = sep.end();
    }
    push(start, text.len(), &mut tokens);

    tokens
}

/// The default analyzer.
#[derive(Debug, Clone, Default)]
pub struct StandardAnalyzer;

impl StandardAnalyzer {
    pub fn new() -> Self {
        StandardAnalyzer
    }
}

impl Analyzer for StandardAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        Ok(Box::new(split_lowercase(text).into_iter()))
    }

    fn name(&self) -> &str {
        "standard"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
