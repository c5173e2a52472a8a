//! Token representation shared by analyzers and filters.

use serde::{Deserialize, Serialize};

/// A single token produced by text analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The token text (always lowercase when produced by a built-in analyzer).
    pub text: String,
    /// Position of the token in the stream. Tokens added by expanding filters
    /// share the position of the token they were derived from.
    pub position: usize,
    /// Byte offset of the token start in the original text.
    pub start_offset: usize,
    /// Byte offset one past the token end in the original text.
    pub end_offset: usize,
}

impl Token {
    pub fn new(text: impl Into<String>, position: usize) -> Self {
        let text = text.into();
        let end_offset = text.len();
        Token {
            text,
            position,
            start_offset: 0,
            end_offset,
        }
    }

    pub fn with_offsets(mut self, start_offset: usize, end_offset: usize) -> Self {
        self.start_offset = start_offset;
        self.end_offset = end_offset;
        self
    }

    /// Derive a token with different text at the same position and offsets.
    pub fn derive(&self, text: impl Into<String>) -> Self {
        Token {
            text: text.into(),
            position: self.position,
            start_offset: self.start_offset,
            end_offset: self.end_offset,
        }
    }
}

/// A stream of tokens.
pub type TokenStream = Box<dyn Iterator<Item = Token> + Send>;

/// Collect a token stream into its token texts.
pub fn texts(stream: TokenStream) -> Vec<String> {
    stream.map(|t| t.text).collect()
}
