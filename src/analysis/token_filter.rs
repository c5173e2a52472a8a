//! Token filters transform a token stream into another token stream.
//!
//! Filters are not part of the built-in analyzers; they are combined with a
//! base analyzer through [`PipelineAnalyzer`](crate::analysis::analyzer::pipeline::PipelineAnalyzer).

pub mod lowercase;
pub mod ngram;
pub mod stop;
pub mod synonym;

use std::fmt::Debug;

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// A pure function from a token sequence to a transformed token sequence.
pub trait Filter: Send + Sync + Debug {
    /// Apply this filter to a token stream.
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream>;

    /// Name of this filter.
    fn name(&self) -> &'static str;
}
