//! The analyzer trait.

use std::any::Any;
use std::fmt::Debug;

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// A pure function from raw text to an ordered token sequence.
///
/// Analyzers are shared between the indexer and the query parser through
/// `Arc<dyn Analyzer>`, so implementations must be thread-safe.
pub trait Analyzer: Send + Sync + Debug {
    /// Analyze `text` into a token stream.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Name under which this analyzer is known (e.g. `"standard"`).
    fn name(&self) -> &str;

    /// Downcasting support.
    fn as_any(&self) -> &dyn Any;
}
