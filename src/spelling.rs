//! Suggestions and "did you mean" corrections.
//!
//! Prefix suggestions merge three sources: indexed terms ranked by term
//! frequency, past successful queries ranked by how often they ran, and an
//! optional [`CompletionProvider`]. Corrections for zero-result searches
//! are drawn from indexed terms within a bounded edit distance.

pub mod completion;
pub mod suggest;

pub use completion::{CompletionProvider, NoCompletions, StaticCompletions};
pub use suggest::{SuggestOptions, Suggester, Suggestion, SuggestionSource};
