//! Query parsing.
//!
//! Raw query strings are split into clause sets by [`parser::QueryParser`];
//! wildcard clauses are compiled into [`wildcard::WildcardPattern`]s when
//! the query is executed.

pub mod parser;
pub mod wildcard;

pub use parser::{AnalyzedQuery, QueryParser};
pub use wildcard::WildcardPattern;
