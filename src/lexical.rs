//! Lexical indexing and retrieval.
//!
//! Documents are turned into weighted [`FieldToken`]s by the [`Indexer`],
//! the tokens are folded into TF-IDF scored [`Posting`]s, and queries are
//! translated into a [`CandidateSpec`](crate::store::CandidateSpec) that the
//! inverted index evaluates.
//!
//! # Module Structure
//!
//! - `posting`: token and posting records
//! - `scoring`: TF, IDF and recency factors
//! - `writer`: field extraction and posting construction
//! - `searcher`: candidate spec construction and pagination
//! - `filter`: field filters applied to candidates
//! - `sort`: validated sort clauses
//! - `highlight`: whole-word match highlighting

pub mod filter;
pub mod highlight;
pub mod posting;
pub mod scoring;
pub mod searcher;
pub mod sort;
pub mod writer;

pub use filter::FieldFilter;
pub use highlight::Highlighter;
pub use posting::{FieldToken, Posting};
pub use sort::{SortClause, SortDirection, SortKey, SortRequest};
pub use writer::{IndexedField, Indexer};
