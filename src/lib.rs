//! # Sift
//!
//! An embeddable full-text search and indexing engine.
//!
//! ## Features
//!
//! - Pluggable analyzers per field (standard, keyword, stemming, phonetic,
//!   custom pipelines)
//! - Query operators: `+required`, `-excluded`, `"exact phrases"`, `wild*`
//! - TF-IDF scoring with field weights, document boosts and optional recency
//! - Field filters, sorting, pagination and highlighting
//! - Terms, range and histogram facets
//! - Prefix suggestions and "did you mean" corrections
//! - Every persistent concern behind a trait, with in-memory implementations
//!
//! ## Example
//!
//! ```
//! use sift::{Document, Engine, EngineConfig, SearchOptions};
//!
//! # fn main() -> sift::Result<()> {
//! let config = EngineConfig::builder()
//!     .add_text_field("title", 2.0)
//!     .build()?;
//! let engine = Engine::new(config)?;
//!
//! engine.index("product", "1", Document::new().add_text("title", "Red Shoes"))?;
//! engine.index("product", "2", Document::new().add_text("title", "Blue Shoes"))?;
//!
//! let result = engine.search("+red shoes", &SearchOptions::default())?;
//! assert_eq!(result.total, 1);
//! assert_eq!(result.hits[0].id(), "1");
//! # Ok(())
//! # }
//! ```

pub mod analysis;
mod data;
mod engine;
mod error;
pub mod facet;
pub mod lexical;
pub mod query;
pub mod spelling;
pub mod store;
mod util;

// Re-exports for the public API
pub use analysis::analyzer::analyzer::Analyzer;
pub use data::{DataValue, DocKey, Document};
pub use engine::config::{EngineConfig, EngineConfigBuilder, FieldConfig};
pub use engine::search::{SearchHit, SearchOptions, SearchOptionsBuilder, SearchResult};
pub use engine::{Engine, EngineBuilder};
pub use error::{Result, SiftError};
pub use facet::{FacetRequest, FacetResult, RangeSpec};
pub use lexical::{FieldFilter, SortRequest};
pub use spelling::{CompletionProvider, SuggestOptions, Suggestion, SuggestionSource};
pub use store::{
    Cache, DocumentStore, EngineEvent, EventSink, InvertedIndex, QueryLog, StoredDocument,
    TermStatistics,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
