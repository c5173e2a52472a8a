//! Text analysis module for Sift.
//!
//! This module turns raw field text into the token sequences that are
//! indexed and queried. It includes:
//!
//! - **Analyzers**: complete text-to-token pipelines (standard, keyword,
//!   stemming, phonetic, and custom pipelines)
//! - **Token Filters**: independently composable transforms over a token
//!   stream (lowercase, stopwords, synonyms, n-grams)
//! - **Registry**: name-to-analyzer resolution used by field configuration
//!
//! # Architecture
//!
//! ```text
//! Text → Analyzer → Token Stream → Token Filters → Analyzed Tokens
//! ```
//!
//! # Examples
//!
//! ```
//! use sift::analysis::analyzer::analyzer::Analyzer;
//! use sift::analysis::analyzer::standard::StandardAnalyzer;
//!
//! let analyzer = StandardAnalyzer::new();
//! let tokens: Vec<String> = analyzer
//!     .analyze("Hello, World!")
//!     .unwrap()
//!     .map(|t| t.text)
//!     .collect();
//! assert_eq!(tokens, vec!["hello", "world"]);
//! ```

pub mod analyzer;
pub mod token;
pub mod token_filter;

// Re-exports
pub use analyzer::analyzer::Analyzer;
pub use analyzer::keyword::KeywordAnalyzer;
pub use analyzer::phonetic::PhoneticAnalyzer;
pub use analyzer::pipeline::PipelineAnalyzer;
pub use analyzer::registry::AnalyzerRegistry;
pub use analyzer::standard::StandardAnalyzer;
pub use analyzer::stemming::StemmingAnalyzer;
pub use token::{Token, TokenStream};
pub use token_filter::Filter as TokenFilter;
