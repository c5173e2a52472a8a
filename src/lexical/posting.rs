//! Token and posting records.

use serde::{Deserialize, Serialize};

use crate::data::DocKey;

/// A token extracted from a document field, tagged with its field weight.
///
/// Token lists are persisted alongside the raw document so that a reindex
/// can rebuild postings without re-running analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldToken {
    pub term: String,
    pub field: String,
    pub weight: f32,
}

impl FieldToken {
    pub fn new(term: impl Into<String>, field: impl Into<String>, weight: f32) -> Self {
        FieldToken {
            term: term.into(),
            field: field.into(),
            weight,
        }
    }
}

/// One `(document, term, field)` entry of the inverted index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub key: DocKey,
    pub term: String,
    pub field: String,
    /// Occurrences of `term` in `field` for this document.
    pub frequency: u32,
    /// Weight of `field`.
    pub weight: f32,
    /// Precomputed TF-IDF score.
    pub score: f32,
}

impl Posting {
    pub fn doc_type(&self) -> &str {
        &self.key.doc_type
    }

    pub fn doc_id(&self) -> &str {
        &self.key.id
    }
}
