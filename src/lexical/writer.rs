//! Field extraction and posting construction.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::token::Token;
use crate::data::{DocKey, Document};
use crate::error::Result;
use crate::lexical::posting::{FieldToken, Posting};
use crate::lexical::scoring;

/// An indexed field with its resolved analyzer.
#[derive(Debug, Clone)]
pub struct IndexedField {
    pub name: String,
    pub weight: f32,
    pub analyzer: Arc<dyn Analyzer>,
}

impl IndexedField {
    pub fn new(name: impl Into<String>, weight: f32, analyzer: Arc<dyn Analyzer>) -> Self {
        IndexedField {
            name: name.into(),
            weight,
            analyzer,
        }
    }
}

/// Turns documents into weighted tokens and tokens into postings.
#[derive(Debug, Clone, Default)]
pub struct Indexer {
    fields: Vec<IndexedField>,
}

impl Indexer {
    /// Create an indexer over `fields`. Fields are visited in name order.
    pub fn new(mut fields: Vec<IndexedField>) -> Self {
        fields.sort_by(|a, b| a.name.cmp(&b.name));
        Indexer { fields }
    }

    pub fn fields(&self) -> &[IndexedField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&IndexedField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Extract the tokens of every configured field present in `document`.
    ///
    /// Fields not configured for indexing are ignored, so a document with
    /// none of them yields an empty list.
    pub fn extract_tokens(&self, document: &Document) -> Result<Vec<FieldToken>> {
        let mut tokens = Vec::new();
        for field in &self.fields {
            let Some(value) = document.get(&field.name) else {
                continue;
            };
            for part in value.analyzable_parts() {
                let stream: Vec<Token> = field.analyzer.analyze(&part)?.collect();
                tokens.extend(
                    stream
                        .into_iter()
                        .filter(|t| !t.text.is_empty())
                        .map(|t| FieldToken::new(t.text, field.name.as_str(), field.weight)),
                );
            }
        }
        Ok(tokens)
    }
}

/// Distinct terms of a token list, sorted.
pub fn distinct_terms(tokens: &[FieldToken]) -> Vec<String> {
    let mut terms: Vec<String> = tokens.iter().map(|t| t.term.clone()).collect();
    terms.sort();
    terms.dedup();
    terms
}

/// Fold a token list into one posting per distinct `(term, field)`.
///
/// `idf` is resolved once per distinct term.
pub fn build_postings<F>(key: &DocKey, tokens: &[FieldToken], mut idf: F) -> Result<Vec<Posting>>
where
    F: FnMut(&str) -> Result<f32>,
{
    let mut grouped: BTreeMap<(&str, &str), (u32, f32)> = BTreeMap::new();
    for token in tokens {
        let entry = grouped
            .entry((token.field.as_str(), token.term.as_str()))
            .or_insert((0, token.weight));
        entry.0 += 1;
    }

    let mut idf_cache: BTreeMap<&str, f32> = BTreeMap::new();
    let mut postings = Vec::with_capacity(grouped.len());
    for ((field, term), (frequency, weight)) in grouped {
        let term_idf = match idf_cache.get(term) {
            Some(value) => *value,
            None => {
                let value = idf(term)?;
                idf_cache.insert(term, value);
                value
            }
        };
        postings.push(Posting {
            key: key.clone(),
            term: term.to_string(),
            field: field.to_string(),
            frequency,
            weight,
            score: scoring::posting_score(frequency, term_idf, weight),
        });
    }
    Ok(postings)
}
