//! Query-operator parser.
//!
//! # Syntax
//!
//! - `"red shoes"`: phrase, matched as a literal substring of the document
//! - `-banana`: exclusion, the term must not appear
//! - `+apple`: requirement, the term must appear
//! - `sho*` / `*oes`: wildcard, matched against indexed terms
//! - anything else: optional terms, at least one must appear
//!
//! Extraction runs in exactly that order and every step removes what it
//! consumed from the working string, so a piece of the raw query belongs to
//! exactly one clause set. Operators only bind at the start of a
//! whitespace-delimited token: the hyphen in `t-shirt` is not an exclusion.
//!
//! Parsing never fails. Blank or malformed input yields a query whose
//! clause sets are (partly) empty.

use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::analyzer::standard::StandardAnalyzer;

lazy_static! {
    static ref PHRASE: Regex = Regex::new(r#""([^"]*)""#).unwrap();
    static ref EXCLUSION: Regex = Regex::new(r"(?:^|\s)-(\S+)").unwrap();
    static ref REQUIREMENT: Regex = Regex::new(r"(?:^|\s)\+(\S+)").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// A parsed query. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzedQuery {
    original: String,
    tokens: Vec<String>,
    must: Vec<String>,
    should: Vec<String>,
    must_not: Vec<String>,
    phrase: Vec<String>,
    wildcard: Vec<String>,
}

impl AnalyzedQuery {
    /// The raw query text.
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Lowercased, trimmed query text with collapsed whitespace.
    pub fn normalized(&self) -> String {
        WHITESPACE
            .replace_all(self.original.trim(), " ")
            .to_lowercase()
    }

    /// Every positive term of the query: phrase words, required and optional
    /// terms, in that order and without duplicates.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Terms that must all be present.
    pub fn must(&self) -> &[String] {
        &self.must
    }

    /// Terms of which at least one must be present (when non-empty).
    pub fn should(&self) -> &[String] {
        &self.should
    }

    /// Terms that must not be present.
    pub fn must_not(&self) -> &[String] {
        &self.must_not
    }

    /// Lowercased phrases that must appear verbatim in the raw content.
    pub fn phrase(&self) -> &[String] {
        &self.phrase
    }

    /// Lowercased wildcard patterns.
    pub fn wildcard(&self) -> &[String] {
        &self.wildcard
    }

    /// True when every clause set is empty.
    pub fn is_empty(&self) -> bool {
        self.must.is_empty()
            && self.should.is_empty()
            && self.must_not.is_empty()
            && self.phrase.is_empty()
            && self.wildcard.is_empty()
    }
}

/// Splits raw query strings into clause sets.
///
/// Clause terms are normalized with the configured analyzer (standard by
/// default) so that they line up with indexed terms.
#[derive(Debug, Clone)]
pub struct QueryParser {
    analyzer: Arc<dyn Analyzer>,
}

impl Default for QueryParser {
    fn default() -> Self {
        Self::new(Arc::new(StandardAnalyzer::new()))
    }
}

impl QueryParser {
    pub fn new(analyzer: Arc<dyn Analyzer>) -> Self {
        QueryParser { analyzer }
    }

    /// Parse a raw query string.
    pub fn parse(&self, raw_query: &str) -> AnalyzedQuery {
        let mut working = raw_query.to_string();

        // 1. Phrases
        let phrase: Vec<String> = dedup(
            extract(&PHRASE, &mut working)
                .into_iter()
                .map(|p| WHITESPACE.replace_all(p.trim(), " ").to_lowercase())
                .filter(|p| !p.is_empty()),
        );

        // 2. Exclusions
        let must_not = dedup(
            extract(&EXCLUSION, &mut working)
                .into_iter()
                .flat_map(|t| self.normalize(&t)),
        );

        // 3. Requirements
        let must = dedup(
            extract(&REQUIREMENT, &mut working)
                .into_iter()
                .flat_map(|t| self.normalize(&t)),
        );

        // 4. Wildcards, 5. everything else
        let mut wildcard = Vec::new();
        let mut should = Vec::new();
        for piece in working.split_whitespace() {
            if piece.contains('*') {
                if piece.chars().any(|c| c != '*') {
                    wildcard.push(piece.to_lowercase());
                }
            } else {
                should.extend(self.normalize(piece));
            }
        }
        let wildcard = dedup(wildcard);
        let should = dedup(should);

        let tokens = dedup(
            phrase
                .iter()
                .flat_map(|p| self.normalize(p))
                .chain(must.iter().cloned())
                .chain(should.iter().cloned()),
        );

        AnalyzedQuery {
            original: raw_query.to_string(),
            tokens,
            must,
            should,
            must_not,
            phrase,
            wildcard,
        }
    }

    fn normalize(&self, text: &str) -> Vec<String> {
        match self.analyzer.analyze(text) {
            Ok(stream) => stream.map(|t| t.text).filter(|t| !t.is_empty()).collect(),
            Err(e) => {
                log::warn!("query analysis failed for '{text}': {e}");
                let lowered = text.trim().to_lowercase();
                if lowered.is_empty() {
                    Vec::new()
                } else {
                    vec![lowered]
                }
            }
        }
    }
}

/// Collect capture group 1 of every match and blank the matches out.
fn extract(re: &Regex, working: &mut String) -> Vec<String> {
    let found: Vec<String> = re
        .captures_iter(working)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect();
    if !found.is_empty() {
        *working = re.replace_all(working, " ").into_owned();
    }
    found
}

fn dedup<I: IntoIterator<Item = String>>(items: I) -> Vec<String> {
    let mut seen = ahash::AHashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
