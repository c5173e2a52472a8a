//! Prefix suggestions and edit-distance corrections.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::spelling::completion::CompletionProvider;
use crate::store::query_log::QueryLog;
use crate::store::stats::TermStatistics;

/// Upper bound on corrections returned for one query.
pub const MAX_CORRECTIONS: usize = 5;

/// Where a suggestion came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionSource {
    /// An indexed term.
    Term,
    /// A past query that returned results.
    Query,
    /// The completion provider.
    Completion,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub text: String,
    pub source: SuggestionSource,
    /// Term frequency or query count; completions carry zero.
    pub weight: u64,
}

/// Which sources to consult and how many results to return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestOptions {
    pub size: usize,
    pub terms: bool,
    pub queries: bool,
    pub completions: bool,
}

impl Default for SuggestOptions {
    fn default() -> Self {
        SuggestOptions {
            size: 10,
            terms: true,
            queries: true,
            completions: true,
        }
    }
}

impl SuggestOptions {
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }
}

/// Runs suggestion lookups against the term statistics, the query log and
/// a completion provider.
#[derive(Debug, Clone, Copy)]
pub struct Suggester<'a> {
    stats: &'a dyn TermStatistics,
    query_log: &'a dyn QueryLog,
    completions: &'a dyn CompletionProvider,
}

impl<'a> Suggester<'a> {
    pub fn new(
        stats: &'a dyn TermStatistics,
        query_log: &'a dyn QueryLog,
        completions: &'a dyn CompletionProvider,
    ) -> Self {
        Suggester {
            stats,
            query_log,
            completions,
        }
    }

    /// Up to `options.size` suggestions for `prefix`.
    ///
    /// Sources are consulted in order terms, queries, completions, and a
    /// text already produced by an earlier source is skipped. A blank prefix
    /// yields nothing.
    pub fn suggest(&self, prefix: &str, options: &SuggestOptions) -> Result<Vec<Suggestion>> {
        let prefix = prefix.trim().to_lowercase();
        if prefix.is_empty() || options.size == 0 {
            return Ok(Vec::new());
        }
        let size = options.size;

        let mut candidates = Vec::new();
        if options.terms {
            for term in self.stats.prefix_match(&prefix, size)? {
                let weight = self.stats.frequency(&term)?;
                candidates.push(Suggestion {
                    text: term,
                    source: SuggestionSource::Term,
                    weight,
                });
            }
        }
        if options.queries {
            for (query, count) in self.query_log.prefix_match(&prefix, size)? {
                candidates.push(Suggestion {
                    text: query,
                    source: SuggestionSource::Query,
                    weight: count,
                });
            }
        }
        if options.completions {
            for text in self.completions.complete(&prefix, size)? {
                candidates.push(Suggestion {
                    text,
                    source: SuggestionSource::Completion,
                    weight: 0,
                });
            }
        }

        let mut seen = AHashSet::new();
        Ok(candidates
            .into_iter()
            .filter(|s| seen.insert(s.text.to_lowercase()))
            .take(size)
            .collect())
    }

    /// Corrections for the words of a query.
    ///
    /// For every word of at least `min_word_length` chars, indexed terms
    /// within `max_edits` edits (other than the word itself) are collected.
    /// The merged list is ranked by term frequency and capped at
    /// [`MAX_CORRECTIONS`].
    pub fn corrections<S: AsRef<str>>(
        &self,
        words: &[S],
        min_word_length: usize,
        max_edits: usize,
    ) -> Result<Vec<String>> {
        let mut candidates: Vec<(String, u64)> = Vec::new();
        for word in words.iter().map(AsRef::as_ref) {
            if word.chars().count() < min_word_length {
                continue;
            }
            for (term, frequency) in self.stats.find_similar(word, max_edits)? {
                if term != word && !candidates.iter().any(|(t, _)| *t == term) {
                    candidates.push((term, frequency));
                }
            }
        }
        candidates.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Ok(candidates
            .into_iter()
            .take(MAX_CORRECTIONS)
            .map(|(term, _)| term)
            .collect())
    }
}
