//! Inverted index collaborator.

use std::fmt::Debug;

use ahash::{AHashMap, AHashSet};
use parking_lot::RwLock;

use crate::data::DocKey;
use crate::error::Result;
use crate::lexical::posting::Posting;
use crate::query::wildcard::WildcardPattern;

/// Description of a candidate set, evaluated by [`InvertedIndex::query`].
///
/// A *group* is a list of alternative terms; it is satisfied when the
/// document has a posting for any of them. Plain terms are one-element
/// groups, fuzzy or wildcard expansions produce larger groups.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateSpec {
    /// Restrict to one document type.
    pub doc_type: Option<String>,
    /// Only postings of these fields count for matching and scoring. Empty
    /// means every field.
    pub fields: Vec<String>,
    /// Every group must be satisfied.
    pub must: Vec<Vec<String>>,
    /// When non-empty, at least one group must be satisfied.
    pub should: Vec<Vec<String>>,
    /// No posting of the document (in any field) may carry one of these terms.
    pub must_not: Vec<String>,
    /// Terms that add to the score without constraining the match.
    pub score_terms: Vec<String>,
}

impl CandidateSpec {
    /// True when neither `must` nor `should` constrain the match.
    pub fn is_unconstrained(&self) -> bool {
        self.must.is_empty() && self.should.is_empty()
    }

    fn scoring_terms(&self) -> AHashSet<&str> {
        self.must
            .iter()
            .chain(self.should.iter())
            .flatten()
            .chain(self.score_terms.iter())
            .map(|s| s.as_str())
            .collect()
    }
}

/// A candidate document with its aggregated score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRow {
    pub key: DocKey,
    /// `sum(posting.score * posting.weight)` over matching postings.
    pub score: f32,
    /// Distinct terms of the document that contributed to the score.
    pub matched_terms: Vec<String>,
}

/// Stores postings and evaluates candidate specs.
pub trait InvertedIndex: Send + Sync + Debug {
    /// Replace all postings of `key` with `postings`.
    fn upsert_postings(&self, key: &DocKey, postings: Vec<Posting>) -> Result<()>;

    /// Remove all postings of one document. Returns the number removed.
    fn delete_postings(&self, key: &DocKey) -> Result<usize>;

    /// Remove all postings of one document type. Returns the number removed.
    fn delete_type_postings(&self, doc_type: &str) -> Result<usize>;

    /// Postings of one document.
    fn postings(&self, key: &DocKey) -> Result<Vec<Posting>>;

    /// Evaluate a candidate spec. Unconstrained specs return every document
    /// that has at least one posting in scope.
    fn query(&self, spec: &CandidateSpec) -> Result<Vec<ScoredRow>>;

    /// Number of documents currently holding a posting for `term`.
    fn term_document_frequency(&self, term: &str) -> Result<u64>;

    /// Indexed terms matching a wildcard pattern, sorted.
    fn matching_terms(&self, pattern: &WildcardPattern) -> Result<Vec<String>>;
}

#[derive(Debug, Default)]
struct IndexState {
    by_doc: AHashMap<DocKey, Vec<Posting>>,
    by_term: AHashMap<String, AHashSet<DocKey>>,
}

impl IndexState {
    fn remove_doc(&mut self, key: &DocKey) -> usize {
        let Some(postings) = self.by_doc.remove(key) else {
            return 0;
        };
        for posting in &postings {
            if let Some(docs) = self.by_term.get_mut(&posting.term) {
                docs.remove(key);
                if docs.is_empty() {
                    self.by_term.remove(&posting.term);
                }
            }
        }
        postings.len()
    }

    fn docs_for_group(&self, group: &[String]) -> AHashSet<DocKey> {
        group
            .iter()
            .filter_map(|term| self.by_term.get(term))
            .flatten()
            .cloned()
            .collect()
    }
}

/// In-memory inverted index.
#[derive(Debug, Default)]
pub struct MemoryInvertedIndex {
    state: RwLock<IndexState>,
}

impl MemoryInvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of postings held.
    pub fn posting_count(&self) -> usize {
        self.state.read().by_doc.values().map(|p| p.len()).sum()
    }
}

impl InvertedIndex for MemoryInvertedIndex {
    fn upsert_postings(&self, key: &DocKey, postings: Vec<Posting>) -> Result<()> {
        let mut state = self.state.write();
        state.remove_doc(key);
        if postings.is_empty() {
            return Ok(());
        }
        for posting in &postings {
            state
                .by_term
                .entry(posting.term.clone())
                .or_default()
                .insert(key.clone());
        }
        state.by_doc.insert(key.clone(), postings);
        Ok(())
    }

    fn delete_postings(&self, key: &DocKey) -> Result<usize> {
        Ok(self.state.write().remove_doc(key))
    }

    fn delete_type_postings(&self, doc_type: &str) -> Result<usize> {
        let mut state = self.state.write();
        let keys: Vec<DocKey> = state
            .by_doc
            .keys()
            .filter(|k| k.doc_type == doc_type)
            .cloned()
            .collect();
        Ok(keys.iter().map(|k| state.remove_doc(k)).sum())
    }

    fn postings(&self, key: &DocKey) -> Result<Vec<Posting>> {
        Ok(self
            .state
            .read()
            .by_doc
            .get(key)
            .cloned()
            .unwrap_or_default())
    }

    fn query(&self, spec: &CandidateSpec) -> Result<Vec<ScoredRow>> {
        let state = self.state.read();

        // Seed the candidate keys from the most selective available clause.
        let seed: Vec<DocKey> = if let Some(first) = spec.must.first() {
            state.docs_for_group(first).into_iter().collect()
        } else if !spec.should.is_empty() {
            let mut union = AHashSet::new();
            for group in &spec.should {
                union.extend(state.docs_for_group(group));
            }
            union.into_iter().collect()
        } else {
            state.by_doc.keys().cloned().collect()
        };

        let in_fields = |posting: &Posting| {
            spec.fields.is_empty() || spec.fields.iter().any(|f| *f == posting.field)
        };
        let scoring_terms = spec.scoring_terms();

        let mut rows = Vec::new();
        for key in seed {
            if spec.doc_type.as_deref().is_some_and(|t| t != key.doc_type) {
                continue;
            }
            let Some(postings) = state.by_doc.get(&key) else {
                continue;
            };

            if postings
                .iter()
                .any(|p| spec.must_not.iter().any(|t| *t == p.term))
            {
                continue;
            }

            let scoped: Vec<&Posting> = postings.iter().filter(|p| in_fields(p)).collect();
            if scoped.is_empty() {
                continue;
            }
            let has = |group: &Vec<String>| scoped.iter().any(|p| group.contains(&p.term));
            if !spec.must.iter().all(has) {
                continue;
            }
            if !spec.should.is_empty() && !spec.should.iter().any(has) {
                continue;
            }

            let mut score = 0.0f32;
            let mut matched_terms: Vec<String> = Vec::new();
            for posting in scoped {
                if scoring_terms.contains(posting.term.as_str()) {
                    score += posting.score * posting.weight;
                    if !matched_terms.contains(&posting.term) {
                        matched_terms.push(posting.term.clone());
                    }
                }
            }

            rows.push(ScoredRow {
                key,
                score,
                matched_terms,
            });
        }

        rows.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(rows)
    }

    fn term_document_frequency(&self, term: &str) -> Result<u64> {
        Ok(self
            .state
            .read()
            .by_term
            .get(term)
            .map_or(0, |docs| docs.len() as u64))
    }

    fn matching_terms(&self, pattern: &WildcardPattern) -> Result<Vec<String>> {
        let state = self.state.read();
        let prefix = pattern.literal_prefix();
        let mut terms: Vec<String> = state
            .by_term
            .keys()
            .filter(|term| term.starts_with(prefix) && pattern.matches(term))
            .cloned()
            .collect();
        terms.sort();
        Ok(terms)
    }
}
