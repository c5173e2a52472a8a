//! Global term statistics collaborator.
//!
//! Tracks, per term, how many documents were indexed with it. The counts
//! feed IDF scoring and rank term suggestions. Deleting a document does
//! not decrement them, so counts may run ahead of the live index.

use std::collections::BTreeMap;
use std::fmt::Debug;

use parking_lot::RwLock;

use crate::error::Result;
use crate::util::levenshtein;

/// Per-term document frequency store.
pub trait TermStatistics: Send + Sync + Debug {
    /// Count one more document containing `term`.
    fn increment_frequency(&self, term: &str) -> Result<()>;

    /// Undo one increment. Saturates at zero.
    fn decrement_frequency(&self, term: &str) -> Result<()>;

    /// Current frequency of `term`, zero when unknown.
    fn frequency(&self, term: &str) -> Result<u64>;

    /// Terms within `max_edits` edits of `term`, most frequent first.
    fn find_similar(&self, term: &str, max_edits: usize) -> Result<Vec<(String, u64)>>;

    /// Up to `limit` terms starting with `prefix`, most frequent first.
    fn prefix_match(&self, prefix: &str, limit: usize) -> Result<Vec<String>>;
}

/// In-memory term statistics, ordered by term for prefix scans.
#[derive(Debug, Default)]
pub struct MemoryTermStatistics {
    terms: RwLock<BTreeMap<String, u64>>,
}

impl MemoryTermStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct terms tracked.
    pub fn len(&self) -> usize {
        self.terms.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.read().is_empty()
    }
}

fn rank(mut terms: Vec<(String, u64)>) -> Vec<(String, u64)> {
    terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    terms
}

impl TermStatistics for MemoryTermStatistics {
    fn increment_frequency(&self, term: &str) -> Result<()> {
        *self.terms.write().entry(term.to_string()).or_insert(0) += 1;
        Ok(())
    }

    fn decrement_frequency(&self, term: &str) -> Result<()> {
        let mut terms = self.terms.write();
        if let Some(count) = terms.get_mut(term) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                terms.remove(term);
            }
        }
        Ok(())
    }

    fn frequency(&self, term: &str) -> Result<u64> {
        Ok(self.terms.read().get(term).copied().unwrap_or(0))
    }

    fn find_similar(&self, term: &str, max_edits: usize) -> Result<Vec<(String, u64)>> {
        let terms = self.terms.read();
        let similar = terms
            .iter()
            .filter(|(candidate, _)| levenshtein::within(term, candidate, max_edits).is_some())
            .map(|(candidate, count)| (candidate.clone(), *count))
            .collect();
        Ok(rank(similar))
    }

    fn prefix_match(&self, prefix: &str, limit: usize) -> Result<Vec<String>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let terms = self.terms.read();
        let matches = terms
            .range(prefix.to_string()..)
            .take_while(|(term, _)| term.starts_with(prefix))
            .map(|(term, count)| (term.clone(), *count))
            .collect();
        Ok(rank(matches)
            .into_iter()
            .take(limit)
            .map(|(term, _)| term)
            .collect())
    }
}
