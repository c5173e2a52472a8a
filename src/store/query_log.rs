//! Query history collaborator.
//!
//! Every executed query is appended to the log. Phrase suggestions are
//! drawn from the queries that returned at least one result.

use std::fmt::Debug;

use ahash::AHashMap;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One recorded search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryLogEntry {
    /// Trimmed, lowercased query text.
    pub query: String,
    pub result_count: u64,
    pub elapsed_ms: u64,
    pub timestamp: DateTime<Utc>,
}

/// Append-only log of executed queries.
pub trait QueryLog: Send + Sync + Debug {
    fn record(&self, query: &str, result_count: u64, elapsed_ms: u64) -> Result<()>;

    /// Past queries starting with `prefix` that returned results, with the
    /// number of times each was run, most frequent first.
    fn prefix_match(&self, prefix: &str, limit: usize) -> Result<Vec<(String, u64)>>;
}

/// In-memory query log.
#[derive(Debug, Default)]
pub struct MemoryQueryLog {
    entries: RwLock<Vec<QueryLogEntry>>,
}

impl MemoryQueryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded entries, oldest first.
    pub fn entries(&self) -> Vec<QueryLogEntry> {
        self.entries.read().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl QueryLog for MemoryQueryLog {
    fn record(&self, query: &str, result_count: u64, elapsed_ms: u64) -> Result<()> {
        let entry = QueryLogEntry {
            query: query.trim().to_lowercase(),
            result_count,
            elapsed_ms,
            timestamp: Utc::now(),
        };
        self.entries.write().push(entry);
        Ok(())
    }

    fn prefix_match(&self, prefix: &str, limit: usize) -> Result<Vec<(String, u64)>> {
        let prefix = prefix.trim().to_lowercase();
        let entries = self.entries.read();

        let mut counts: AHashMap<&str, u64> = AHashMap::new();
        for entry in entries.iter() {
            if entry.result_count > 0 && entry.query.starts_with(&prefix) {
                *counts.entry(entry.query.as_str()).or_insert(0) += 1;
            }
        }

        let mut ranked: Vec<(String, u64)> = counts
            .into_iter()
            .map(|(query, count)| (query.to_string(), count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(limit);
        Ok(ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_match_counts_successful_queries() {
        let log = MemoryQueryLog::new();
        log.record("Shoes", 3, 1).unwrap();
        log.record("shoes", 2, 1).unwrap();
        log.record("shoe rack", 1, 1).unwrap();
        log.record("shoelace", 0, 1).unwrap();
        log.record("boots", 5, 1).unwrap();

        let matches = log.prefix_match("sho", 10).unwrap();
        assert_eq!(
            matches,
            vec![("shoes".to_string(), 2), ("shoe rack".to_string(), 1)]
        );
        assert_eq!(log.prefix_match("sho", 1).unwrap().len(), 1);
        assert_eq!(log.len(), 5);
    }
}
