//! Context-aware completion extension point.

use std::fmt::Debug;

use crate::error::Result;

/// Supplies completions that do not come from the index or the query log,
/// such as curated phrases or catalogue entries.
pub trait CompletionProvider: Send + Sync + Debug {
    /// Up to `limit` completions for `prefix`, best first.
    fn complete(&self, prefix: &str, limit: usize) -> Result<Vec<String>>;
}

/// The default provider, which never completes anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCompletions;

impl CompletionProvider for NoCompletions {
    fn complete(&self, _prefix: &str, _limit: usize) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

/// Completes from a fixed list of phrases, in list order.
#[derive(Debug, Default, Clone)]
pub struct StaticCompletions {
    phrases: Vec<String>,
}

impl StaticCompletions {
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StaticCompletions {
            phrases: phrases.into_iter().map(Into::into).collect(),
        }
    }
}

impl CompletionProvider for StaticCompletions {
    fn complete(&self, prefix: &str, limit: usize) -> Result<Vec<String>> {
        let prefix = prefix.to_lowercase();
        Ok(self
            .phrases
            .iter()
            .filter(|p| p.to_lowercase().starts_with(&prefix))
            .take(limit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_completions() {
        let provider = StaticCompletions::new(["Shoe care kit", "shoelaces", "boots"]);
        assert_eq!(
            provider.complete("sho", 10).unwrap(),
            vec!["Shoe care kit", "shoelaces"]
        );
        assert_eq!(provider.complete("sho", 1).unwrap().len(), 1);
        assert!(NoCompletions.complete("sho", 10).unwrap().is_empty());
    }
}
