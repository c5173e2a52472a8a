//! Name-to-analyzer resolution.

use std::sync::Arc;

use ahash::AHashMap;

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::analyzer::keyword::KeywordAnalyzer;
use crate::analysis::analyzer::phonetic::PhoneticAnalyzer;
use crate::analysis::analyzer::standard::StandardAnalyzer;
use crate::analysis::analyzer::stemming::StemmingAnalyzer;

/// Name of the analyzer used when a configured name is unknown.
pub const DEFAULT_ANALYZER: &str = "standard";

/// Registry mapping analyzer names to implementations.
///
/// The built-in analyzers (`standard`, `keyword`, `stemming`, `phonetic`)
/// are always present. Looking up an unknown name never fails: it resolves
/// to the standard analyzer.
#[derive(Debug, Clone)]
pub struct AnalyzerRegistry {
    analyzers: AHashMap<String, Arc<dyn Analyzer>>,
    default: Arc<dyn Analyzer>,
}

impl Default for AnalyzerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalyzerRegistry {
    /// Create a registry holding the built-in analyzers.
    pub fn new() -> Self {
        let default: Arc<dyn Analyzer> = Arc::new(StandardAnalyzer::new());
        let mut registry = AnalyzerRegistry {
            analyzers: AHashMap::new(),
            default: default.clone(),
        };
        registry.register(DEFAULT_ANALYZER, default);
        registry.register("keyword", Arc::new(KeywordAnalyzer::new()));
        registry.register("stemming", Arc::new(StemmingAnalyzer::new()));
        registry.register("phonetic", Arc::new(PhoneticAnalyzer::new()));
        registry
    }

    /// Register (or replace) an analyzer under `name`.
    pub fn register(&mut self, name: impl Into<String>, analyzer: Arc<dyn Analyzer>) {
        self.analyzers.insert(name.into().to_lowercase(), analyzer);
    }

    /// Resolve `name`, falling back to the standard analyzer.
    pub fn get(&self, name: &str) -> Arc<dyn Analyzer> {
        match self.analyzers.get(&name.to_lowercase()) {
            Some(analyzer) => analyzer.clone(),
            None => {
                log::debug!("unknown analyzer '{name}', using '{DEFAULT_ANALYZER}'");
                self.default.clone()
            }
        }
    }

    /// Whether an analyzer is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.analyzers.contains_key(&name.to_lowercase())
    }

    /// The standard analyzer.
    pub fn default_analyzer(&self) -> Arc<dyn Analyzer> {
        self.default.clone()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.analyzers.keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyzer::pipeline::PipelineAnalyzer;

    #[test]
    fn test_builtins_registered() {
        let registry = AnalyzerRegistry::new();
        assert_eq!(
            registry.names(),
            vec!["keyword", "phonetic", "standard", "stemming"]
        );
        assert_eq!(registry.get("keyword").name(), "keyword");
        assert_eq!(registry.get("Stemming").name(), "stemming");
    }

    #[test]
    fn test_unknown_falls_back_to_standard() {
        let registry = AnalyzerRegistry::new();
        assert!(!registry.contains("klingon"));
        assert_eq!(registry.get("klingon").name(), "standard");
    }

    #[test]
    fn test_register_custom() {
        let mut registry = AnalyzerRegistry::new();
        registry.register(
            "autocomplete",
            Arc::new(PipelineAnalyzer::new("autocomplete", registry.default_analyzer())),
        );
        assert!(registry.contains("autocomplete"));
        assert_eq!(registry.get("autocomplete").name(), "autocomplete");
    }
}
