use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::registry::DEFAULT_ANALYZER;
use crate::error::{Result, SiftError};

/// Largest accepted `fuzzy_distance`.
pub const MAX_FUZZY_DISTANCE: usize = 5;

/// Engine configuration. Immutable once the engine is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Shortest query word considered for "did you mean" corrections.
    pub min_word_length: usize,
    /// Upper bound on `from + size` for a search window.
    pub max_results: usize,
    /// Time to live of cached search results, in seconds.
    pub cache_ttl: u64,
    /// Tag wrapped around highlighted matches.
    pub highlight_tag: String,
    /// Edit distance used by fuzzy matching and corrections.
    pub fuzzy_distance: usize,
    /// Favour recently indexed documents.
    pub boost_recent: bool,
    /// Fields that are indexed, with their weight and analyzer.
    pub index_fields: HashMap<String, FieldConfig>,
    /// Document fields callers may sort on, besides `_score`, `_id` and `_type`.
    pub sortable_fields: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            min_word_length: 3,
            max_results: 1000,
            cache_ttl: 3600,
            highlight_tag: "em".to_string(),
            fuzzy_distance: 2,
            boost_recent: false,
            index_fields: HashMap::new(),
            sortable_fields: Vec::new(),
        }
    }
}

impl EngineConfig {
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Parse and validate a JSON configuration. Missing keys take their
    /// default values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_results == 0 {
            return Err(SiftError::invalid_config("max_results must be positive"));
        }
        if self.fuzzy_distance > MAX_FUZZY_DISTANCE {
            return Err(SiftError::invalid_config(format!(
                "fuzzy_distance must be at most {MAX_FUZZY_DISTANCE}, got {}",
                self.fuzzy_distance
            )));
        }
        if self.highlight_tag.trim().is_empty() {
            return Err(SiftError::invalid_config("highlight_tag must not be empty"));
        }
        if !self
            .highlight_tag
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(SiftError::invalid_config(format!(
                "highlight_tag {:?} is not a valid tag name",
                self.highlight_tag
            )));
        }
        for (name, field) in &self.index_fields {
            if !field.weight.is_finite() || field.weight < 0.0 {
                return Err(SiftError::invalid_config(format!(
                    "field {name:?} has invalid weight {}",
                    field.weight
                )));
            }
        }
        Ok(())
    }
}

fn default_weight() -> f32 {
    1.0
}

fn default_analyzer() -> String {
    DEFAULT_ANALYZER.to_string()
}

/// Indexing options of one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    #[serde(default = "default_weight")]
    pub weight: f32,
    /// Analyzer name, resolved through the analyzer registry. Unknown names
    /// fall back to the standard analyzer.
    #[serde(default = "default_analyzer")]
    pub analyzer: String,
}

impl Default for FieldConfig {
    fn default() -> Self {
        FieldConfig {
            weight: default_weight(),
            analyzer: default_analyzer(),
        }
    }
}

impl FieldConfig {
    pub fn new(weight: f32, analyzer: impl Into<String>) -> Self {
        FieldConfig {
            weight,
            analyzer: analyzer.into(),
        }
    }

    /// A field analyzed with the standard analyzer.
    pub fn weighted(weight: f32) -> Self {
        FieldConfig {
            weight,
            ..Default::default()
        }
    }
}

#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    pub fn min_word_length(mut self, length: usize) -> Self {
        self.config.min_word_length = length;
        self
    }

    pub fn max_results(mut self, max_results: usize) -> Self {
        self.config.max_results = max_results;
        self
    }

    pub fn cache_ttl(mut self, seconds: u64) -> Self {
        self.config.cache_ttl = seconds;
        self
    }

    pub fn highlight_tag(mut self, tag: impl Into<String>) -> Self {
        self.config.highlight_tag = tag.into();
        self
    }

    pub fn fuzzy_distance(mut self, distance: usize) -> Self {
        self.config.fuzzy_distance = distance;
        self
    }

    pub fn boost_recent(mut self, enabled: bool) -> Self {
        self.config.boost_recent = enabled;
        self
    }

    pub fn add_field(mut self, name: impl Into<String>, config: FieldConfig) -> Self {
        self.config.index_fields.insert(name.into(), config);
        self
    }

    /// Index `name` with the standard analyzer and the given weight.
    pub fn add_text_field(self, name: impl Into<String>, weight: f32) -> Self {
        self.add_field(name, FieldConfig::weighted(weight))
    }

    pub fn add_sortable_field(mut self, name: impl Into<String>) -> Self {
        self.config.sortable_fields.push(name.into());
        self
    }

    pub fn build(self) -> Result<EngineConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.min_word_length, 3);
        assert_eq!(config.max_results, 1000);
        assert_eq!(config.cache_ttl, 3600);
        assert_eq!(config.highlight_tag, "em");
        assert_eq!(config.fuzzy_distance, 2);
        assert!(!config.boost_recent);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json() {
        let config = EngineConfig::from_json(
            r#"{
                "max_results": 50,
                "index_fields": {
                    "title": {"weight": 3.0},
                    "sku": {"weight": 1.0, "analyzer": "keyword"}
                }
            }"#,
        )
        .unwrap();
        assert_eq!(config.max_results, 50);
        assert_eq!(config.cache_ttl, 3600);
        assert_eq!(config.index_fields["title"], FieldConfig::new(3.0, "standard"));
        assert_eq!(config.index_fields["sku"].analyzer, "keyword");
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            EngineConfig::from_json("{not json"),
            Err(SiftError::Serialization(_))
        ));
    }

    #[test]
    fn test_validate() {
        let invalid = [
            EngineConfig::builder().max_results(0).build(),
            EngineConfig::builder().fuzzy_distance(6).build(),
            EngineConfig::builder().highlight_tag("").build(),
            EngineConfig::builder().highlight_tag("em onclick=x").build(),
            EngineConfig::builder()
                .add_text_field("title", -1.0)
                .build(),
            EngineConfig::builder()
                .add_text_field("title", f32::NAN)
                .build(),
        ];
        for result in invalid {
            assert!(matches!(result, Err(SiftError::InvalidConfig(_))));
        }
    }

    #[test]
    fn test_builder() {
        let config = EngineConfig::builder()
            .add_text_field("title", 3.0)
            .add_field("category", FieldConfig::new(1.0, "keyword"))
            .add_sortable_field("price")
            .highlight_tag("mark")
            .boost_recent(true)
            .build()
            .unwrap();
        assert_eq!(config.index_fields.len(), 2);
        assert_eq!(config.sortable_fields, vec!["price"]);
        assert_eq!(config.highlight_tag, "mark");
        assert!(config.boost_recent);
    }
}
