//! Custom analyzers built from a base analyzer and a chain of token filters.

use std::any::Any;
use std::sync::Arc;

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// An analyzer that runs `base` and then every filter in order.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use sift::analysis::analyzer::analyzer::Analyzer;
/// use sift::analysis::analyzer::pipeline::PipelineAnalyzer;
/// use sift::analysis::analyzer::standard::StandardAnalyzer;
/// use sift::analysis::token_filter::stop::StopFilter;
///
/// let analyzer = PipelineAnalyzer::new("standard_stop", Arc::new(StandardAnalyzer::new()))
///     .add_filter(Arc::new(StopFilter::new()));
/// let tokens: Vec<String> = analyzer.analyze("the red shoes").unwrap().map(|t| t.text).collect();
/// assert_eq!(tokens, vec!["red", "shoes"]);
/// ```
#[derive(Debug, Clone)]
pub struct PipelineAnalyzer {
    name: String,
    base: Arc<dyn Analyzer>,
    filters: Vec<Arc<dyn Filter>>,
}

impl PipelineAnalyzer {
    pub fn new(name: impl Into<String>, base: Arc<dyn Analyzer>) -> Self {
        PipelineAnalyzer {
            name: name.into(),
            base,
            filters: Vec::new(),
        }
    }

    /// Append a filter to the chain.
    pub fn add_filter(mut self, filter: Arc<dyn Filter>) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn filters(&self) -> &[Arc<dyn Filter>] {
        &self.filters
    }
}

impl Analyzer for PipelineAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        let mut stream = self.base.analyze(text)?;
        for filter in &self.filters {
            stream = filter.filter(stream)?;
        }
        Ok(stream)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
