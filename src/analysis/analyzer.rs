//! Analyzers combine tokenization and normalization into a single step.

#[allow(clippy::module_inception)]
pub mod analyzer;
pub mod keyword;
pub mod phonetic;
pub mod pipeline;
pub mod registry;
pub mod standard;
pub mod stemming;
