//! Error types for Sift.
//!
//! All fallible operations in the crate return [`Result`], whose error type
//! is [`SiftError`]. Collaborator implementations provided by a host are
//! expected to map their own failures into one of these variants (usually
//! [`SiftError::Storage`] or [`SiftError::Cache`]).

use thiserror::Error;

/// The error type for all Sift operations.
#[derive(Error, Debug)]
pub enum SiftError {
    /// An argument passed by the caller was rejected.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The engine configuration is invalid.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// A requested entity does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Indexing failed.
    #[error("Index error: {0}")]
    Index(String),

    /// A storage collaborator (document store, inverted index, term statistics,
    /// query log) failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// The cache collaborator failed.
    #[error("Cache error: {0}")]
    Cache(String),

    /// Serialization or deserialization of a payload failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Anything else.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SiftError {
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        SiftError::InvalidArgument(msg.into())
    }

    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        SiftError::InvalidConfig(msg.into())
    }

    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        SiftError::NotFound(msg.into())
    }

    pub fn index<S: Into<String>>(msg: S) -> Self {
        SiftError::Index(msg.into())
    }

    pub fn storage<S: Into<String>>(msg: S) -> Self {
        SiftError::Storage(msg.into())
    }

    pub fn cache<S: Into<String>>(msg: S) -> Self {
        SiftError::Cache(msg.into())
    }

    pub fn internal<S: Into<String>>(msg: S) -> Self {
        SiftError::Internal(msg.into())
    }
}

/// Result type alias for Sift operations.
pub type Result<T> = std::result::Result<T, SiftError>;
