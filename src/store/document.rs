//! Document store collaborator.
//!
//! The document store is authoritative for document existence. It keeps the
//! raw document together with the token list extracted at index time.

use std::fmt::Debug;

use ahash::AHashMap;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::data::{DocKey, Document};
use crate::error::Result;
use crate::lexical::posting::FieldToken;

/// A document as persisted by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub key: DocKey,
    pub document: Document,
    pub tokens: Vec<FieldToken>,
    /// When the document was last written by `upsert`.
    pub indexed_at: DateTime<Utc>,
}

/// Persists raw documents and their extracted tokens.
pub trait DocumentStore: Send + Sync + Debug {
    /// Insert or replace the document stored under `key`.
    fn upsert(&self, key: &DocKey, document: &Document, tokens: &[FieldToken]) -> Result<()>;

    /// Fetch a document.
    fn get(&self, key: &DocKey) -> Result<Option<StoredDocument>>;

    /// Remove a document. Returns whether it existed.
    fn delete(&self, key: &DocKey) -> Result<bool>;

    /// Number of documents, optionally restricted to one type.
    fn count(&self, doc_type: Option<&str>) -> Result<u64>;

    /// All documents, optionally restricted to one type, ordered by key.
    fn all(&self, doc_type: Option<&str>) -> Result<Vec<StoredDocument>>;
}

/// In-memory document store.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    documents: RwLock<AHashMap<DocKey, StoredDocument>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn upsert(&self, key: &DocKey, document: &Document, tokens: &[FieldToken]) -> Result<()> {
        let stored = StoredDocument {
            key: key.clone(),
            document: document.clone(),
            tokens: tokens.to_vec(),
            indexed_at: Utc::now(),
        };
        self.documents.write().insert(key.clone(), stored);
        Ok(())
    }

    fn get(&self, key: &DocKey) -> Result<Option<StoredDocument>> {
        Ok(self.documents.read().get(key).cloned())
    }

    fn delete(&self, key: &DocKey) -> Result<bool> {
        Ok(self.documents.write().remove(key).is_some())
    }

    fn count(&self, doc_type: Option<&str>) -> Result<u64> {
        let guard = self.documents.read();
        let count = match doc_type {
            Some(t) => guard.keys().filter(|k| k.doc_type == t).count(),
            None => guard.len(),
        };
        Ok(count as u64)
    }

    fn all(&self, doc_type: Option<&str>) -> Result<Vec<StoredDocument>> {
        let guard = self.documents.read();
        let mut docs: Vec<StoredDocument> = guard
            .values()
            .filter(|d| doc_type.is_none_or(|t| d.key.doc_type == t))
            .cloned()
            .collect();
        docs.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(docs)
    }
}
