pub mod config;
pub mod search;

use std::sync::Arc;

use ahash::AHashSet;
use parking_lot::RwLock;
use rayon::prelude::*;

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::analyzer::registry::AnalyzerRegistry;
use crate::data::{DocKey, Document};
use crate::error::{Result, SiftError};
use crate::lexical::posting::{FieldToken, Posting};
use crate::lexical::scoring;
use crate::lexical::writer::{self, IndexedField, Indexer};
use crate::query::parser::QueryParser;
use crate::spelling::completion::{CompletionProvider, NoCompletions};
use crate::spelling::suggest::{SuggestOptions, Suggester, Suggestion};
use crate::store::cache::{Cache, MemoryCache};
use crate::store::document::{DocumentStore, MemoryDocumentStore, StoredDocument};
use crate::store::event::{EngineEvent, EventSink, LogEventSink};
use crate::store::posting::{InvertedIndex, MemoryInvertedIndex};
use crate::store::query_log::{MemoryQueryLog, QueryLog};
use crate::store::stats::{MemoryTermStatistics, TermStatistics};

use self::config::EngineConfig;

/// Search and indexing engine.
///
/// The engine coordinates analysis, indexing, retrieval, facets and
/// suggestions over its collaborators. Mutations take the write side of an
/// internal gate and reads take the read side, so a search never observes a
/// document whose postings are half replaced.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    indexer: Indexer,
    parser: QueryParser,
    documents: Arc<dyn DocumentStore>,
    index: Arc<dyn InvertedIndex>,
    stats: Arc<dyn TermStatistics>,
    query_log: Arc<dyn QueryLog>,
    cache: Arc<dyn Cache>,
    events: Arc<dyn EventSink>,
    completions: Arc<dyn CompletionProvider>,
    gate: RwLock<()>,
}

/// Builder wiring an [`Engine`] to its collaborators.
///
/// Every collaborator defaults to its in-memory implementation; the event
/// sink defaults to [`LogEventSink`] and completions to [`NoCompletions`].
#[derive(Debug)]
pub struct EngineBuilder {
    config: EngineConfig,
    registry: AnalyzerRegistry,
    documents: Option<Arc<dyn DocumentStore>>,
    index: Option<Arc<dyn InvertedIndex>>,
    stats: Option<Arc<dyn TermStatistics>>,
    query_log: Option<Arc<dyn QueryLog>>,
    cache: Option<Arc<dyn Cache>>,
    events: Option<Arc<dyn EventSink>>,
    completions: Option<Arc<dyn CompletionProvider>>,
}

impl EngineBuilder {
    pub fn document_store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.documents = Some(store);
        self
    }

    pub fn inverted_index(mut self, index: Arc<dyn InvertedIndex>) -> Self {
        self.index = Some(index);
        self
    }

    pub fn term_statistics(mut self, stats: Arc<dyn TermStatistics>) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn query_log(mut self, log: Arc<dyn QueryLog>) -> Self {
        self.query_log = Some(log);
        self
    }

    pub fn cache(mut self, cache: Arc<dyn Cache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.events = Some(sink);
        self
    }

    pub fn completion_provider(mut self, provider: Arc<dyn CompletionProvider>) -> Self {
        self.completions = Some(provider);
        self
    }

    /// Make a custom analyzer available to `index_fields` under `name`.
    pub fn register_analyzer(mut self, name: impl Into<String>, analyzer: Arc<dyn Analyzer>) -> Self {
        self.registry.register(name, analyzer);
        self
    }

    pub fn build(self) -> Result<Engine> {
        self.config.validate()?;

        let fields = self
            .config
            .index_fields
            .iter()
            .map(|(name, field)| {
                IndexedField::new(name.as_str(), field.weight, self.registry.get(&field.analyzer))
            })
            .collect();

        Ok(Engine {
            indexer: Indexer::new(fields),
            parser: QueryParser::new(self.registry.default_analyzer()),
            documents: self
                .documents
                .unwrap_or_else(|| Arc::new(MemoryDocumentStore::new())),
            index: self
                .index
                .unwrap_or_else(|| Arc::new(MemoryInvertedIndex::new())),
            stats: self
                .stats
                .unwrap_or_else(|| Arc::new(MemoryTermStatistics::new())),
            query_log: self
                .query_log
                .unwrap_or_else(|| Arc::new(MemoryQueryLog::new())),
            cache: self.cache.unwrap_or_else(|| Arc::new(MemoryCache::new())),
            events: self.events.unwrap_or_else(|| Arc::new(LogEventSink)),
            completions: self.completions.unwrap_or_else(|| Arc::new(NoCompletions)),
            config: self.config,
            gate: RwLock::new(()),
        })
    }
}

/// What one document write changed, kept so that it can be undone.
#[derive(Debug)]
struct Change {
    key: DocKey,
    previous: Option<StoredDocument>,
    previous_postings: Vec<Posting>,
    incremented: Vec<String>,
    postings_written: bool,
}

impl Engine {
    /// Create an engine with in-memory collaborators.
    pub fn new(config: EngineConfig) -> Result<Self> {
        Self::builder(config).build()
    }

    pub fn builder(config: EngineConfig) -> EngineBuilder {
        EngineBuilder {
            config,
            registry: AnalyzerRegistry::new(),
            documents: None,
            index: None,
            stats: None,
            query_log: None,
            cache: None,
            events: None,
            completions: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Index (or re-index) a document. Returns the number of postings written.
    ///
    /// Only fields listed in `index_fields` are analyzed; a document with
    /// none of them is stored with zero postings.
    pub fn index(&self, doc_type: &str, id: &str, document: Document) -> Result<usize> {
        let key = checked_key(doc_type, id)?;
        check_boost(&key, &document)?;
        let tokens = self.indexer.extract_tokens(&document)?;

        let _gate = self.gate.write();
        let (_, postings) = self.apply(&key, &document, tokens)?;

        log::debug!("indexed {key} with {postings} postings");
        self.events
            .emit(&EngineEvent::DocumentIndexed { key, postings });
        Ok(postings)
    }

    /// Remove a document and its postings. Returns whether it existed.
    ///
    /// Term statistics are left untouched.
    pub fn delete(&self, doc_type: &str, id: &str) -> Result<bool> {
        let key = checked_key(doc_type, id)?;

        let _gate = self.gate.write();
        let existed = self.documents.delete(&key)?;
        let removed = self.index.delete_postings(&key)?;
        log::debug!("deleted {key} (existed: {existed}, postings removed: {removed})");

        if existed {
            self.events.emit(&EngineEvent::DocumentDeleted { key });
        }
        Ok(existed)
    }

    /// Index a batch of documents as one unit.
    ///
    /// Documents are analyzed in parallel, then written in order. If any
    /// write fails, the documents already written are restored to their
    /// previous state and the error is returned.
    pub fn bulk_index(&self, documents: Vec<(DocKey, Document)>) -> Result<usize> {
        for (key, document) in &documents {
            checked_key(&key.doc_type, &key.id)?;
            check_boost(key, document)?;
        }

        let analyzed: Vec<Vec<FieldToken>> = documents
            .par_iter()
            .map(|(_, document)| self.indexer.extract_tokens(document))
            .collect::<Result<_>>()?;

        let _gate = self.gate.write();
        let mut applied: Vec<Change> = Vec::with_capacity(documents.len());
        for ((key, document), tokens) in documents.iter().zip(analyzed) {
            match self.apply(key, document, tokens) {
                Ok((change, _)) => applied.push(change),
                Err(e) => {
                    log::warn!(
                        "bulk index failed at {key}, rolling back {} documents: {e}",
                        applied.len()
                    );
                    for change in applied.iter().rev() {
                        self.undo(change);
                    }
                    return Err(e);
                }
            }
        }

        let count = applied.len();
        log::debug!("bulk indexed {count} documents");
        self.events
            .emit(&EngineEvent::BulkIndexed { documents: count });
        Ok(count)
    }

    /// Rebuild every posting of `doc_type` from the stored token lists.
    /// Returns the number of documents rebuilt.
    pub fn reindex(&self, doc_type: &str) -> Result<usize> {
        if doc_type.trim().is_empty() {
            return Err(SiftError::invalid_argument("document type must not be empty"));
        }

        let _gate = self.gate.write();
        let stored = self.documents.all(Some(doc_type))?;
        let cleared = self.index.delete_type_postings(doc_type)?;
        log::debug!("reindex {doc_type}: cleared {cleared} postings");

        for doc in &stored {
            let postings = self.build_postings(&doc.key, &doc.tokens)?;
            self.index.upsert_postings(&doc.key, postings)?;
        }

        let documents = stored.len();
        log::debug!("reindexed {documents} documents of type {doc_type}");
        self.events.emit(&EngineEvent::Reindexed {
            doc_type: doc_type.to_string(),
            documents,
        });
        Ok(documents)
    }

    /// Run [`reindex`](Self::reindex) on the blocking thread pool.
    pub async fn reindex_in_background(self: &Arc<Self>, doc_type: impl Into<String>) -> Result<usize> {
        let engine = Arc::clone(self);
        let doc_type = doc_type.into();
        tokio::task::spawn_blocking(move || engine.reindex(&doc_type))
            .await
            .map_err(|e| SiftError::internal(format!("reindex task failed: {e}")))?
    }

    /// Fetch a stored document.
    pub fn get(&self, doc_type: &str, id: &str) -> Result<Option<StoredDocument>> {
        let _gate = self.gate.read();
        self.documents.get(&DocKey::new(doc_type, id))
    }

    /// Number of stored documents, optionally of one type.
    pub fn count(&self, doc_type: Option<&str>) -> Result<u64> {
        let _gate = self.gate.read();
        self.documents.count(doc_type)
    }

    /// Number of documents currently holding a posting for `term`.
    pub fn document_frequency(&self, term: &str) -> Result<u64> {
        let _gate = self.gate.read();
        self.index.term_document_frequency(term)
    }

    /// Prefix suggestions from indexed terms, past queries and completions.
    pub fn suggest(&self, prefix: &str, options: &SuggestOptions) -> Result<Vec<Suggestion>> {
        let _gate = self.gate.read();
        self.suggester().suggest(prefix, options)
    }

    /// "Did you mean" corrections for the words of `query`.
    pub fn generate_suggestions(&self, query: &str) -> Result<Vec<String>> {
        let _gate = self.gate.read();
        self.corrections(query)
    }

    fn suggester(&self) -> Suggester<'_> {
        Suggester::new(
            self.stats.as_ref(),
            self.query_log.as_ref(),
            self.completions.as_ref(),
        )
    }

    fn corrections(&self, query: &str) -> Result<Vec<String>> {
        let parsed = self.parser.parse(query);
        self.suggester().corrections(
            parsed.tokens(),
            self.config.min_word_length,
            self.config.fuzzy_distance,
        )
    }

    /// Write one document: store it, count its new terms, then replace its
    /// postings. On failure the partial write is undone before returning.
    fn apply(
        &self,
        key: &DocKey,
        document: &Document,
        tokens: Vec<FieldToken>,
    ) -> Result<(Change, usize)> {
        let mut change = Change {
            key: key.clone(),
            previous: self.documents.get(key)?,
            previous_postings: self.index.postings(key)?,
            incremented: Vec::new(),
            postings_written: false,
        };

        match self.write(&mut change, document, &tokens) {
            Ok(postings) => Ok((change, postings)),
            Err(e) => {
                self.undo(&change);
                Err(e)
            }
        }
    }

    fn write(&self, change: &mut Change, document: &Document, tokens: &[FieldToken]) -> Result<usize> {
        let known: AHashSet<String> = change
            .previous
            .as_ref()
            .map(|p| writer::distinct_terms(&p.tokens).into_iter().collect())
            .unwrap_or_default();

        self.documents.upsert(&change.key, document, tokens)?;

        for term in writer::distinct_terms(tokens) {
            if !known.contains(&term) {
                self.stats.increment_frequency(&term)?;
                change.incremented.push(term);
            }
        }

        let postings = self.build_postings(&change.key, tokens)?;
        let count = postings.len();
        change.postings_written = true;
        self.index.upsert_postings(&change.key, postings)?;
        Ok(count)
    }

    /// Best-effort restore of the state captured in `change`.
    fn undo(&self, change: &Change) {
        let key = &change.key;
        for term in change.incremented.iter().rev() {
            if let Err(e) = self.stats.decrement_frequency(term) {
                log::warn!("rollback of {key}: failed to decrement {term:?}: {e}");
            }
        }

        let restored = match &change.previous {
            Some(previous) => self
                .documents
                .upsert(key, &previous.document, &previous.tokens),
            None => self.documents.delete(key).map(|_| ()),
        };
        if let Err(e) = restored {
            log::warn!("rollback of {key}: failed to restore document: {e}");
        }

        if change.postings_written
            && let Err(e) = self
                .index
                .upsert_postings(key, change.previous_postings.clone())
        {
            log::warn!("rollback of {key}: failed to restore postings: {e}");
        }
    }

    fn build_postings(&self, key: &DocKey, tokens: &[FieldToken]) -> Result<Vec<Posting>> {
        let total_docs = self.documents.count(None)?;
        writer::build_postings(key, tokens, |term| {
            Ok(scoring::idf(total_docs, self.stats.frequency(term)?))
        })
    }
}

fn checked_key(doc_type: &str, id: &str) -> Result<DocKey> {
    if doc_type.trim().is_empty() {
        return Err(SiftError::invalid_argument("document type must not be empty"));
    }
    if id.trim().is_empty() {
        return Err(SiftError::invalid_argument("document id must not be empty"));
    }
    Ok(DocKey::new(doc_type, id))
}

fn check_boost(key: &DocKey, document: &Document) -> Result<()> {
    if !document.boost.is_finite() || document.boost < 0.0 {
        return Err(SiftError::invalid_argument(format!(
            "document {key} has invalid boost {}",
            document.boost
        )));
    }
    Ok(())
}
