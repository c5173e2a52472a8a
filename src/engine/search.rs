use std::collections::BTreeMap;
use std::time::Instant;

use ahash::{AHashMap, AHashSet};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::data::{DocKey, Document};
use crate::engine::Engine;
use crate::error::Result;
use crate::facet::{self, FacetRequest, FacetResult};
use crate::lexical::filter::{self, FieldFilter};
use crate::lexical::highlight::Highlighter;
use crate::lexical::scoring;
use crate::lexical::searcher::{self, PlanOptions};
use crate::lexical::sort::{self, SortRequest, Sortable};
use crate::query::parser::AnalyzedQuery;
use crate::store::document::StoredDocument;
use crate::store::event::EngineEvent;
use crate::store::posting::ScoredRow;

const CACHE_KEY_PREFIX: &str = "sift:search";

/// Options of a search request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Restrict to one document type.
    pub index: Option<String>,
    /// Only postings of these fields match. Empty means every field.
    pub fields: Vec<String>,
    pub filters: Vec<FieldFilter>,
    pub sort: Vec<SortRequest>,
    pub from: usize,
    pub size: usize,
    pub highlight: bool,
    pub fuzzy: bool,
    /// Attach corrections when nothing matched.
    pub suggest: bool,
    /// Named facets computed over the full result set.
    pub facets: BTreeMap<String, FacetRequest>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            index: None,
            fields: Vec::new(),
            filters: Vec::new(),
            sort: Vec::new(),
            from: 0,
            size: 10,
            highlight: false,
            fuzzy: false,
            suggest: false,
            facets: BTreeMap::new(),
        }
    }
}

impl SearchOptions {
    pub fn builder() -> SearchOptionsBuilder {
        SearchOptionsBuilder::default()
    }
}

#[derive(Debug, Default)]
pub struct SearchOptionsBuilder {
    options: SearchOptions,
}

impl SearchOptionsBuilder {
    pub fn index(mut self, doc_type: impl Into<String>) -> Self {
        self.options.index = Some(doc_type.into());
        self
    }

    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.options.fields.push(field.into());
        self
    }

    pub fn filter(mut self, filter: FieldFilter) -> Self {
        self.options.filters.push(filter);
        self
    }

    pub fn sort(mut self, sort: SortRequest) -> Self {
        self.options.sort.push(sort);
        self
    }

    pub fn from(mut self, from: usize) -> Self {
        self.options.from = from;
        self
    }

    pub fn size(mut self, size: usize) -> Self {
        self.options.size = size;
        self
    }

    pub fn highlight(mut self, enabled: bool) -> Self {
        self.options.highlight = enabled;
        self
    }

    pub fn fuzzy(mut self, enabled: bool) -> Self {
        self.options.fuzzy = enabled;
        self
    }

    pub fn suggest(mut self, enabled: bool) -> Self {
        self.options.suggest = enabled;
        self
    }

    pub fn facet(mut self, name: impl Into<String>, request: FacetRequest) -> Self {
        self.options.facets.insert(name.into(), request);
        self
    }

    pub fn build(self) -> SearchOptions {
        self.options
    }
}

/// One ranked document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub key: DocKey,
    pub score: f32,
    pub document: Document,
    /// Distinct indexed terms of the document that matched the query.
    pub matched_terms: Vec<String>,
    /// Field name to highlighted text, for configured fields with a match.
    pub highlights: BTreeMap<String, String>,
}

impl SearchHit {
    pub fn doc_type(&self) -> &str {
        &self.key.doc_type
    }

    pub fn id(&self) -> &str {
        &self.key.id
    }
}

/// Ranked, paginated search outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub hits: Vec<SearchHit>,
    /// Number of matching documents before pagination.
    pub total: usize,
    pub from: usize,
    pub size: usize,
    pub facets: Option<BTreeMap<String, FacetResult>>,
    pub suggestions: Option<Vec<String>>,
    pub elapsed_ms: u64,
}

impl SearchResult {
    pub fn ids(&self) -> Vec<&str> {
        self.hits.iter().map(|h| h.id()).collect()
    }
}

/// A matching document before pagination.
#[derive(Debug)]
struct Candidate {
    stored: StoredDocument,
    score: f32,
    matched_terms: Vec<String>,
}

impl Sortable for Candidate {
    fn key(&self) -> &DocKey {
        &self.stored.key
    }

    fn score(&self) -> f32 {
        self.score
    }

    fn document(&self) -> &Document {
        &self.stored.document
    }
}

impl Engine {
    /// Run a query.
    ///
    /// Results are read through the cache, keyed by the normalized query and
    /// the full option set. Cache failures fall back to computing the result.
    pub fn search(&self, query: &str, options: &SearchOptions) -> Result<SearchResult> {
        let started = Instant::now();
        let parsed = self.parser.parse(query);
        let normalized = parsed.normalized();
        let cache_key = cache_key(&normalized, options)?;

        if let Some(mut cached) = self.cached(&cache_key) {
            cached.elapsed_ms = started.elapsed().as_millis() as u64;
            self.events.emit(&EngineEvent::SearchExecuted {
                query: normalized,
                total: cached.total,
                elapsed_ms: cached.elapsed_ms,
                cached: true,
            });
            return Ok(cached);
        }

        let mut result = {
            let _gate = self.gate.read();
            self.execute(&parsed, options)?
        };
        result.elapsed_ms = started.elapsed().as_millis() as u64;

        match serde_json::to_vec(&result) {
            Ok(payload) => {
                if let Err(e) = self.cache.set(&cache_key, payload, self.config.cache_ttl) {
                    log::warn!("failed to cache search result: {e}");
                }
            }
            Err(e) => log::warn!("failed to serialize search result: {e}"),
        }

        if !parsed.is_empty()
            && let Err(e) =
                self.query_log
                    .record(&normalized, result.total as u64, result.elapsed_ms)
        {
            log::warn!("failed to record query {normalized:?}: {e}");
        }

        log::debug!(
            "search {normalized:?}: {} of {} hits in {} ms",
            result.hits.len(),
            result.total,
            result.elapsed_ms
        );
        self.events.emit(&EngineEvent::SearchExecuted {
            query: normalized,
            total: result.total,
            elapsed_ms: result.elapsed_ms,
            cached: false,
        });
        Ok(result)
    }

    /// Compute one facet over the documents matching `query` and `options`.
    /// Pagination options are ignored.
    pub fn facet(
        &self,
        query: &str,
        options: &SearchOptions,
        request: &FacetRequest,
    ) -> Result<FacetResult> {
        request.validate()?;
        let parsed = self.parser.parse(query);

        let _gate = self.gate.read();
        let candidates = self.candidates(&parsed, options)?;
        let documents: Vec<&Document> = candidates.iter().map(|c| &c.stored.document).collect();
        facet::compute(request, &documents)
    }

    fn cached(&self, key: &str) -> Option<SearchResult> {
        let payload = match self.cache.get(key) {
            Ok(payload) => payload?,
            Err(e) => {
                log::warn!("cache unavailable, computing directly: {e}");
                return None;
            }
        };
        match serde_json::from_slice(&payload) {
            Ok(result) => Some(result),
            Err(e) => {
                log::warn!("discarding unreadable cache entry {key}: {e}");
                None
            }
        }
    }

    fn execute(&self, parsed: &AnalyzedQuery, options: &SearchOptions) -> Result<SearchResult> {
        for request in options.facets.values() {
            request.validate()?;
        }

        let mut candidates = self.candidates(parsed, options)?;

        let clauses = sort::validate(&options.sort, &self.config.sortable_fields);
        sort::sort_rows(&mut candidates, &clauses);

        let total = candidates.len();

        let facets = if options.facets.is_empty() {
            None
        } else {
            let documents: Vec<&Document> =
                candidates.iter().map(|c| &c.stored.document).collect();
            let mut results = BTreeMap::new();
            for (name, request) in &options.facets {
                results.insert(name.clone(), facet::compute(request, &documents)?);
            }
            Some(results)
        };

        let suggestions = if options.suggest && total == 0 {
            Some(self.corrections(parsed.original())?)
        } else {
            None
        };

        let window = searcher::window(total, options.from, options.size, self.config.max_results);
        let (from, size) = (window.start, window.len());
        let mut hits = Vec::with_capacity(size);
        for candidate in candidates.drain(window) {
            let highlights = if options.highlight {
                self.highlight(parsed, &candidate)?
            } else {
                BTreeMap::new()
            };
            hits.push(SearchHit {
                key: candidate.stored.key,
                score: candidate.score,
                document: candidate.stored.document,
                matched_terms: candidate.matched_terms,
                highlights,
            });
        }

        Ok(SearchResult {
            hits,
            total,
            from,
            size,
            facets,
            suggestions,
            elapsed_ms: 0,
        })
    }

    /// Every document matching the query clauses, phrases and filters, with
    /// its final score.
    fn candidates(&self, parsed: &AnalyzedQuery, options: &SearchOptions) -> Result<Vec<Candidate>> {
        let scope = options.index.as_deref();
        let plan_options = PlanOptions {
            doc_type: scope,
            fields: &options.fields,
            indexed_fields: self.indexer.fields(),
            fuzzy_distance: options.fuzzy.then_some(self.config.fuzzy_distance),
        };
        let spec = searcher::plan(parsed, plan_options, self.index.as_ref(), self.stats.as_ref())?;

        let rows: Vec<(StoredDocument, ScoredRow)> = if spec.is_unconstrained() {
            // Nothing narrows the match: start from every stored document.
            let mut scored: AHashMap<DocKey, ScoredRow> = AHashMap::new();
            if !spec.score_terms.is_empty() {
                for row in self.index.query(&spec)? {
                    scored.insert(row.key.clone(), row);
                }
            }
            let excluded: AHashSet<DocKey> = if spec.must_not.is_empty() {
                AHashSet::new()
            } else {
                self.index
                    .query(&searcher::exclusion_spec(scope, &spec.must_not))?
                    .into_iter()
                    .map(|row| row.key)
                    .collect()
            };
            self.documents
                .all(scope)?
                .into_iter()
                .filter(|doc| !excluded.contains(&doc.key))
                .map(|doc| {
                    let row = scored.remove(&doc.key).unwrap_or_else(|| ScoredRow {
                        key: doc.key.clone(),
                        score: 0.0,
                        matched_terms: Vec::new(),
                    });
                    (doc, row)
                })
                .collect()
        } else {
            let mut rows = Vec::new();
            for row in self.index.query(&spec)? {
                match self.documents.get(&row.key)? {
                    Some(doc) => rows.push((doc, row)),
                    None => log::debug!("skipping postings of missing document {}", row.key),
                }
            }
            rows
        };

        let now = Utc::now();
        let candidates = rows
            .into_iter()
            .filter(|(doc, _)| {
                searcher::contains_phrases(&doc.document.raw_content(), parsed.phrase())
                    && filter::matches_all(&options.filters, &doc.document)
            })
            .map(|(doc, row)| {
                let mut score = row.score * doc.document.boost;
                if self.config.boost_recent {
                    score *= scoring::recency_factor(doc.indexed_at, now);
                }
                Candidate {
                    stored: doc,
                    score,
                    matched_terms: row.matched_terms,
                }
            })
            .collect();
        Ok(candidates)
    }

    fn highlight(
        &self,
        parsed: &AnalyzedQuery,
        candidate: &Candidate,
    ) -> Result<BTreeMap<String, String>> {
        let terms: Vec<&String> = parsed
            .tokens()
            .iter()
            .chain(candidate.matched_terms.iter())
            .collect();
        let highlighter = Highlighter::new(&terms, &self.config.highlight_tag)?;

        let mut highlights = BTreeMap::new();
        for field in self.indexer.fields() {
            let Some(value) = candidate.stored.document.get(&field.name) else {
                continue;
            };
            let text = value.analyzable_parts().join(" ");
            if let Some(marked) = highlighter.highlight(&text) {
                highlights.insert(field.name.clone(), marked);
            }
        }
        Ok(highlights)
    }
}

/// Deterministic cache key for a normalized query and its options.
fn cache_key(normalized: &str, options: &SearchOptions) -> Result<String> {
    let payload = serde_json::to_vec(&(normalized, options))?;
    Ok(format!(
        "{CACHE_KEY_PREFIX}:{:08x}:{}",
        crc32fast::hash(&payload),
        payload.len()
    ))
}
