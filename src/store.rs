//! External collaborators of the engine.
//!
//! The engine owns no persistent state itself. Everything it reads or
//! writes goes through one of the traits below, each shipped with an
//! in-memory implementation:
//!
//! | Collaborator | Trait | In-memory implementation |
//! |---|---|---|
//! | Document store | [`DocumentStore`] | [`MemoryDocumentStore`] |
//! | Inverted index | [`InvertedIndex`] | [`MemoryInvertedIndex`] |
//! | Term statistics | [`TermStatistics`] | [`MemoryTermStatistics`] |
//! | Query log | [`QueryLog`] | [`MemoryQueryLog`] |
//! | Cache | [`Cache`] | [`MemoryCache`], [`DisabledCache`] |
//! | Event sink | [`EventSink`] | [`LogEventSink`], [`MemoryEventSink`] |

pub mod cache;
pub mod document;
pub mod event;
pub mod posting;
pub mod query_log;
pub mod stats;

pub use cache::{Cache, DisabledCache, MemoryCache};
pub use document::{DocumentStore, MemoryDocumentStore, StoredDocument};
pub use event::{EngineEvent, EventSink, LogEventSink, MemoryEventSink};
pub use posting::{CandidateSpec, InvertedIndex, MemoryInvertedIndex, ScoredRow};
pub use query_log::{MemoryQueryLog, QueryLog, QueryLogEntry};
pub use stats::{MemoryTermStatistics, TermStatistics};
