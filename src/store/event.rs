//! Lifecycle notifications emitted by the engine.

use std::fmt::Debug;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::data::DocKey;

/// An index or query lifecycle event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    DocumentIndexed { key: DocKey, postings: usize },
    DocumentDeleted { key: DocKey },
    BulkIndexed { documents: usize },
    Reindexed { doc_type: String, documents: usize },
    SearchExecuted {
        query: String,
        total: usize,
        elapsed_ms: u64,
        cached: bool,
    },
}

/// Receives engine events. Emission cannot fail the calling operation.
pub trait EventSink: Send + Sync + Debug {
    fn emit(&self, event: &EngineEvent);
}

/// Writes every event to the `log` facade at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEventSink;

impl EventSink for LogEventSink {
    fn emit(&self, event: &EngineEvent) {
        log::debug!("engine event: {event:?}");
    }
}

/// Collects events in memory.
#[derive(Debug, Default)]
pub struct MemoryEventSink {
    events: Mutex<Vec<EngineEvent>>,
}

impl MemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<EngineEvent> {
        self.events.lock().clone()
    }

    /// Remove and return everything collected so far.
    pub fn take(&self) -> Vec<EngineEvent> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl EventSink for MemoryEventSink {
    fn emit(&self, event: &EngineEvent) {
        self.events.lock().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_collects() {
        let sink = MemoryEventSink::new();
        sink.emit(&EngineEvent::BulkIndexed { documents: 2 });
        sink.emit(&EngineEvent::DocumentDeleted {
            key: DocKey::new("product", "1"),
        });
        assert_eq!(sink.events().len(), 2);
        assert_eq!(sink.take().len(), 2);
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_event_serializes_with_tag() {
        let json = serde_json::to_value(EngineEvent::BulkIndexed { documents: 2 }).unwrap();
        assert_eq!(json["event"], "bulk_indexed");
        assert_eq!(json["documents"], 2);
    }
}
