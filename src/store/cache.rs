//! Key-value cache collaborator used to memoize search results.

use std::fmt::Debug;
use std::time::{Duration, Instant};

use ahash::AHashMap;
use parking_lot::RwLock;

use crate::error::Result;

/// Byte-oriented cache with per-entry time to live.
///
/// Failures are tolerated by the engine: a failing `get` is treated as a
/// miss and a failing `set` is ignored after a warning.
pub trait Cache: Send + Sync + Debug {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `value` for `ttl_seconds`. A zero TTL stores nothing.
    fn set(&self, key: &str, value: Vec<u8>, ttl_seconds: u64) -> Result<()>;
}

#[derive(Debug)]
struct CacheEntry {
    value: Vec<u8>,
    expires_at: Instant,
}

/// In-memory cache. Expired entries are dropped lazily on access.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<AHashMap<String, CacheEntry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

impl Cache for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let now = Instant::now();
        {
            let entries = self.entries.read();
            match entries.get(key) {
                None => return Ok(None),
                Some(entry) if entry.expires_at > now => return Ok(Some(entry.value.clone())),
                Some(_) => {}
            }
        }
        self.entries.write().remove(key);
        Ok(None)
    }

    fn set(&self, key: &str, value: Vec<u8>, ttl_seconds: u64) -> Result<()> {
        if ttl_seconds == 0 {
            return Ok(());
        }
        let expires_at = Instant::now() + Duration::from_secs(ttl_seconds);
        self.entries
            .write()
            .insert(key.to_string(), CacheEntry { value, expires_at });
        Ok(())
    }
}

/// A cache that never stores anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledCache;

impl Cache for DisabledCache {
    fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: Vec<u8>, _ttl_seconds: u64) -> Result<()> {
        Ok(())
    }
}
