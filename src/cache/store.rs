//! Two-tier cache store
//!
//! The volatile tier is a map owned by one build run. The persisted tier is
//! optional and strictly best-effort: its failures are logged and never
//! change what a lookup returns within the current run.

use crate::cache::entry::{CacheEntry, EntryState};
use crate::cache::persisted::{ClearReport, PersistedTier};
use crate::include::CacheKey;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Result of a cache read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Processed content, from either tier
    Hit(String),
    /// The key is reserved by an in-progress resolution; holds the error text
    Reserved(String),
    /// Nothing cached for the key
    Miss,
}

/// Volatile map plus optional persisted directory
#[derive(Debug)]
pub struct CacheStore {
    entries: HashMap<CacheKey, CacheEntry>,
    persisted: Option<PersistedTier>,
    error_message: String,
}

impl CacheStore {
    /// Create a store; `persisted` is `None` when the persisted tier is disabled
    pub fn new(persisted: Option<PersistedTier>, error_message: impl Into<String>) -> Self {
        Self {
            entries: HashMap::new(),
            persisted,
            error_message: error_message.into(),
        }
    }

    pub fn persisted(&self) -> Option<&PersistedTier> {
        self.persisted.as_ref()
    }

    /// Insert the reservation sentinel for `key`, replacing any entry.
    ///
    /// Callers check [`get`](Self::get) first under the same `&mut` borrow,
    /// so check-then-reserve cannot interleave.
    pub fn reserve(&mut self, key: CacheKey, raw: String) {
        debug!("Reserved cache key {}", key);
        self.entries.insert(key, CacheEntry::reserved(raw));
    }

    /// Look up `key`, volatile tier first
    pub fn get(&self, key: &CacheKey) -> Lookup {
        if let Some(entry) = self.entries.get(key) {
            return if entry.state.is_usable() {
                Lookup::Hit(entry.content.clone())
            } else {
                Lookup::Reserved(self.error_message.clone())
            };
        }

        let Some(persisted) = &self.persisted else {
            return Lookup::Miss;
        };

        match persisted.read(key) {
            Ok(Some(content)) => Lookup::Hit(content),
            Ok(None) => Lookup::Miss,
            Err(e) => {
                warn!("{}", e);
                Lookup::Miss
            }
        }
    }

    /// Store final content and mark the entry processed
    pub fn put(&mut self, key: CacheKey, content: String) {
        if let Some(persisted) = &self.persisted {
            if let Err(e) = persisted.write(&key, &content) {
                warn!("{}", e);
            }
        }

        self.entries.insert(key, CacheEntry::processed(content));
    }

    /// Drop `key` from both tiers
    pub fn invalidate(&mut self, key: &CacheKey) {
        if self.entries.remove(key).is_some() {
            debug!("Removed cache data for key {}", key);
        }

        if let Some(persisted) = &self.persisted {
            if let Err(e) = persisted.remove(key) {
                warn!("{}", e);
            }
        }
    }

    /// Drop every entry and sweep the persisted directory
    pub fn invalidate_all(&mut self) -> ClearReport {
        self.entries.clear();
        debug!("Volatile cache reset");

        match &self.persisted {
            Some(persisted) => persisted.clear(),
            None => ClearReport::default(),
        }
    }

    /// Volatile state of `key`, if present
    pub fn state(&self, key: &CacheKey) -> Option<EntryState> {
        self.entries.get(key).map(|entry| entry.state)
    }

    /// Number of volatile entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
