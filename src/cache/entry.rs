//! Volatile cache entries

use serde::{Deserialize, Serialize};
use std::fmt;

/// Processing state of a cached document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryState {
    /// Reserved: the document is being resolved right now
    Unprocessed,
    /// Fully resolved, content is final
    Processed,
}

impl EntryState {
    /// Whether the entry's content may be handed out
    pub fn is_usable(&self) -> bool {
        matches!(self, Self::Processed)
    }
}

impl fmt::Display for EntryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unprocessed => write!(f, "unprocessed"),
            Self::Processed => write!(f, "processed"),
        }
    }
}

/// A document held in the volatile tier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Raw source while unprocessed, resolved text once processed
    pub content: String,
    pub state: EntryState,
}

impl CacheEntry {
    /// Reservation sentinel holding the raw source
    pub fn reserved(raw: String) -> Self {
        Self {
            content: raw,
            state: EntryState::Unprocessed,
        }
    }

    /// Final resolved content
    pub fn processed(content: String) -> Self {
        Self {
            content,
            state: EntryState::Processed,
        }
    }
}
