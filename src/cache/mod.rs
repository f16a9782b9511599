//! Two-tier cache for resolved documents
//!
//! Resolved text is cached by [`CacheKey`](crate::include::CacheKey) in a
//! volatile map for the current run and, when enabled, mirrored to a
//! persisted directory that later runs can reuse.
//!
//! # Entry States
//!
//! | State | Lookup returns | Description |
//! |-------|----------------|-------------|
//! | (absent) | persisted record or miss | Never visited in this run |
//! | Unprocessed | error text | Reserved, resolution in progress |
//! | Processed | content | Final, immutable until invalidated |
//!
//! An Unprocessed entry doubles as the cycle sentinel: a document that
//! (transitively) includes itself finds its own reservation and receives the
//! error text instead of recursing.

pub mod entry;
pub mod persisted;
pub mod store;

pub use entry::{CacheEntry, EntryState};
pub use persisted::{ClearReport, PersistedRecord, PersistedTier};
pub use store::{CacheStore, Lookup};
