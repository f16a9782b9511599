//! Include resolution
//!
//! Flattens `<!--#include file="..." -->` and `<!--#include virtual="..." -->`
//! directives by recursively substituting each one with the resolved content
//! of the document it names.
//!
//! # Pipeline
//!
//! | Step | Module | Description |
//! |------|--------|-------------|
//! | scan | [`directive`] | Find directive occurrences in raw text |
//! | resolve | [`path`] | Compute the canonical target path |
//! | key | [`key`] | Map the canonical path to a cache key |
//! | recurse | [`resolver`] | Read, reserve, substitute and store |
//!
//! # Addressing
//!
//! - `file` targets are relative to the including document's directory
//! - `virtual` targets are relative to the configured base directory

pub mod directive;
pub mod key;
pub mod path;
pub mod resolver;

pub use directive::{scan, Directive, DirectiveKind};
pub use key::CacheKey;
pub use path::{child_context_dir, normalize, resolve};
pub use resolver::Processor;

use crate::error::SsiError;
use crate::fs::Encoding;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Substitute text used for every resolution failure
pub const DEFAULT_ERROR_MESSAGE: &str = "[There was an error processing this include]";

/// Resolver settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Root for `virtual` targets and the parent of `file` targets
    pub base_dir: PathBuf,

    /// Directory holding persisted cache records
    pub cache_dir: PathBuf,

    /// Separator used when building and normalizing paths
    pub file_sep: char,

    /// Enable the persisted cache tier
    pub cache: bool,

    /// Extension appended to persisted cache record names
    pub ext: String,

    /// Codec for source reads and cache writes
    pub encoding: Encoding,

    /// Literal text substituted for any failed include
    pub error_message: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            base_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            cache_dir: PathBuf::from(".tmp/html"),
            file_sep: std::path::MAIN_SEPARATOR,
            cache: true,
            ext: ".html".to_string(),
            encoding: Encoding::Utf8,
            error_message: DEFAULT_ERROR_MESSAGE.to_string(),
        }
    }
}

/// Cache invalidation requested before processing a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Invalidate {
    /// Reuse whatever is cached
    #[default]
    None,
    /// Drop the cached entry for the processed file only
    Entry,
    /// Drop every cached entry and sweep the persisted directory
    All,
}

impl fmt::Display for Invalidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Entry => "entry",
            Self::All => "all",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Invalidate {
    type Err = SsiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" | "false" => Ok(Self::None),
            "entry" | "true" => Ok(Self::Entry),
            "all" => Ok(Self::All),
            _ => Err(SsiError::User(format!(
                "Invalid invalidate mode '{}': expected none, entry or all",
                s
            ))),
        }
    }
}
