//! Error types for ssi-build
//!
//! All modules use `SsiResult<T>` as their return type. Resolution errors
//! (unreadable sources, cache I/O, cyclic includes) never escape the
//! resolver; they are logged and degrade to the configured error text.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for ssi-build operations
pub type SsiResult<T> = Result<T, SsiError>;

/// All errors that can occur in ssi-build
#[derive(Error, Debug)]
pub enum SsiError {
    // Resolution errors
    #[error("Failed to read source {path}: {source}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Source file not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("Cyclic include detected for cache key {0}")]
    CyclicInclude(String),

    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("Cannot encode text as {encoding}: character {ch:?} is out of range")]
    Unencodable { encoding: String, ch: char },

    // Cache errors
    #[error("Failed to read cache record {path}: {source}")]
    CacheRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write cache record {path}: {source}")]
    CacheWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to delete cache record {path}: {source}")]
    CacheDelete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to clean up cache directory {path}: {source}")]
    DirectoryCleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Build errors
    #[error("Build finished with {failed} failed file(s)")]
    BuildFailed { failed: usize },

    #[error("No source files given")]
    NoSources,

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

impl SsiError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::ConfigNotFound(_) => Some("Run: ssi config init"),
            Self::UnsupportedEncoding(_) => Some("Supported encodings: utf8, latin1"),
            Self::NoSources => {
                Some("Pass source files as arguments or set build.sources in ssi.toml")
            }
            Self::BuildFailed { .. } => Some("Re-run with -v for details on each failure"),
            _ => None,
        }
    }
}
