//! Configuration schema for ssi-build
//!
//! Configuration is read from `ssi.toml` in the project (or any parent
//! directory) layered over `~/.config/ssi/config.toml`. The camelCase option
//! names used by other SSI build tools are accepted as aliases.

use crate::build::DEFAULT_DEST;
use crate::fs::Encoding;
use crate::include::{Invalidate, Options, DEFAULT_ERROR_MESSAGE};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Include resolution settings
    pub resolver: ResolverConfig,

    /// Cache settings
    pub cache: CacheConfig,

    /// Batch build settings
    pub build: BuildConfig,
}

impl Config {
    /// Resolver options derived from this configuration
    pub fn options(&self) -> Options {
        Options {
            base_dir: self.resolver.base_dir.clone(),
            cache_dir: self.cache.dir.clone(),
            file_sep: self.resolver.file_sep,
            cache: self.cache.enabled,
            ext: self.cache.ext.clone(),
            encoding: self.resolver.encoding,
            error_message: self.resolver.error_message.clone(),
        }
    }
}

/// Include resolution settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Root for virtual includes and top-level file includes
    #[serde(alias = "baseDir")]
    pub base_dir: PathBuf,

    /// Path separator used when building include paths
    #[serde(alias = "fileSep")]
    pub file_sep: char,

    /// Text encoding for reads and writes (utf8, latin1)
    pub encoding: Encoding,

    /// Text substituted for includes that cannot be resolved
    #[serde(alias = "errorMessage")]
    pub error_message: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("html"),
            file_sep: std::path::MAIN_SEPARATOR,
            encoding: Encoding::Utf8,
            error_message: DEFAULT_ERROR_MESSAGE.to_string(),
        }
    }
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Persist resolved documents across runs (default: false)
    #[serde(alias = "cache")]
    pub enabled: bool,

    /// Directory for persisted records
    #[serde(alias = "cacheDir")]
    pub dir: PathBuf,

    /// Extension of persisted records
    pub ext: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dir: PathBuf::from(".tmp/.ssiCache"),
            ext: ".html".to_string(),
        }
    }
}

/// Batch build configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Entry documents built when no sources are given on the command line
    pub sources: Vec<PathBuf>,

    /// Output directory
    pub dest: PathBuf,

    /// Invalidation before each entry document: none, entry, all
    pub invalidate: Invalidate,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            sources: vec![],
            dest: PathBuf::from(DEFAULT_DEST),
            invalidate: Invalidate::Entry,
        }
    }
}
