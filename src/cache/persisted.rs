//! Persisted cache tier
//!
//! Mirrors processed documents as `{cache_dir}/{key}{ext}` so a later run
//! can reuse them. Every operation reports failures as typed errors; the
//! store decides to log and ignore them.

use crate::error::{SsiError, SsiResult};
use crate::fs::FileSystem;
use crate::include::CacheKey;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Outcome of sweeping the cache directory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClearReport {
    /// Files and directories removed
    pub removed: usize,
    /// Entries that could not be removed
    pub failed: usize,
}

/// A persisted record found on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersistedRecord {
    pub key: CacheKey,
    pub path: PathBuf,
}

/// On-disk cache directory
#[derive(Clone)]
pub struct PersistedTier {
    dir: PathBuf,
    ext: String,
    fs: Arc<dyn FileSystem>,
}

impl std::fmt::Debug for PersistedTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistedTier")
            .field("dir", &self.dir)
            .field("ext", &self.ext)
            .finish_non_exhaustive()
    }
}

impl PersistedTier {
    pub fn new(dir: impl Into<PathBuf>, ext: impl Into<String>, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            dir: dir.into(),
            ext: ext.into(),
            fs,
        }
    }

    /// Cache directory root
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File path of the record for `key`
    pub fn record_path(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(format!("{}{}", key, self.ext))
    }

    /// Read a record, `None` when it does not exist
    pub fn read(&self, key: &CacheKey) -> SsiResult<Option<String>> {
        let path = self.record_path(key);
        if !self.fs.is_file(&path) {
            return Ok(None);
        }

        debug!("Reading cache record {}", path.display());
        self.fs
            .read_text(&path)
            .map(Some)
            .map_err(|e| SsiError::CacheRead {
                path,
                source: into_io(e),
            })
    }

    /// Write a record, creating the cache directory when missing
    pub fn write(&self, key: &CacheKey, content: &str) -> SsiResult<()> {
        let path = self.record_path(key);

        if !self.fs.dir_exists(&self.dir) {
            self.fs
                .create_dir_all(&self.dir)
                .map_err(|e| SsiError::CacheWrite {
                    path: self.dir.clone(),
                    source: into_io(e),
                })?;
        }

        debug!("Writing cache record {}", path.display());
        self.fs
            .write_text(&path, content)
            .map_err(|e| SsiError::CacheWrite {
                path,
                source: into_io(e),
            })
    }

    /// Delete a record; a missing record is not an error
    pub fn remove(&self, key: &CacheKey) -> SsiResult<()> {
        let path = self.record_path(key);
        if !self.fs.is_file(&path) {
            return Ok(());
        }

        debug!("Removing cache record {}", path.display());
        self.fs
            .remove_file(&path)
            .map_err(|e| SsiError::CacheDelete {
                path,
                source: into_io(e),
            })
    }

    /// List records currently in the cache directory
    pub fn list(&self) -> SsiResult<Vec<PersistedRecord>> {
        if !self.fs.dir_exists(&self.dir) {
            return Ok(Vec::new());
        }

        let records = self
            .fs
            .list_dir(&self.dir)?
            .into_iter()
            .filter(|entry| !entry.is_dir)
            .filter_map(|entry| {
                let name = entry.path.file_name()?.to_string_lossy().into_owned();
                let key = CacheKey::from_raw(name.strip_suffix(self.ext.as_str())?);
                Some(PersistedRecord {
                    key,
                    path: entry.path,
                })
            })
            .collect();

        Ok(records)
    }

    /// Recursively delete the directory's contents, keeping the directory.
    ///
    /// Failures are logged per entry and the sweep continues.
    pub fn clear(&self) -> ClearReport {
        let mut report = ClearReport::default();
        if self.fs.dir_exists(&self.dir) {
            self.sweep(&self.dir, true, &mut report);
        }
        report
    }

    fn sweep(&self, dir: &Path, keep_dir: bool, report: &mut ClearReport) {
        debug!("Sweeping cache directory {}", dir.display());

        let entries = match self.fs.list_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Could not list cache directory {}: {}", dir.display(), e);
                report.failed += 1;
                return;
            }
        };

        for entry in entries {
            if entry.is_dir {
                self.sweep(&entry.path, false, report);
                continue;
            }

            match self.fs.remove_file(&entry.path) {
                Ok(()) => report.removed += 1,
                Err(e) => {
                    warn!("Could not remove cache file {}: {}", entry.path.display(), e);
                    report.failed += 1;
                }
            }
        }

        if keep_dir {
            return;
        }

        match self.fs.remove_dir(dir) {
            Ok(()) => report.removed += 1,
            Err(e) => {
                let err = SsiError::DirectoryCleanup {
                    path: dir.to_path_buf(),
                    source: into_io(e),
                };
                warn!("{}", err);
                report.failed += 1;
            }
        }
    }
}

/// Unwrap the underlying io error of a collaborator failure
fn into_io(err: SsiError) -> std::io::Error {
    match err {
        SsiError::Io { source, .. }
        | SsiError::SourceRead { source, .. }
        | SsiError::CacheRead { source, .. }
        | SsiError::CacheWrite { source, .. }
        | SsiError::CacheDelete { source, .. }
        | SsiError::DirectoryCleanup { source, .. } => source,
        other => std::io::Error::other(other.to_string()),
    }
}
