//! Batch build over a file group
//!
//! Resolves each source file with a shared [`Processor`] and writes the
//! flattened result under a destination directory, mirroring the source's
//! position relative to the base directory.

use crate::error::{SsiError, SsiResult};
use crate::fs::Encoding;
use crate::include::{Invalidate, Processor};
use serde::Serialize;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Default output directory
pub const DEFAULT_DEST: &str = "output";

/// What to build and where
#[derive(Debug, Clone)]
pub struct BuildPlan {
    /// Entry documents, processed in order
    pub sources: Vec<PathBuf>,

    /// Output root
    pub dest: PathBuf,

    /// Invalidation applied before each entry document
    pub invalidate: Invalidate,
}

impl BuildPlan {
    pub fn new(sources: Vec<PathBuf>) -> Self {
        Self {
            sources,
            dest: PathBuf::from(DEFAULT_DEST),
            invalidate: Invalidate::Entry,
        }
    }

    pub fn with_dest(mut self, dest: impl Into<PathBuf>) -> Self {
        self.dest = dest.into();
        self
    }

    pub fn with_invalidate(mut self, invalidate: Invalidate) -> Self {
        self.invalidate = invalidate;
        self
    }
}

/// Outcome for one source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FileStatus {
    /// Output written
    Written { bytes: usize },
    /// Source was not a readable file
    Skipped { reason: String },
    /// Output could not be written
    Failed { reason: String },
}

/// Per-file build record
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub source: PathBuf,
    pub dest: Option<PathBuf>,
    #[serde(flatten)]
    pub status: FileStatus,
}

/// Aggregate build result
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildReport {
    pub files: Vec<FileReport>,
    #[serde(skip)]
    pub elapsed: Duration,
}

impl BuildReport {
    pub fn written(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Written { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&FileStatus) -> bool) -> usize {
        self.files.iter().filter(|f| pred(&f.status)).count()
    }
}

/// Directory of `source` relative to `base_dir`, empty when outside it
pub fn entry_context_dir(base_dir: &Path, source: &Path) -> PathBuf {
    source
        .strip_prefix(base_dir)
        .ok()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_default()
}

/// Output path for `source` under `dest`
pub fn dest_path(dest: &Path, base_dir: &Path, source: &Path) -> PathBuf {
    match source.strip_prefix(base_dir) {
        Ok(rel) => dest.join(rel),
        Err(_) => {
            let rel: PathBuf = source
                .components()
                .filter(|c| matches!(c, Component::Normal(_)))
                .collect();
            dest.join(rel)
        }
    }
}

/// Build every source in `plan`, calling `on_file` after each one.
///
/// Missing sources are skipped and write failures are recorded; neither
/// aborts the batch.
pub fn run(
    processor: &mut Processor,
    plan: &BuildPlan,
    mut on_file: impl FnMut(&FileReport),
) -> SsiResult<BuildReport> {
    let started = Instant::now();
    let base_dir = processor.options().base_dir.clone();
    let encoding = processor.options().encoding;
    let mut report = BuildReport::default();

    info!(
        "Building {} file(s) from {} into {}",
        plan.sources.len(),
        base_dir.display(),
        plan.dest.display()
    );

    for source in &plan.sources {
        let file = if !source.is_file() {
            warn!("Source file \"{}\" not found", source.display());
            FileReport {
                source: source.clone(),
                dest: None,
                status: FileStatus::Skipped {
                    reason: "not found or not a file".to_string(),
                },
            }
        } else {
            let context_dir = entry_context_dir(&base_dir, source);
            let dest = dest_path(&plan.dest, &base_dir, source);
            debug!("Creating file {} from {}", dest.display(), source.display());

            let data = processor.process_file(source, &context_dir, plan.invalidate);
            let status = match write_output(&dest, &data, encoding) {
                Ok(bytes) => FileStatus::Written { bytes },
                Err(e) => {
                    warn!("{}", e);
                    FileStatus::Failed {
                        reason: e.to_string(),
                    }
                }
            };

            FileReport {
                source: source.clone(),
                dest: Some(dest),
                status,
            }
        };

        on_file(&file);
        report.files.push(file);
    }

    report.elapsed = started.elapsed();
    Ok(report)
}

fn write_output(dest: &Path, data: &str, encoding: Encoding) -> SsiResult<usize> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            SsiError::io(format!("creating directory {}", parent.display()), e)
        })?;
    }

    let bytes = encoding.encode(data)?;
    fs::write(dest, &bytes)
        .map_err(|e| SsiError::io(format!("writing {}", dest.display()), e))?;
    Ok(bytes.len())
}
