//! File collaborator
//!
//! The resolver and the persisted cache tier never touch `std::fs` directly.
//! They go through the [`FileSystem`] trait so that the configured text
//! encoding is applied in one place and so tests can observe source reads.

use crate::error::{SsiError, SsiResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Text codec used for every read and write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Encoding {
    /// UTF-8 (default)
    #[default]
    Utf8,
    /// ISO-8859-1, one byte per character
    Latin1,
}

impl Encoding {
    /// Decode raw bytes into text
    pub fn decode(&self, bytes: Vec<u8>, path: &Path) -> SsiResult<String> {
        match self {
            Self::Utf8 => String::from_utf8(bytes).map_err(|e| SsiError::SourceRead {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            }),
            Self::Latin1 => Ok(bytes.into_iter().map(char::from).collect()),
        }
    }

    /// Encode text into raw bytes
    pub fn encode(&self, text: &str) -> SsiResult<Vec<u8>> {
        match self {
            Self::Utf8 => Ok(text.as_bytes().to_vec()),
            Self::Latin1 => text
                .chars()
                .map(|ch| {
                    u8::try_from(u32::from(ch)).map_err(|_| SsiError::Unencodable {
                        encoding: self.to_string(),
                        ch,
                    })
                })
                .collect(),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Utf8 => "utf8",
            Self::Latin1 => "latin1",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Encoding {
    type Err = SsiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(Self::Utf8),
            "latin1" | "latin-1" | "iso-8859-1" | "binary" => Ok(Self::Latin1),
            _ => Err(SsiError::UnsupportedEncoding(s.to_string())),
        }
    }
}

impl TryFrom<String> for Encoding {
    type Error = SsiError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Encoding> for String {
    fn from(value: Encoding) -> Self {
        value.to_string()
    }
}

/// A directory listing entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub path: PathBuf,
    pub is_dir: bool,
}

/// Filesystem operations consumed by the resolver and the cache store
pub trait FileSystem: Send + Sync {
    /// Read a whole file as text
    fn read_text(&self, path: &Path) -> SsiResult<String>;

    /// Write text to a file, replacing any existing content
    fn write_text(&self, path: &Path, text: &str) -> SsiResult<()>;

    /// List the immediate children of a directory
    fn list_dir(&self, path: &Path) -> SsiResult<Vec<DirEntry>>;

    /// Delete a single file
    fn remove_file(&self, path: &Path) -> SsiResult<()>;

    /// Delete an empty directory
    fn remove_dir(&self, path: &Path) -> SsiResult<()>;

    /// Whether a directory exists at `path`
    fn dir_exists(&self, path: &Path) -> bool;

    /// Whether a regular file exists at `path`
    fn is_file(&self, path: &Path) -> bool;

    /// Create a directory and all missing parents
    fn create_dir_all(&self, path: &Path) -> SsiResult<()>;
}

/// [`FileSystem`] backed by the local disk
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs {
    encoding: Encoding,
}

impl LocalFs {
    pub fn new(encoding: Encoding) -> Self {
        Self { encoding }
    }
}

impl FileSystem for LocalFs {
    fn read_text(&self, path: &Path) -> SsiResult<String> {
        let bytes = fs::read(path).map_err(|e| SsiError::SourceRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        self.encoding.decode(bytes, path)
    }

    fn write_text(&self, path: &Path, text: &str) -> SsiResult<()> {
        let bytes = self.encoding.encode(text)?;
        fs::write(path, bytes)
            .map_err(|e| SsiError::io(format!("writing {}", path.display()), e))
    }

    fn list_dir(&self, path: &Path) -> SsiResult<Vec<DirEntry>> {
        let read_dir = fs::read_dir(path)
            .map_err(|e| SsiError::io(format!("listing {}", path.display()), e))?;

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry =
                entry.map_err(|e| SsiError::io(format!("listing {}", path.display()), e))?;
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            entries.push(DirEntry {
                path: entry.path(),
                is_dir,
            });
        }
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }

    fn remove_file(&self, path: &Path) -> SsiResult<()> {
        fs::remove_file(path)
            .map_err(|e| SsiError::io(format!("removing file {}", path.display()), e))
    }

    fn remove_dir(&self, path: &Path) -> SsiResult<()> {
        fs::remove_dir(path)
            .map_err(|e| SsiError::io(format!("removing directory {}", path.display()), e))
    }

    fn dir_exists(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn create_dir_all(&self, path: &Path) -> SsiResult<()> {
        fs::create_dir_all(path)
            .map_err(|e| SsiError::io(format!("creating directory {}", path.display()), e))
    }
}
