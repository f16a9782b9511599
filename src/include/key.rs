//! Cache key derivation
//!
//! A key is the canonical path with its final extension removed and every
//! separator flattened to [`KEY_DELIMITER`], so it can double as a file name
//! inside the persisted cache directory.

use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Replaces path separators in cache keys
pub const KEY_DELIMITER: char = '-';

/// Stable identifier for a resolved document
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derive the key for a canonical path built with separator `sep`.
    ///
    /// `/`, `\` and `sep` all count as separators.
    pub fn derive(path: &Path, sep: char) -> Self {
        let path = path.to_string_lossy();
        let stem = strip_extension(&path, sep);
        Self(
            stem.chars()
                .map(|c| if is_sep(c, sep) { KEY_DELIMITER } else { c })
                .collect(),
        )
    }

    /// Wrap an existing key string, e.g. a persisted record's file stem
    pub fn from_raw(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

fn is_sep(c: char, sep: char) -> bool {
    c == '/' || c == '\\' || c == sep
}

fn sep_len(path: &str, idx: usize) -> usize {
    path[idx..].chars().next().map_or(1, char::len_utf8)
}

/// Remove the extension of the last path component.
///
/// A dot that starts the component (`.htaccess`) is not an extension.
fn strip_extension(path: &str, sep: char) -> &str {
    let name_start = path
        .rfind(|c| is_sep(c, sep))
        .map_or(0, |idx| idx + sep_len(path, idx));
    match path[name_start..].rfind('.') {
        Some(0) | None => path,
        Some(dot) => &path[..name_start + dot],
    }
}
