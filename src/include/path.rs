//! Target path resolution
//!
//! Paths are assembled as strings with the configured separator and then
//! normalized, so `/`, `\` and the configured separator are all accepted in
//! directive targets regardless of platform.

use crate::include::directive::{Directive, DirectiveKind};
use std::path::{Path, PathBuf};

fn is_sep(c: char, sep: char) -> bool {
    c == '/' || c == '\\' || c == sep
}

/// Collapse `.` and `..` segments and redundant separators.
///
/// A leading separator is preserved, `..` cannot climb above an absolute
/// root, and leading `..` segments of a relative path are kept. An empty
/// result is `.`.
pub fn normalize(path: &str, sep: char) -> String {
    let absolute = path.starts_with(|c| is_sep(c, sep));
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split(|c| is_sep(c, sep)) {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if absolute => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let joined = segments.join(&sep.to_string());
    match (absolute, joined.is_empty()) {
        (true, _) => format!("{}{}", sep, joined),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

fn is_empty_dir(dir: &Path) -> bool {
    let s = dir.to_string_lossy();
    s.is_empty() || s == "."
}

/// Compute the canonical path a directive refers to.
///
/// `file` targets are joined under `base_dir/current_dir`, `virtual` targets
/// directly under `base_dir`. With an empty `current_dir` both kinds resolve
/// identically.
pub fn resolve(directive: &Directive, base_dir: &Path, current_dir: &Path, sep: char) -> PathBuf {
    let mut full = base_dir.to_string_lossy().into_owned();

    if directive.kind == DirectiveKind::File && !is_empty_dir(current_dir) {
        full.push(sep);
        full.push_str(&current_dir.to_string_lossy());
    }

    full.push(sep);
    full.push_str(&directive.target);

    PathBuf::from(normalize(&full, sep))
}

/// Directory (relative to `base_dir`) the included document is processed in:
/// `current_dir` joined with the directory part of the target, for both kinds.
pub fn child_context_dir(directive: &Directive, current_dir: &Path, sep: char) -> PathBuf {
    let target_dir = match directive.target.rfind(|c| is_sep(c, sep)) {
        Some(idx) => &directive.target[..idx],
        None => "",
    };

    let joined = if is_empty_dir(current_dir) {
        target_dir.to_string()
    } else {
        format!("{}{}{}", current_dir.to_string_lossy(), sep, target_dir)
    };

    let normalized = normalize(&joined, sep);
    if normalized == "." {
        PathBuf::new()
    } else {
        PathBuf::from(normalized)
    }
}
