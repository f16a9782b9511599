//! Directive scanning
//!
//! Recognizes SSI include markers of the form
//! `<!--#include file="path" -->` or `<!-- #include virtual='path' -->`.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static INCLUDE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<!--\s*#include\s+(file|virtual)=["']([^"'<>|\x08]+)['"]\s*-->"#)
        .expect("include directive pattern is valid")
});

/// How a directive's target path is addressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveKind {
    /// Relative to the including document's directory
    File,
    /// Relative to the base directory
    Virtual,
}

impl DirectiveKind {
    fn from_attr(attr: &str) -> Self {
        if attr.eq_ignore_ascii_case("file") {
            Self::File
        } else {
            Self::Virtual
        }
    }
}

impl fmt::Display for DirectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Virtual => write!(f, "virtual"),
        }
    }
}

/// One include directive found in a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub kind: DirectiveKind,
    /// Target path exactly as written between the quotes
    pub target: String,
    /// The full matched marker, used for substitution
    pub literal: String,
}

/// Extract every include directive from `text`, in order of occurrence.
///
/// Repeated identical directives appear once per occurrence.
pub fn scan(text: &str) -> Vec<Directive> {
    INCLUDE_RE
        .captures_iter(text)
        .map(|caps| Directive {
            kind: DirectiveKind::from_attr(&caps[1]),
            target: caps[2].to_string(),
            literal: caps[0].to_string(),
        })
        .collect()
}
