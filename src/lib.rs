//! ssi-build - Server-side include flattening
//!
//! Resolves `<!--#include file="..." -->` and `<!--#include virtual="..." -->`
//! directives into static documents, memoizing resolved includes in a
//! volatile map and an optional on-disk cache.

pub mod build;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod fs;
pub mod include;
pub mod ui;

pub use error::{SsiError, SsiResult};
pub use include::{Invalidate, Options, Processor};
