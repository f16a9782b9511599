//! Recursive include resolver
//!
//! [`Processor`] owns the cache store for one build run. Each document moves
//! through `Unseen -> Reserved -> Resolved`, and back to `Unseen` when it is
//! invalidated. Every failure below the top-level call is soft: it is logged
//! and the configured error text is substituted at the directive site.

use crate::cache::{CacheStore, Lookup, PersistedTier};
use crate::error::SsiError;
use crate::fs::{FileSystem, LocalFs};
use crate::include::directive::scan;
use crate::include::key::CacheKey;
use crate::include::path::{child_context_dir, resolve};
use crate::include::{Invalidate, Options};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Include resolver with its cache
pub struct Processor {
    options: Options,
    fs: Arc<dyn FileSystem>,
    store: CacheStore,
}

impl Processor {
    /// Create a processor reading from the local disk
    pub fn new(options: Options) -> Self {
        let fs = Arc::new(LocalFs::new(options.encoding));
        Self::with_fs(options, fs)
    }

    /// Create a processor over a custom file collaborator
    pub fn with_fs(options: Options, fs: Arc<dyn FileSystem>) -> Self {
        let persisted = options.cache.then(|| {
            PersistedTier::new(options.cache_dir.clone(), options.ext.clone(), Arc::clone(&fs))
        });
        let store = CacheStore::new(persisted, options.error_message.clone());

        Self { options, fs, store }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Change the root used for `virtual` includes and top-level `file` includes
    pub fn set_base_dir(&mut self, dir: impl Into<PathBuf>) {
        self.options.base_dir = dir.into();
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    /// Resolve the document at `path`.
    ///
    /// `context_dir` is the document's directory relative to the base
    /// directory; `file` includes inside it resolve against it. Never fails:
    /// an unreadable document yields the configured error text.
    pub fn process_file(&mut self, path: &Path, context_dir: &Path, invalidate: Invalidate) -> String {
        debug!("Processing file {}", path.display());
        let key = CacheKey::derive(path, self.options.file_sep);

        match invalidate {
            Invalidate::All => {
                info!("Clearing the entire cache");
                let report = self.store.invalidate_all();
                debug!(
                    "Cache sweep removed {} entries ({} failed)",
                    report.removed, report.failed
                );
            }
            Invalidate::Entry => {
                debug!("Clearing the cache for {}", key);
                self.store.invalidate(&key);
            }
            Invalidate::None => {}
        }

        match self.store.get(&key) {
            Lookup::Hit(content) => {
                debug!("Cache hit for {}", key);
                return content;
            }
            Lookup::Reserved(error_text) => {
                warn!("{} ({})", SsiError::CyclicInclude(key.to_string()), path.display());
                return error_text;
            }
            Lookup::Miss => {}
        }

        let raw = match self.fs.read_text(path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("{}", e);
                return self.options.error_message.clone();
            }
        };

        self.store.reserve(key.clone(), raw.clone());

        let text = self.process_data(&raw, context_dir);
        self.store.put(key, text.clone());
        text
    }

    /// Resolve every directive in `text`.
    ///
    /// Each distinct directive literal is resolved once and all of its
    /// occurrences are replaced with that result.
    pub fn process_data(&mut self, text: &str, context_dir: &Path) -> String {
        let directives = scan(text);
        if directives.is_empty() {
            return text.to_string();
        }

        let sep = self.options.file_sep;
        let mut html = text.to_string();
        let mut substituted: HashSet<String> = HashSet::new();

        for directive in directives {
            if !substituted.insert(directive.literal.clone()) {
                continue;
            }

            let target = resolve(&directive, &self.options.base_dir, context_dir, sep);
            let child_dir = child_context_dir(&directive, context_dir, sep);
            debug!(
                "Including {} {} as {}",
                directive.kind,
                directive.target,
                target.display()
            );

            let data = self.process_file(&target, &child_dir, Invalidate::None);
            html = html.replace(&directive.literal, &data);
        }

        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::EntryState;
    use crate::error::SsiResult;
    use crate::fs::DirEntry;
    use std::collections::HashMap;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    const ERR: &str = "[There was an error processing this include]";

    /// Local disk with a per-path read counter
    #[derive(Default)]
    struct CountingFs {
        inner: LocalFs,
        reads: Mutex<HashMap<PathBuf, usize>>,
    }

    impl CountingFs {
        fn reads_of(&self, path: &Path) -> usize {
            self.reads.lock().unwrap().get(path).copied().unwrap_or(0)
        }

        fn total_reads(&self) -> usize {
            self.reads.lock().unwrap().values().sum()
        }
    }

    impl FileSystem for CountingFs {
        fn read_text(&self, path: &Path) -> SsiResult<String> {
            *self.reads.lock().unwrap().entry(path.to_path_buf()).or_insert(0) += 1;
            self.inner.read_text(path)
        }
        fn write_text(&self, path: &Path, text: &str) -> SsiResult<()> {
            self.inner.write_text(path, text)
        }
        fn list_dir(&self, path: &Path) -> SsiResult<Vec<DirEntry>> {
            self.inner.list_dir(path)
        }
        fn remove_file(&self, path: &Path) -> SsiResult<()> {
            self.inner.remove_file(path)
        }
        fn remove_dir(&self, path: &Path) -> SsiResult<()> {
            self.inner.remove_dir(path)
        }
        fn dir_exists(&self, path: &Path) -> bool {
            self.inner.dir_exists(path)
        }
        fn is_file(&self, path: &Path) -> bool {
            self.inner.is_file(path)
        }
        fn create_dir_all(&self, path: &Path) -> SsiResult<()> {
            self.inner.create_dir_all(path)
        }
    }

    struct Site {
        temp: TempDir,
    }

    impl Site {
        fn new() -> Self {
            Self {
                temp: TempDir::new().unwrap(),
            }
        }

        fn root(&self) -> PathBuf {
            self.temp.path().join("html")
        }

        fn cache_dir(&self) -> PathBuf {
            self.temp.path().join(".cache")
        }

        fn write(&self, rel: &str, content: &str) -> PathBuf {
            let path = self.root().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, content).unwrap();
            path
        }

        fn options(&self, cache: bool) -> Options {
            Options {
                base_dir: self.root(),
                cache_dir: self.cache_dir(),
                file_sep: '/',
                cache,
                ..Options::default()
            }
        }

        fn processor(&self, cache: bool) -> Processor {
            Processor::new(self.options(cache))
        }
    }

    #[test]
    fn text_without_directives_is_unchanged() {
        let site = Site::new();
        let mut processor = site.processor(false);
        let text = "<html><!-- a comment --><p>hi</p></html>";
        assert_eq!(processor.process_data(text, Path::new("")), text);
        assert!(processor.store().is_empty());
    }

    #[test]
    fn literal_example_preserves_surrounding_text() {
        let site = Site::new();
        site.write("h.html", "Hi");
        let input = site.write("input.html", "<p><!--#include file=\"h.html\" --></p>\n");

        let mut processor = site.processor(false);
        let out = processor.process_file(&input, Path::new(""), Invalidate::None);

        assert_eq!(out, "<p>Hi</p>\n");
    }

    #[test]
    fn bare_directive_resolves_to_content() {
        let site = Site::new();
        site.write("h.html", "Hi");
        let input = site.write("input.html", "<!--#include file=\"h.html\" -->");

        let mut processor = site.processor(true);
        assert_eq!(
            processor.process_file(&input, Path::new(""), Invalidate::None),
            "Hi"
        );
    }

    #[test]
    fn virtual_from_nested_partial_resolves_at_root() {
        let site = Site::new();
        site.write("nav.html", "ROOT-NAV");
        site.write("partials/nav.html", "PARTIAL-NAV");
        site.write("partials/header.html", "<header><!--#include virtual=\"nav.html\" --></header>");
        let index = site.write("index.html", "<!--#include file=\"partials/header.html\" -->");

        let mut processor = site.processor(false);
        let out = processor.process_file(&index, Path::new(""), Invalidate::None);

        assert_eq!(out, "<header>ROOT-NAV</header>");
    }

    #[test]
    fn file_from_nested_partial_resolves_beside_it() {
        let site = Site::new();
        site.write("nav.html", "ROOT-NAV");
        site.write("partials/nav.html", "PARTIAL-NAV");
        site.write("partials/header.html", "<header><!--#include file=\"nav.html\" --></header>");
        let index = site.write("index.html", "<!--#include file=\"partials/header.html\" -->");

        let mut processor = site.processor(false);
        let out = processor.process_file(&index, Path::new(""), Invalidate::None);

        assert_eq!(out, "<header>PARTIAL-NAV</header>");
    }

    #[test]
    fn file_inside_virtual_target_uses_joined_context() {
        let site = Site::new();
        site.write("shared/x.html", "ROOT-CONTEXT");
        site.write("partials/shared/x.html", "JOINED-CONTEXT");
        site.write("shared/nav.html", "<!--#include file=\"x.html\" -->");
        site.write("partials/header.html", "<!--#include virtual=\"shared/nav.html\" -->");
        let index = site.write("index.html", "<!--#include file=\"partials/header.html\" -->");

        let mut processor = site.processor(false);
        let out = processor.process_file(&index, Path::new(""), Invalidate::None);

        assert_eq!(out, "JOINED-CONTEXT");
    }

    #[test]
    fn nested_relative_paths_compose_across_depth() {
        let site = Site::new();
        site.write("a/b/leaf.html", "LEAF");
        site.write("a/b/mid.html", "[<!--#include file=\"leaf.html\" -->]");
        site.write("a/top.html", "(<!--#include file=\"b/mid.html\" -->)");
        let index = site.write("index.html", "<!--#include file=\"a/top.html\" -->");

        let mut processor = site.processor(false);
        let out = processor.process_file(&index, Path::new(""), Invalidate::None);

        assert_eq!(out, "([LEAF])");
    }

    #[test]
    fn cycle_terminates_with_error_text() {
        let site = Site::new();
        let a = site.write("a.html", "A(<!--#include file=\"b.html\" -->)");
        site.write("b.html", "B(<!--#include file=\"a.html\" -->)");

        let mut processor = site.processor(false);
        let out = processor.process_file(&a, Path::new(""), Invalidate::None);

        assert_eq!(out, format!("A(B({}))", ERR));
        assert_eq!(
            processor.store().state(&CacheKey::derive(&a, '/')),
            Some(EntryState::Processed)
        );
    }

    #[test]
    fn self_include_terminates() {
        let site = Site::new();
        let a = site.write("a.html", "x<!--#include file=\"a.html\" -->y");

        let mut processor = site.processor(false);
        let out = processor.process_file(&a, Path::new(""), Invalidate::None);

        assert_eq!(out, format!("x{}y", ERR));
    }

    #[test]
    fn missing_include_degrades_to_error_text() {
        let site = Site::new();
        let index = site.write("index.html", "<p><!--#include file=\"missing.html\" --></p>");

        let mut processor = site.processor(false);
        let out = processor.process_file(&index, Path::new(""), Invalidate::None);

        assert_eq!(out, format!("<p>{}</p>", ERR));
    }

    #[test]
    fn missing_top_level_file_returns_error_text() {
        let site = Site::new();
        let mut processor = site.processor(false);
        let out = processor.process_file(&site.root().join("nope.html"), Path::new(""), Invalidate::None);
        assert_eq!(out, ERR);
        assert!(processor.store().is_empty());
    }

    #[test]
    fn custom_error_message_is_used() {
        let site = Site::new();
        let index = site.write("index.html", "<!--#include virtual=\"missing.html\" -->");

        let mut options = site.options(false);
        options.error_message = "<!-- include failed -->".to_string();
        let mut processor = Processor::new(options);

        assert_eq!(
            processor.process_file(&index, Path::new(""), Invalidate::None),
            "<!-- include failed -->"
        );
    }

    #[test]
    fn identical_directives_are_all_replaced() {
        let site = Site::new();
        site.write("sep.html", "--");
        let index = site.write(
            "index.html",
            "a<!--#include file=\"sep.html\" -->b<!--#include file=\"sep.html\" -->c",
        );

        let fs = Arc::new(CountingFs::default());
        let mut processor = Processor::with_fs(site.options(false), fs.clone());
        let out = processor.process_file(&index, Path::new(""), Invalidate::None);

        assert_eq!(out, "a--b--c");
        assert_eq!(fs.reads_of(&site.root().join("sep.html")), 1);
    }

    #[test]
    fn second_call_performs_no_source_reads() {
        let site = Site::new();
        site.write("partials/header.html", "<h1><!--#include file=\"title.html\" --></h1>");
        site.write("partials/title.html", "Title");
        let index = site.write("index.html", "<!--#include file=\"partials/header.html\" -->body");

        let fs = Arc::new(CountingFs::default());
        let mut processor = Processor::with_fs(site.options(true), fs.clone());

        let first = processor.process_file(&index, Path::new(""), Invalidate::None);
        let reads_after_first = fs.total_reads();
        let second = processor.process_file(&index, Path::new(""), Invalidate::None);

        assert_eq!(first, "<h1>Title</h1>body");
        assert_eq!(first, second);
        assert_eq!(reads_after_first, 3);
        assert_eq!(fs.total_reads(), reads_after_first);
    }

    #[test]
    fn persisted_records_are_reused_by_a_new_processor() {
        let site = Site::new();
        site.write("h.html", "Hi");
        let index = site.write("index.html", "<!--#include file=\"h.html\" -->");

        let mut first = site.processor(true);
        assert_eq!(first.process_file(&index, Path::new(""), Invalidate::None), "Hi");

        // Source changes are not seen until the key is invalidated
        site.write("h.html", "Hello");
        let mut second = site.processor(true);
        assert_eq!(second.process_file(&index, Path::new(""), Invalidate::None), "Hi");
        assert_eq!(second.process_file(&index, Path::new(""), Invalidate::All), "Hello");
    }

    #[test]
    fn unwritable_cache_dir_does_not_affect_output() {
        let site = Site::new();
        site.write("h.html", "Hi");
        let index = site.write("index.html", "[<!--#include file=\"h.html\" -->]");
        fs::write(site.cache_dir(), "not a directory").unwrap();

        let mut processor = site.processor(true);
        let out = processor.process_file(&index, Path::new(""), Invalidate::None);

        assert_eq!(out, "[Hi]");
        assert_eq!(
            processor.store().state(&CacheKey::derive(&index, '/')),
            Some(EntryState::Processed)
        );
    }

    #[test]
    fn entry_invalidation_rerenders_only_that_file() {
        let site = Site::new();
        site.write("h.html", "Hi");
        let index = site.write("index.html", "[<!--#include file=\"h.html\" -->]");

        let mut processor = site.processor(true);
        assert_eq!(processor.process_file(&index, Path::new(""), Invalidate::None), "[Hi]");

        site.write("index.html", "{<!--#include file=\"h.html\" -->}");
        site.write("h.html", "Hello");

        // The page is re-read, the fragment comes from cache
        assert_eq!(processor.process_file(&index, Path::new(""), Invalidate::Entry), "{Hi}");
    }

    #[test]
    fn disabled_persisted_tier_still_detects_cycles() {
        let site = Site::new();
        let a = site.write("a.html", "<!--#include file=\"a.html\" -->");

        let mut processor = site.processor(false);
        assert_eq!(processor.process_file(&a, Path::new(""), Invalidate::None), ERR);
        assert!(!site.cache_dir().exists());
    }

    #[test]
    fn set_base_dir_changes_virtual_root() {
        let site = Site::new();
        site.write("other/nav.html", "OTHER");

        let mut processor = site.processor(false);
        processor.set_base_dir(site.root().join("other"));

        let out = processor.process_data("<!--#include virtual=\"nav.html\" -->", Path::new(""));
        assert_eq!(out, "OTHER");
    }
}
