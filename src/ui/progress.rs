//! Build progress with CI fallback

use super::context::UiContext;
use crate::build::{FileReport, FileStatus};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Progress over the files of a batch build.
///
/// Shows an indicatif bar in interactive mode and one line per file in CI.
pub struct BuildProgress {
    bar: Option<ProgressBar>,
}

impl BuildProgress {
    pub fn new(ctx: &UiContext, total: usize) -> Self {
        let bar = if ctx.use_fancy_output() {
            let bar = ProgressBar::new(total as u64);
            let template = ProgressStyle::default_bar()
                .template("  {spinner:.cyan} Building  {bar:20.cyan/dim} {pos}/{len} {msg:.dim}  {elapsed:.dim}")
                .map(|s| s.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ").progress_chars("━╸─"));
            if let Ok(template) = template {
                bar.set_style(template);
            }
            bar.enable_steady_tick(std::time::Duration::from_millis(120));
            Some(bar)
        } else {
            None
        };
        Self { bar }
    }

    /// Record one finished file
    pub fn on_file(&self, file: &FileReport) {
        if let Some(ref bar) = self.bar {
            bar.inc(1);
            bar.set_message(file.source.display().to_string());
            if let Some(line) = problem_line(file) {
                bar.println(line);
            }
            return;
        }

        match &file.status {
            FileStatus::Written { bytes } => println!(
                "  {} {} -> {} ({} bytes)",
                style("[OK]").green(),
                file.source.display(),
                file.dest
                    .as_deref()
                    .map(|d| d.display().to_string())
                    .unwrap_or_default(),
                bytes
            ),
            _ => {
                if let Some(line) = problem_line(file) {
                    println!("{}", line);
                }
            }
        }
    }

    /// Finish and clear the progress bar.
    pub fn finish(&self) {
        if let Some(ref bar) = self.bar {
            bar.disable_steady_tick();
            bar.finish_and_clear();
        }
    }
}

fn problem_line(file: &FileReport) -> Option<String> {
    match &file.status {
        FileStatus::Written { .. } => None,
        FileStatus::Skipped { reason } => Some(format!(
            "  {} {} skipped: {}",
            style("[WARN]").yellow(),
            file.source.display(),
            reason
        )),
        FileStatus::Failed { reason } => Some(format!(
            "  {} {}: {}",
            style("[FAIL]").red(),
            file.source.display(),
            reason
        )),
    }
}
