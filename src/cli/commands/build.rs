//! Build command - flatten a group of files

use crate::build::{self, BuildPlan, BuildReport, FileStatus};
use crate::cli::args::{BuildArgs, OutputFormat};
use crate::config::Config;
use crate::error::{SsiError, SsiResult};
use crate::include::Processor;
use crate::ui::{self, BuildProgress, UiContext};
use tracing::debug;

/// Execute the build command
pub async fn execute(args: BuildArgs, config: &Config) -> SsiResult<()> {
    let mut options = config.options();
    if let Some(ref dir) = args.base_dir {
        options.base_dir = dir.clone();
    }
    if let Some(enabled) = args.cache_override() {
        options.cache = enabled;
    }

    let sources = if args.sources.is_empty() {
        config.build.sources.clone()
    } else {
        args.sources.clone()
    };
    if sources.is_empty() {
        return Err(SsiError::NoSources);
    }

    let plan = BuildPlan::new(sources)
        .with_dest(args.dest.clone().unwrap_or_else(|| config.build.dest.clone()))
        .with_invalidate(args.invalidate.unwrap_or(config.build.invalidate));

    let ctx = UiContext::detect();
    let show_progress = matches!(args.format, OutputFormat::Table);

    if show_progress {
        ui::intro(&ctx, "ssi build");
        ui::key_value(&ctx, "Base dir", &options.base_dir.display().to_string());
        ui::key_value(&ctx, "Output", &plan.dest.display().to_string());
        let cache = if options.cache {
            options.cache_dir.display().to_string()
        } else {
            "disabled".to_string()
        };
        ui::key_value(&ctx, "Cache", &cache);
    }

    debug!("Invalidation mode: {}", plan.invalidate);

    let progress_ctx = ctx.clone();
    let report = tokio::task::spawn_blocking(move || {
        let mut processor = Processor::new(options);
        let progress = show_progress.then(|| BuildProgress::new(&progress_ctx, plan.sources.len()));

        let report = build::run(&mut processor, &plan, |file| {
            if let Some(ref progress) = progress {
                progress.on_file(file);
            }
        });

        if let Some(ref progress) = progress {
            progress.finish();
        }
        report
    })
    .await
    .map_err(|e| SsiError::Internal(format!("build task failed: {}", e)))??;

    match args.format {
        OutputFormat::Table => print_summary(&ctx, &report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Plain => print_plain(&report),
    }

    match report.failed() {
        0 => Ok(()),
        failed => Err(SsiError::BuildFailed { failed }),
    }
}

fn print_summary(ctx: &UiContext, report: &BuildReport) {
    let elapsed = format!("{:.2}s", report.elapsed.as_secs_f64());

    if report.skipped() == 0 && report.failed() == 0 {
        ui::outro_success(
            ctx,
            &format!("Built {} file(s) in {}", report.written(), elapsed),
        );
    } else {
        ui::outro_warn(
            ctx,
            &format!(
                "Built {} file(s), {} skipped, {} failed in {}",
                report.written(),
                report.skipped(),
                report.failed(),
                elapsed
            ),
        );
    }
}

fn print_plain(report: &BuildReport) {
    for file in &report.files {
        if let (FileStatus::Written { .. }, Some(dest)) = (&file.status, &file.dest) {
            println!("{}", dest.display());
        }
    }
}
