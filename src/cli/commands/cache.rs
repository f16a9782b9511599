//! Cache command - inspect and clear the persisted include cache

use crate::cache::{PersistedRecord, PersistedTier};
use crate::cli::args::{CacheAction, CacheArgs, OutputFormat};
use crate::config::Config;
use crate::error::SsiResult;
use crate::fs::LocalFs;
use crate::ui::{self, UiContext};
use console::style;
use std::sync::Arc;
use tracing::debug;

/// Execute the cache command
pub async fn execute(args: CacheArgs, config: &Config) -> SsiResult<()> {
    let options = config.options();
    let tier = PersistedTier::new(
        options.cache_dir,
        options.ext,
        Arc::new(LocalFs::new(options.encoding)),
    );

    match args.action {
        CacheAction::List { format } => list_records(&tier, format),
        CacheAction::Clear { yes } => clear_records(&tier, yes).await,
        CacheAction::Path => {
            println!("{}", tier.dir().display());
            Ok(())
        }
    }
}

/// List persisted records
fn list_records(tier: &PersistedTier, format: OutputFormat) -> SsiResult<()> {
    let records = tier.list()?;

    match format {
        OutputFormat::Table => print_record_table(tier, &records),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&records)?),
        OutputFormat::Plain => {
            for record in &records {
                println!("{}", record.key);
            }
        }
    }

    Ok(())
}

fn print_record_table(tier: &PersistedTier, records: &[PersistedRecord]) {
    if records.is_empty() {
        let ctx = UiContext::detect();
        ui::step_info(
            &ctx,
            &format!("No cache records in {}", tier.dir().display()),
        );
        return;
    }

    println!("{:<50} {}", style("KEY").bold(), style("FILE").bold());
    println!("{}", "-".repeat(80));

    for record in records {
        println!("{:<50} {}", record.key, record.path.display());
    }

    println!();
    println!("Total: {} record(s)", records.len());
}

/// Remove every persisted record
async fn clear_records(tier: &PersistedTier, yes: bool) -> SsiResult<()> {
    let ctx = UiContext::detect().with_auto_yes(yes);
    let records = tier.list()?;

    if records.is_empty() {
        ui::step_info(&ctx, "No cache records to clear.");
        return Ok(());
    }

    let prompt = format!(
        "Remove {} cache record(s) from {}?",
        records.len(),
        tier.dir().display()
    );
    if !ui::confirm(&ctx, &prompt, false).await? {
        ui::step_info(&ctx, "Aborted.");
        return Ok(());
    }

    debug!("Clearing cache directory {}", tier.dir().display());
    let report = tier.clear();

    if report.failed == 0 {
        ui::step_ok(&ctx, &format!("Cleared {} cache entries", report.removed));
    } else {
        ui::step_warn_hint(
            &ctx,
            &format!(
                "Cleared {} cache entries, {} could not be removed",
                report.removed, report.failed
            ),
            "Re-run with -v for details",
        );
    }

    Ok(())
}
