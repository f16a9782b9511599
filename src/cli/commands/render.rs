//! Render command - resolve one document to stdout

use crate::build::entry_context_dir;
use crate::cli::args::RenderArgs;
use crate::config::Config;
use crate::error::{SsiError, SsiResult};
use crate::include::{Invalidate, Processor};
use std::path::PathBuf;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::debug;

/// Execute the render command
pub async fn execute(args: RenderArgs, config: &Config) -> SsiResult<()> {
    let mut options = config.options();
    if let Some(ref dir) = args.base_dir {
        options.base_dir = dir.clone();
    }

    let stdin_text = if args.reads_stdin() {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .map_err(|e| SsiError::io("reading stdin", e))?;
        Some(text)
    } else {
        if !args.input.is_file() {
            return Err(SsiError::SourceNotFound(args.input.clone()));
        }
        None
    };

    let context_dir = match args.context_dir {
        Some(dir) => dir,
        None if stdin_text.is_some() => PathBuf::new(),
        None => entry_context_dir(&options.base_dir, &args.input),
    };
    debug!("Rendering with context dir '{}'", context_dir.display());

    let input = args.input;
    let output = tokio::task::spawn_blocking(move || {
        let mut processor = Processor::new(options);
        match stdin_text {
            Some(text) => processor.process_data(&text, &context_dir),
            None => processor.process_file(&input, &context_dir, Invalidate::Entry),
        }
    })
    .await
    .map_err(|e| SsiError::Internal(format!("render task failed: {}", e)))?;

    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(output.as_bytes())
        .await
        .map_err(|e| SsiError::io("writing to stdout", e))?;
    stdout
        .flush()
        .await
        .map_err(|e| SsiError::io("flushing stdout", e))?;

    Ok(())
}
