//! ssi - Server-side include flattener
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use ssi_build::cli::{Cli, Commands, LogFormat};
use ssi_build::config::ConfigManager;
use ssi_build::error::{SsiError, SsiResult};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> SsiResult<()> {
    let cli = Cli::parse();

    // 0 = warn, 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("ssi_build=warn"),
        1 => EnvFilter::new("ssi_build=info"),
        _ => EnvFilter::new("ssi_build=debug"),
    };

    // stdout carries rendered documents, so logs go to stderr
    match cli.log_format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }

    let config_manager = if let Some(ref path) = cli.config {
        ConfigManager::with_path(path.clone())
    } else {
        ConfigManager::new()
    };

    let local_config_path = if cli.no_local {
        debug!("Local config discovery disabled (--no-local)");
        None
    } else {
        let cwd = std::env::current_dir()
            .map_err(|e| SsiError::io("getting current directory", e))?;
        let found = ConfigManager::find_local_config(&cwd);
        if let Some(ref path) = found {
            debug!("Found local config: {}", path.display());
        }
        found
    };

    let config = config_manager
        .load_merged(local_config_path.as_deref())
        .await?;

    match cli.command {
        Commands::Build(args) => ssi_build::cli::commands::build(args, &config).await,
        Commands::Render(args) => ssi_build::cli::commands::render(args, &config).await,
        Commands::Cache(args) => ssi_build::cli::commands::cache(args, &config).await,
        Commands::Config(args) => {
            ssi_build::cli::commands::config(args, &config, &config_manager).await
        }
    }
}
