//! CLI argument definitions using clap derive

use crate::include::Invalidate;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// ssi - Flatten server-side includes into static HTML
///
/// Replaces every `<!--#include file="..." -->` and
/// `<!--#include virtual="..." -->` directive with the resolved content of
/// the document it names.
#[derive(Parser, Debug)]
#[command(name = "ssi")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "SSI_CONFIG")]
    pub config: Option<PathBuf>,

    /// Skip local ssi.toml discovery
    #[arg(long, global = true)]
    pub no_local: bool,

    /// Log output format
    #[arg(long, global = true, default_value = "text")]
    pub log_format: LogFormat,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve includes in a group of files and write the results
    Build(BuildArgs),

    /// Resolve includes in one file (or stdin) and print the result
    Render(RenderArgs),

    /// Manage the persisted include cache
    Cache(CacheArgs),

    /// Show or initialize configuration
    Config(ConfigArgs),
}

/// Arguments for the build command
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Source files (defaults to build.sources from config)
    pub sources: Vec<PathBuf>,

    /// Output directory
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// Root directory for virtual includes
    #[arg(short, long)]
    pub base_dir: Option<PathBuf>,

    /// Persist resolved includes across runs
    #[arg(long, overrides_with = "no_cache")]
    pub cache: bool,

    /// Do not read or write the persisted cache
    #[arg(long, overrides_with = "cache")]
    pub no_cache: bool,

    /// Cache invalidation before each source: none, entry, all
    #[arg(long, value_parser = parse_invalidate)]
    pub invalidate: Option<Invalidate>,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

impl BuildArgs {
    /// Persisted cache override, `None` when neither flag was given
    pub fn cache_override(&self) -> Option<bool> {
        match (self.cache, self.no_cache) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

/// Arguments for the render command
#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// File to render, or `-` for stdin
    pub input: PathBuf,

    /// Root directory for virtual includes
    #[arg(short, long)]
    pub base_dir: Option<PathBuf>,

    /// Directory (relative to the base dir) that file includes resolve against
    #[arg(long)]
    pub context_dir: Option<PathBuf>,
}

impl RenderArgs {
    pub fn reads_stdin(&self) -> bool {
        self.input.as_os_str() == "-"
    }
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,

        /// Write a project-local ssi.toml in the current directory
        #[arg(long)]
        local: bool,
    },
}

/// Output format for listings and reports
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per event
    Json,
}

/// Arguments for the cache command
#[derive(Parser, Debug)]
pub struct CacheArgs {
    /// Subcommand for cache
    #[command(subcommand)]
    pub action: CacheAction,
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// List persisted cache records
    List {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Remove every persisted cache record
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show the cache directory
    Path,
}

fn parse_invalidate(s: &str) -> Result<Invalidate, String> {
    s.parse().map_err(|e: crate::error::SsiError| e.to_string())
}
