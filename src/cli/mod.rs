//! CLI interface using clap
//!
//! Provides the command-line interface for helpdocs

mod commands;

pub use commands::*;

use clap::{Parser, Subcommand};

/// helpdocs - SharpMUSH helpfile indexer and converter
#[derive(Parser, Debug)]
#[command(name = "helpdocs")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the documentation site project (defaults to current directory)
    #[arg(short, long, global = true, default_value = ".", env = "HELPDOCS_PROJECT")]
    pub path: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json)
    #[arg(short = 'o', long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Index helpfile headings into the lookup artifact
    Index,

    /// Convert helpfiles into site pages
    Convert(ConvertArgs),

    /// Index, then convert
    Build(ConvertArgs),

    /// Show where topics would link to
    Resolve(ResolveArgs),

    /// Watch the helpfiles and rebuild on change
    Watch(WatchArgs),

    /// Show or write configuration
    Config(ConfigArgs),
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Arguments for convert and build commands
#[derive(Parser, Debug)]
pub struct ConvertArgs {
    /// Report pages that would change instead of writing them
    #[arg(long)]
    pub check: bool,
}

/// Arguments for resolve command
#[derive(Parser, Debug)]
pub struct ResolveArgs {
    /// Topics to resolve, e.g. "@set" or "nearby()"
    #[arg(required = true)]
    pub topics: Vec<String>,
}

/// Arguments for watch command
#[derive(Parser, Debug)]
pub struct WatchArgs {
    /// Debounce interval in milliseconds
    #[arg(short, long, default_value = "1000")]
    pub debounce: u64,
}

/// Arguments for config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Show current configuration
    #[arg(long)]
    pub show: bool,

    /// Write the effective configuration to helpdocs.toml
    #[arg(long)]
    pub init: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
