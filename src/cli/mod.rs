//! CLI module for platform-cli
//!
//! This module provides the command-line interface, including argument
//! parsing and subcommand handling.

pub mod commands;
pub mod completions;
pub mod output;
pub mod prompt;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// platform-cli - governed self-service for EC2, Route53 and S3
///
/// Every resource created is tagged `CreatedBy`/`Owner`; only resources
/// carrying this tool's tags can be listed, changed or removed.
#[derive(Parser, Debug, Clone)]
#[command(name = "platform-cli")]
#[command(author = "platform-cli contributors")]
#[command(version)]
#[command(about = "Governed self-service for EC2, Route53 and S3", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short = 'v', long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub output: OutputFormat,

    /// Path to configuration file
    #[arg(short = 'c', long, global = true, env = "PLATFORM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output with colors
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Show the caller identity and tag configuration
    Info(commands::info::InfoArgs),

    /// Manage EC2 instances
    #[command(subcommand)]
    Compute(commands::compute::ComputeCommand),

    /// Manage Route53 zones and records
    #[command(subcommand)]
    Dns(commands::dns::DnsCommand),

    /// Manage S3 buckets
    #[command(subcommand)]
    Storage(commands::storage::StorageCommand),

    /// Serve the web form
    #[cfg(feature = "web")]
    Serve(commands::serve::ServeArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for completions command
#[derive(Parser, Debug, Clone)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,

    /// Print installation instructions instead of the script
    #[arg(long)]
    pub instructions: bool,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Get the effective verbosity level (0-3)
    pub fn verbosity(&self) -> u8 {
        self.verbose.min(3)
    }

    /// Check if JSON output is requested
    pub fn is_json(&self) -> bool {
        matches!(self.output, OutputFormat::Json)
    }
}
