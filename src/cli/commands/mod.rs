//! Subcommands module for platform-cli CLI
//!
//! This module contains all the subcommand implementations.

pub mod compute;
pub mod dns;
pub mod info;
#[cfg(feature = "web")]
pub mod serve;
pub mod storage;

use crate::cli::output::OutputFormatter;
use anyhow::Result;
use platform_cli::config::Config;
use platform_cli::platform::Platform;
use std::future::Future;

/// Common context shared between commands
pub struct CommandContext {
    /// Configuration
    pub config: Config,
    /// Output formatter
    pub output: OutputFormatter,
}

impl CommandContext {
    /// Create a new command context from CLI arguments
    pub fn new(cli: &crate::cli::Cli, config: Config) -> Self {
        let output = OutputFormatter::new(!cli.no_color, cli.is_json(), cli.verbosity());

        Self { config, output }
    }

    /// Build the managers on top of the AWS SDK clients
    pub async fn platform(&self) -> Platform {
        self.output.info(&format!(
            "Region {} | CreatedBy={} | Owner={}",
            self.config.aws.region, self.config.tags.created_by, self.config.tags.owner
        ));
        Platform::connect(&self.config).await
    }

    /// Await a remote call behind a spinner
    pub async fn with_spinner<F, T>(&self, message: &str, fut: F) -> T
    where
        F: Future<Output = T>,
    {
        let spinner = self.output.spinner(message);
        let result = fut.await;
        if let Some(sp) = spinner {
            sp.finish_and_clear();
        }
        result
    }
}
