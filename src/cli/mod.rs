//! Command-line interface for sam-detect.
//!
//! # Available Commands
//!
//! - `detect` - List the serverless functions declared in workspace templates
//! - `config` - Read and write settings
//!
//! # Global Options
//!
//! - `--verbose` - Enable debug output
//! - `--quiet` - Suppress everything except errors
//! - `--config` - Path to a custom user settings file
//!
//! # Example
//!
//! ```bash
//! # Scan the current directory
//! sam-detect detect
//!
//! # Scan two folders and emit JSON
//! sam-detect detect services/api services/worker --format json
//!
//! # Stop on the first broken template
//! sam-detect config set detect.failure_policy abort
//! ```

mod config;
mod detect;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Runtime configuration derived from the global flags.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log filter directive; `None` keeps `RUST_LOG` or the default
    pub log_level: Option<String>,
    /// Custom path to the user settings file
    pub config_path: Option<PathBuf>,
    /// Suppress informational output
    pub quiet: bool,
}

impl CliConfig {
    /// Install the global tracing subscriber.
    ///
    /// `RUST_LOG` is used when no verbosity flag was given. Logs go to stderr
    /// so command output on stdout stays machine readable.
    pub fn init_logging(&self) {
        let filter = match &self.log_level {
            Some(level) => EnvFilter::new(level),
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Detect serverless functions declared in SAM templates.
#[derive(Parser)]
#[command(
    name = "sam-detect",
    about = "Detect serverless functions declared in workspace SAM templates",
    version,
    long_about = "sam-detect scans workspace folders for template.yml/template.yaml and lists \
                  the AWS::Serverless::Function resources they declare."
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output (debug logs).
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to a custom user settings file.
    ///
    /// Overrides the default location (`~/.sam-detect/config.toml`).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the serverless functions declared in workspace templates.
    Detect(detect::DetectCommand),

    /// Read and write sam-detect settings.
    Config(config::ConfigCommand),
}

impl Cli {
    /// Execute the CLI with configuration built from its flags.
    ///
    /// # Errors
    ///
    /// Returns the error of the failing command.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    /// Build a [`CliConfig`] from the parsed CLI arguments.
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("sam_detect=debug".to_string())
        } else if self.quiet {
            Some("error".to_string())
        } else {
            None
        };

        CliConfig {
            log_level,
            config_path: self.config.clone(),
            quiet: self.quiet,
        }
    }

    /// Execute the CLI with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns the error of the failing command.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.init_logging();

        match self.command {
            Commands::Detect(cmd) => cmd.execute(&config).await,
            Commands::Config(cmd) => cmd.execute(&config).await,
        }
    }
}
