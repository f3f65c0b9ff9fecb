//! The `detect` command.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;
use std::path::{Path, PathBuf};

use super::CliConfig;
use crate::config::{DetectSettings, TomlSettingsStore};
use crate::core::DetectError;
use crate::detect::{DetectionReport, FailurePolicy, detect_from_source};
use crate::workspace::StaticWorkspace;

/// Output format of the `detect` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One line per function: name and template path
    #[default]
    Text,
    /// A JSON array of `{name, templatePath}` records
    Json,
}

/// List the serverless functions declared in workspace templates.
///
/// Folders are taken from the arguments, else from the `workspace.folders`
/// setting, else the current directory is scanned.
#[derive(Args, Debug)]
pub struct DetectCommand {
    /// Workspace folders to scan, in order.
    folders: Vec<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Stop at the first folder whose template is broken or unreadable.
    #[arg(long)]
    fail_fast: bool,

    /// Maximum number of folders scanned concurrently.
    #[arg(short = 'j', long)]
    max_concurrency: Option<usize>,
}

impl DetectCommand {
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let cwd = std::env::current_dir().context("Failed to determine current directory")?;
        let settings_root = self.folders.first().map_or_else(|| cwd.clone(), |f| cwd.join(f));

        let store = TomlSettingsStore::load_lenient(
            config.config_path.clone(),
            Some(settings_root.as_path()),
        )
        .await
        .context("Failed to load settings")?;
        let settings = DetectSettings::from_store(&store)?;

        let workspace = self.workspace(&cwd, &settings);
        let mut options = settings.detect_options();
        if self.fail_fast {
            options = options.with_policy(FailurePolicy::Abort);
        }
        if let Some(max_concurrency) = self.max_concurrency {
            options = options.with_max_concurrency(max_concurrency);
        }

        let report = detect_from_source(&workspace, &options).await?;
        self.print_report(&report, config.quiet)
    }

    fn workspace(&self, cwd: &Path, settings: &DetectSettings) -> StaticWorkspace {
        if !self.folders.is_empty() {
            return StaticWorkspace::from_paths(cwd, &self.folders);
        }

        match &settings.workspace_folders {
            Some(folders) => StaticWorkspace::from_paths(cwd, folders),
            None => StaticWorkspace::from_paths(cwd, [cwd]),
        }
    }

    fn print_report(&self, report: &DetectionReport, quiet: bool) -> Result<()> {
        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&report.records)?);
            }
            OutputFormat::Text => {
                for record in &report.records {
                    println!("{}  {}", record.label().bold(), record.description().dimmed());
                }
                if report.records.is_empty() && !quiet {
                    eprintln!("No local functions found");
                }
            }
        }

        for failure in &report.failures {
            eprintln!(
                "{}: skipped folder '{}': {}",
                "warning".yellow().bold(),
                failure.folder.name,
                describe(&failure.error)
            );
        }

        if report.all_failed() {
            eprintln!(
                "{}: no functions detected; every workspace folder failed to scan",
                "warning".yellow().bold()
            );
        }

        Ok(())
    }
}

fn describe(error: &DetectError) -> String {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        message.push_str(&format!(": {cause}"));
        source = cause.source();
    }
    message
}
