//! Read and write sam-detect settings.
//!
//! Settings are stored in the user file (`~/.sam-detect/config.toml`, or the
//! path given with `--config`) and in `.sam-detect.toml` in the current
//! directory for workspace overrides.
//!
//! # Examples
//!
//! ```bash
//! sam-detect config set detect.failure_policy abort
//! sam-detect config set detect.max_concurrency 4 --workspace
//! sam-detect config set workspace.folders '["services/api", "services/worker"]' --workspace
//! sam-detect config get detect.failure_policy
//! sam-detect config unset detect.max_concurrency --workspace
//! sam-detect config path
//! ```
//!
//! # Values
//!
//! Values are parsed as TOML (`4`, `true`, `["a", "b"]`); anything that is not
//! a TOML value is stored as a plain string, so `abort` and `"abort"` are the
//! same. Recognized keys are validated before they are written.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use std::path::Path;

use super::CliConfig;
use crate::config::{ConfigurationTarget, SettingsStore, TomlSettingsStore, validate_setting};

/// Command to read and write settings.
#[derive(Args, Debug)]
pub struct ConfigCommand {
    /// Settings operation to perform
    #[command(subcommand)]
    command: ConfigSubcommands,
}

#[derive(Subcommand, Debug)]
enum ConfigSubcommands {
    /// Print the effective value of a setting.
    ///
    /// Workspace values shadow user values. Prints nothing and exits
    /// successfully when the setting is not set.
    Get {
        /// Dotted setting key, e.g. `detect.failure_policy`
        key: String,
    },

    /// Set a setting.
    Set {
        /// Dotted setting key
        key: String,

        /// New value, parsed as TOML or taken as a plain string
        value: String,

        /// Write to the workspace file instead of the user file
        #[arg(short, long)]
        workspace: bool,
    },

    /// Remove a setting.
    Unset {
        /// Dotted setting key
        key: String,

        /// Remove from the workspace file instead of the user file
        #[arg(short, long)]
        workspace: bool,
    },

    /// Display the paths of the settings files.
    Path,
}

impl ConfigCommand {
    /// Execute the config command.
    ///
    /// # Errors
    ///
    /// Returns an error if a settings file cannot be loaded or written, or if
    /// a value does not fit a recognized setting.
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let cwd = std::env::current_dir().context("Failed to determine current directory")?;
        self.execute_in(&cwd, config).await
    }

    async fn execute_in(self, workspace_root: &Path, config: &CliConfig) -> Result<()> {
        let mut store = TomlSettingsStore::load(config.config_path.clone(), Some(workspace_root))
            .await
            .context("Failed to load settings")?;

        match self.command {
            ConfigSubcommands::Get {
                key,
            } => {
                if let Some(value) = store.read_setting::<toml::Value>(&key)? {
                    println!("{}", format_value(&value));
                }
            }
            ConfigSubcommands::Set {
                key,
                value,
                workspace,
            } => {
                let value = parse_value(&value);
                validate_setting(&key, &value)?;

                let target = target(workspace);
                store.write_setting(&key, Some(&value), target).await?;
                if !config.quiet {
                    println!("{} {key} = {}", "Set".green(), format_value(&value));
                }
            }
            ConfigSubcommands::Unset {
                key,
                workspace,
            } => {
                let target = target(workspace);
                if store.inspect(&key, target).is_none() {
                    tracing::debug!("Setting '{key}' is not set in {target:?} scope");
                }

                store.write_setting::<toml::Value>(&key, None, target).await?;
                if !config.quiet {
                    println!("{} {key}", "Unset".green());
                }
            }
            ConfigSubcommands::Path => {
                for (label, target) in
                    [("user", ConfigurationTarget::User), ("workspace", ConfigurationTarget::Workspace)]
                {
                    if let Some(path) = store.path(target) {
                        println!("{label}: {}", path.display());
                    }
                }
            }
        }

        Ok(())
    }
}

fn target(workspace: bool) -> ConfigurationTarget {
    if workspace {
        ConfigurationTarget::Workspace
    } else {
        ConfigurationTarget::User
    }
}

/// Parse a command-line value as a TOML value, falling back to a string.
fn parse_value(raw: &str) -> toml::Value {
    toml::from_str::<toml::Table>(&format!("value = {raw}"))
        .ok()
        .and_then(|mut table| table.remove("value"))
        .unwrap_or_else(|| toml::Value::String(raw.to_string()))
}

/// Strings print bare so `config get` output can be used in scripts.
fn format_value(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
