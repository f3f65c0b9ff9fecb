//! Settings for sam-detect.
//!
//! Settings live in two TOML files, and workspace values shadow user values:
//!
//! | Scope | File | Purpose |
//! |-------|------|---------|
//! | User | `~/.sam-detect/config.toml` | Personal defaults |
//! | Workspace | `.sam-detect.toml` in the first workspace folder | Project overrides |
//!
//! # Recognized settings
//!
//! ```toml
//! [detect]
//! failure_policy = "continue"   # or "abort"
//! max_concurrency = 8
//!
//! [workspace]
//! folders = ["services/api", "services/worker"]
//! ```
//!
//! Access goes through the [`SettingsStore`] trait so detection callers can
//! substitute their own store (an editor's configuration, for instance).

mod settings;

pub use settings::{ConfigurationTarget, SettingsStore, TomlSettingsStore};

use std::path::PathBuf;

use crate::constants::DEFAULT_MAX_CONCURRENCY;
use crate::core::DetectError;
use crate::detect::{DetectOptions, FailurePolicy};

/// Key of the failure policy setting.
pub const FAILURE_POLICY_KEY: &str = "detect.failure_policy";
/// Key of the concurrency bound setting.
pub const MAX_CONCURRENCY_KEY: &str = "detect.max_concurrency";
/// Key of the default workspace folders setting.
pub const WORKSPACE_FOLDERS_KEY: &str = "workspace.folders";

/// Detection settings resolved from a [`SettingsStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectSettings {
    /// Failure policy, `detect.failure_policy`
    pub failure_policy: FailurePolicy,
    /// Concurrency bound, `detect.max_concurrency`
    pub max_concurrency: usize,
    /// Folders scanned when none are given explicitly, `workspace.folders`
    pub workspace_folders: Option<Vec<PathBuf>>,
}

impl Default for DetectSettings {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::default(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            workspace_folders: None,
        }
    }
}

impl DetectSettings {
    /// Resolve settings, using defaults for anything unset.
    ///
    /// # Errors
    ///
    /// Returns [`DetectError::InvalidSetting`] if a setting is set to a value
    /// of the wrong shape or an unknown failure policy.
    pub fn from_store(store: &impl SettingsStore) -> Result<Self, DetectError> {
        let defaults = Self::default();

        let failure_policy = match store.read_setting::<String>(FAILURE_POLICY_KEY)? {
            Some(raw) => raw.parse().map_err(|reason| DetectError::InvalidSetting {
                key: FAILURE_POLICY_KEY.to_string(),
                reason,
            })?,
            None => defaults.failure_policy,
        };

        Ok(Self {
            failure_policy,
            max_concurrency: store
                .read_setting(MAX_CONCURRENCY_KEY)?
                .unwrap_or(defaults.max_concurrency),
            workspace_folders: store.read_setting(WORKSPACE_FOLDERS_KEY)?,
        })
    }

    /// Detection options carrying these settings.
    pub fn detect_options(&self) -> DetectOptions {
        DetectOptions::default()
            .with_policy(self.failure_policy)
            .with_max_concurrency(self.max_concurrency)
    }
}

/// Check a value against the shape a recognized setting expects.
///
/// Unrecognized keys are accepted as-is.
///
/// # Errors
///
/// Returns [`DetectError::InvalidSetting`] describing the expected shape.
pub fn validate_setting(key: &str, value: &toml::Value) -> Result<(), DetectError> {
    let invalid = |reason: String| DetectError::InvalidSetting {
        key: key.to_string(),
        reason,
    };

    match key {
        FAILURE_POLICY_KEY => {
            let raw = value.as_str().ok_or_else(|| invalid("expected a string".to_string()))?;
            raw.parse::<FailurePolicy>().map(|_| ()).map_err(invalid)
        }
        MAX_CONCURRENCY_KEY => match value.as_integer() {
            Some(n) if n >= 1 => Ok(()),
            _ => Err(invalid("expected a positive integer".to_string())),
        },
        WORKSPACE_FOLDERS_KEY => match value.as_array() {
            Some(items) if items.iter().all(toml::Value::is_str) => Ok(()),
            _ => Err(invalid("expected an array of paths".to_string())),
        },
        _ => Ok(()),
    }
}
