//! Typed settings access with user and workspace scopes.
//!
//! Settings are addressed by dotted keys (`detect.failure_policy`) that map
//! onto nested TOML tables. A value in the workspace scope shadows the same
//! key in the user scope.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::constants::{APP_DIR_NAME, USER_CONFIG_DIR, USER_CONFIG_FILE, WORKSPACE_CONFIG_FILE};
use crate::core::{DetectError, FileOperation, FileOperationError, FileResultExt};

/// Scope a setting is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigurationTarget {
    /// Per-user settings file
    User,
    /// Settings file in the first workspace folder
    Workspace,
}

/// Read and write typed settings.
#[allow(async_fn_in_trait)]
pub trait SettingsStore {
    /// Read a setting, `Ok(None)` when it is not set in any scope.
    ///
    /// # Errors
    ///
    /// [`DetectError::InvalidSetting`] when the stored value does not have the
    /// shape of `T`.
    fn read_setting<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, DetectError>;

    /// Read a setting, falling back to `default` when unset or invalid.
    fn read_setting_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.read_setting(key) {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(e) => {
                tracing::warn!("Ignoring setting: {e}");
                default
            }
        }
    }

    /// Write a setting to the given scope; `None` removes it.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be represented in the store or the
    /// scope cannot be persisted.
    async fn write_setting<T: Serialize>(
        &mut self,
        key: &str,
        value: Option<T>,
        target: ConfigurationTarget,
    ) -> Result<(), DetectError>;
}

/// One settings file and its loaded contents.
#[derive(Debug, Clone)]
struct SettingsScope {
    path: Option<PathBuf>,
    table: toml::Table,
}

impl SettingsScope {
    fn detached() -> Self {
        Self {
            path: None,
            table: toml::Table::new(),
        }
    }

    async fn load(path: PathBuf) -> Result<Self, DetectError> {
        let table = match fs::read_to_string(&path).await {
            Ok(content) => toml::from_str(&content).map_err(|source| DetectError::SettingsParse {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => toml::Table::new(),
            Err(e) => {
                return Err(FileOperationError::new(
                    FileOperation::Read,
                    &path,
                    "loading settings",
                    "config::SettingsScope::load",
                    e,
                )
                .into());
            }
        };

        Ok(Self {
            path: Some(path),
            table,
        })
    }

    async fn save(&self, restrict_permissions: bool) -> Result<(), DetectError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.with_file_context(
                FileOperation::CreateDir,
                parent,
                "creating settings directory",
                "config::SettingsScope::save",
            )?;
        }

        let content = toml::to_string_pretty(&self.table)?;
        fs::write(path, content).await.with_file_context(
            FileOperation::Write,
            path,
            "writing settings",
            "config::SettingsScope::save",
        )?;

        // Owner read/write only on the user file
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            if restrict_permissions {
                fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
                    .await
                    .with_file_context(
                        FileOperation::Write,
                        path,
                        "restricting settings permissions",
                        "config::SettingsScope::save",
                    )?;
            }
        }
        #[cfg(not(unix))]
        let _ = restrict_permissions;

        Ok(())
    }
}

/// A [`SettingsStore`] backed by TOML files.
///
/// - User scope: `~/.sam-detect/config.toml` (`%LOCALAPPDATA%\sam-detect\config.toml`
///   on Windows) unless an explicit path is given
/// - Workspace scope: `.sam-detect.toml` in the first workspace folder
///
/// Missing files are treated as empty scopes and created on first write.
///
/// # Examples
///
/// ```rust,no_run
/// use sam_detect::config::{ConfigurationTarget, SettingsStore, TomlSettingsStore};
/// use std::path::Path;
///
/// # async fn example() -> anyhow::Result<()> {
/// let mut store = TomlSettingsStore::load(None, Some(Path::new("/projects/api"))).await?;
/// let concurrency: usize = store.read_setting_or("detect.max_concurrency", 8);
///
/// store
///     .write_setting("detect.failure_policy", Some("abort"), ConfigurationTarget::Workspace)
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TomlSettingsStore {
    user: SettingsScope,
    workspace: SettingsScope,
}

impl TomlSettingsStore {
    /// Load both scopes.
    ///
    /// `user_path` overrides the default user settings file. Without a
    /// `workspace_root` the workspace scope is empty and writes to it are
    /// kept in memory only.
    ///
    /// # Errors
    ///
    /// Returns an error if a settings file exists but cannot be read or
    /// parsed, or if the default user settings location cannot be determined.
    pub async fn load(
        user_path: Option<PathBuf>,
        workspace_root: Option<&Path>,
    ) -> Result<Self, DetectError> {
        Self::load_scopes(user_path, workspace_root, false).await
    }

    /// Load both scopes, tolerating an unreadable workspace settings file.
    ///
    /// A workspace file that exists but cannot be read is logged and treated
    /// as an empty scope, so a broken workspace folder does not prevent the
    /// other folders from being scanned. Invalid TOML is still an error.
    ///
    /// # Errors
    ///
    /// Same as [`TomlSettingsStore::load`], except for read failures of the
    /// workspace file.
    pub async fn load_lenient(
        user_path: Option<PathBuf>,
        workspace_root: Option<&Path>,
    ) -> Result<Self, DetectError> {
        Self::load_scopes(user_path, workspace_root, true).await
    }

    async fn load_scopes(
        user_path: Option<PathBuf>,
        workspace_root: Option<&Path>,
        lenient: bool,
    ) -> Result<Self, DetectError> {
        let user_path = match user_path {
            Some(path) => path,
            None => Self::default_user_path()?,
        };

        let workspace = match workspace_root {
            Some(root) => match SettingsScope::load(root.join(WORKSPACE_CONFIG_FILE)).await {
                Ok(scope) => scope,
                Err(DetectError::FileOperation(e)) if lenient => {
                    tracing::warn!("Ignoring workspace settings: {}", e.user_message());
                    SettingsScope::detached()
                }
                Err(e) => return Err(e),
            },
            None => SettingsScope::detached(),
        };

        Ok(Self {
            user: SettingsScope::load(user_path).await?,
            workspace,
        })
    }

    /// An in-memory store with empty scopes that is never persisted.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            user: SettingsScope::detached(),
            workspace: SettingsScope::detached(),
        }
    }

    /// Default location of the user settings file.
    ///
    /// # Errors
    ///
    /// Returns [`DetectError::DirectoryUnavailable`] when the home (or, on
    /// Windows, local data) directory cannot be determined.
    pub fn default_user_path() -> Result<PathBuf, DetectError> {
        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or(DetectError::DirectoryUnavailable {
                    what: "local data",
                })?
                .join(APP_DIR_NAME)
        } else {
            dirs::home_dir()
                .ok_or(DetectError::DirectoryUnavailable {
                    what: "home",
                })?
                .join(USER_CONFIG_DIR)
        };

        Ok(config_dir.join(USER_CONFIG_FILE))
    }

    /// Path of the file backing a scope, if it is persisted.
    pub fn path(&self, target: ConfigurationTarget) -> Option<&Path> {
        self.scope(target).path.as_deref()
    }

    /// Raw value of a setting in a single scope.
    pub fn inspect(&self, key: &str, target: ConfigurationTarget) -> Option<&toml::Value> {
        lookup(&self.scope(target).table, key)
    }

    fn scope(&self, target: ConfigurationTarget) -> &SettingsScope {
        match target {
            ConfigurationTarget::User => &self.user,
            ConfigurationTarget::Workspace => &self.workspace,
        }
    }

    fn scope_mut(&mut self, target: ConfigurationTarget) -> &mut SettingsScope {
        match target {
            ConfigurationTarget::User => &mut self.user,
            ConfigurationTarget::Workspace => &mut self.workspace,
        }
    }
}

impl SettingsStore for TomlSettingsStore {
    fn read_setting<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, DetectError> {
        let Some(value) = self
            .inspect(key, ConfigurationTarget::Workspace)
            .or_else(|| self.inspect(key, ConfigurationTarget::User))
        else {
            return Ok(None);
        };

        value.clone().try_into::<T>().map(Some).map_err(|e: toml::de::Error| {
            DetectError::InvalidSetting {
                key: key.to_string(),
                reason: e.message().to_string(),
            }
        })
    }

    async fn write_setting<T: Serialize>(
        &mut self,
        key: &str,
        value: Option<T>,
        target: ConfigurationTarget,
    ) -> Result<(), DetectError> {
        let value = value
            .map(|v| {
                toml::Value::try_from(v).map_err(|e| DetectError::InvalidSetting {
                    key: key.to_string(),
                    reason: e.to_string(),
                })
            })
            .transpose()?;

        let scope = self.scope_mut(target);
        match value {
            Some(value) => insert(&mut scope.table, key, value)?,
            None => {
                remove(&mut scope.table, key);
            }
        }

        tracing::debug!("Updated setting '{key}' in {target:?} scope");
        scope.save(target == ConfigurationTarget::User).await
    }
}

fn lookup<'a>(table: &'a toml::Table, key: &str) -> Option<&'a toml::Value> {
    let mut segments = key.split('.');
    let mut current = table.get(segments.next()?)?;
    for segment in segments {
        current = current.as_table()?.get(segment)?;
    }
    Some(current)
}

fn insert(table: &mut toml::Table, key: &str, value: toml::Value) -> Result<(), DetectError> {
    let (parents, leaf) = match key.rsplit_once('.') {
        Some((parents, leaf)) => (Some(parents), leaf),
        None => (None, key),
    };

    let mut current = table;
    for segment in parents.into_iter().flat_map(|p| p.split('.')) {
        let entry = current
            .entry(segment.to_string())
            .or_insert_with(|| toml::Value::Table(toml::Table::new()));
        current = entry.as_table_mut().ok_or_else(|| DetectError::InvalidSetting {
            key: key.to_string(),
            reason: format!("'{segment}' is not a table"),
        })?;
    }

    current.insert(leaf.to_string(), value);
    Ok(())
}

fn remove(table: &mut toml::Table, key: &str) -> Option<toml::Value> {
    match key.split_once('.') {
        Some((head, rest)) => {
            let child = table.get_mut(head)?.as_table_mut()?;
            let removed = remove(child, rest);
            if child.is_empty() {
                table.remove(head);
            }
            removed
        }
        None => table.remove(key),
    }
}
