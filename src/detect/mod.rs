//! Detection of local serverless functions across workspace folders.
//!
//! For each workspace folder the template is located, its function resources
//! are extracted, and every function name becomes one [`LocalFunctionRecord`]
//! paired with the template path that declared it.
//!
//! # Ordering
//!
//! Folders are scanned concurrently (bounded by
//! [`DetectOptions::max_concurrency`]) but results are re-joined in input
//! order: records are always in folder order, then document order within a
//! template. Nothing is merged or de-duplicated across folders.
//!
//! # Failure policy
//!
//! A folder whose template is malformed or cannot be read is a folder-scoped
//! failure. Under [`FailurePolicy::Continue`] (the default) the failure is
//! recorded in [`DetectionReport::failures`] for the caller to report, and
//! the remaining folders still contribute records. Under
//! [`FailurePolicy::Abort`] the first failing folder in input order is
//! returned as an error.
//!
//! # Examples
//!
//! ```rust,no_run
//! use sam_detect::detect::{DetectOptions, detect};
//! use sam_detect::workspace::WorkspaceFolder;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let folders = WorkspaceFolder::from_paths(["/projects/api", "/projects/worker"]);
//! let report = detect(Some(folders.as_slice()), &DetectOptions::default()).await?;
//!
//! for record in &report.records {
//!     println!("{}  {}", record.label(), record.description());
//! }
//! for failure in &report.failures {
//!     eprintln!("skipped {}: {}", failure.folder.name, failure.error);
//! }
//! # Ok(())
//! # }
//! ```

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::constants::DEFAULT_MAX_CONCURRENCY;
use crate::core::DetectError;
use crate::template::{TemplateOutcome, extract_function_names, locate};
use crate::workspace::{WorkspaceFolder, WorkspaceSource};

/// A function resource declared in a local template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalFunctionRecord {
    /// Logical name of the function resource
    pub name: String,
    /// Path of the template that declared it
    pub template_path: PathBuf,
}

impl LocalFunctionRecord {
    /// Primary text shown when picking a function.
    pub fn label(&self) -> &str {
        &self.name
    }

    /// Secondary text shown when picking a function.
    pub fn description(&self) -> String {
        self.template_path.display().to_string()
    }
}

/// How folder-scoped failures affect a detection sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Record the failure and keep scanning the remaining folders
    #[default]
    Continue,
    /// Stop with the first failing folder
    Abort,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "continue" => Ok(Self::Continue),
            "abort" => Ok(Self::Abort),
            other => Err(format!("unknown failure policy '{other}' (expected 'continue' or 'abort')")),
        }
    }
}

/// Category of a folder-scoped failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The template is not a valid YAML document
    MalformedDocument,
    /// The template could not be checked or read
    AccessFailure,
}

/// A workspace folder that could not be scanned.
#[derive(Debug)]
pub struct FolderFailure {
    /// The folder that failed
    pub folder: WorkspaceFolder,
    /// Why it failed
    pub error: DetectError,
}

impl FolderFailure {
    /// Category of the failure.
    pub fn kind(&self) -> FailureKind {
        match self.error {
            DetectError::MalformedTemplate {
                ..
            } => FailureKind::MalformedDocument,
            _ => FailureKind::AccessFailure,
        }
    }
}

/// Options controlling a detection sweep.
#[derive(Debug, Clone, Copy)]
pub struct DetectOptions {
    /// What to do when a folder fails
    pub policy: FailurePolicy,
    /// Maximum number of folders scanned at once; 0 is treated as 1
    pub max_concurrency: usize,
}

impl Default for DetectOptions {
    fn default() -> Self {
        Self {
            policy: FailurePolicy::default(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

impl DetectOptions {
    /// Set the failure policy.
    #[must_use]
    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the concurrency bound.
    #[must_use]
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }
}

/// Result of a detection sweep.
#[derive(Debug, Default)]
pub struct DetectionReport {
    /// Detected functions in folder order, then document order
    pub records: Vec<LocalFunctionRecord>,
    /// Folders that failed, in folder order
    pub failures: Vec<FolderFailure>,
    /// Number of folders scanned
    pub folders_scanned: usize,
}

impl DetectionReport {
    /// True when no folder failed.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// True when at least one folder was scanned and every one of them failed.
    pub fn all_failed(&self) -> bool {
        self.folders_scanned > 0 && self.failures.len() == self.folders_scanned
    }
}

/// Detect local functions in the given workspace folders.
///
/// `None` (no workspace open) and an empty slice both produce an empty report.
///
/// # Errors
///
/// Only under [`FailurePolicy::Abort`]: the error of the first failing folder
/// in input order.
pub async fn detect(
    folders: Option<&[WorkspaceFolder]>,
    options: &DetectOptions,
) -> Result<DetectionReport, DetectError> {
    let folders = folders.unwrap_or_default();
    let mut report = DetectionReport {
        folders_scanned: folders.len(),
        ..DetectionReport::default()
    };

    if folders.is_empty() {
        tracing::debug!("No workspace folders to scan");
        return Ok(report);
    }

    let results: Vec<_> = stream::iter(folders)
        .map(|folder| async move { (folder, detect_in_folder(folder.root()).await) })
        .buffered(options.max_concurrency.max(1))
        .collect()
        .await;

    for (folder, result) in results {
        match result {
            Ok(records) => report.records.extend(records),
            Err(error) if options.policy == FailurePolicy::Abort => return Err(error),
            Err(error) => {
                tracing::debug!("Skipping workspace folder '{}': {}", folder.name, error);
                report.failures.push(FolderFailure {
                    folder: folder.clone(),
                    error,
                });
            }
        }
    }

    tracing::debug!(
        "Detected {} function(s) in {} folder(s), {} failed",
        report.records.len(),
        report.folders_scanned,
        report.failures.len()
    );

    Ok(report)
}

/// Detect local functions with default options, skipping failed folders.
///
/// Failed folders are logged as warnings since the report is discarded.
pub async fn detect_local_functions(
    folders: Option<&[WorkspaceFolder]>,
) -> Vec<LocalFunctionRecord> {
    match detect(folders, &DetectOptions::default()).await {
        Ok(report) => {
            for failure in &report.failures {
                tracing::warn!(
                    "Skipping workspace folder '{}': {}",
                    failure.folder.name,
                    failure.error
                );
            }
            report.records
        }
        // Unreachable with the default Continue policy
        Err(_) => Vec::new(),
    }
}

/// Detect local functions in the folders supplied by a [`WorkspaceSource`].
///
/// # Errors
///
/// Same as [`detect`].
pub async fn detect_from_source(
    source: &impl WorkspaceSource,
    options: &DetectOptions,
) -> Result<DetectionReport, DetectError> {
    let folders = source.workspace_folders();
    detect(folders.as_deref(), options).await
}

async fn detect_in_folder(root: &Path) -> Result<Vec<LocalFunctionRecord>, DetectError> {
    let Some(template_path) = locate(root).await? else {
        tracing::debug!("{}: {:?}", root.display(), TemplateOutcome::NotFound);
        return Ok(Vec::new());
    };

    let names = extract_function_names(&template_path).await?;
    Ok(names
        .into_iter()
        .map(|name| LocalFunctionRecord {
            name,
            template_path: template_path.clone(),
        })
        .collect())
}
