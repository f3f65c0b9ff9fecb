//! Template file location within a workspace folder.

use std::path::{Path, PathBuf};

use crate::constants::TEMPLATE_FILE_NAMES;
use crate::core::{DetectError, FileOps};

/// Locate the template file in a workspace folder.
///
/// Probes [`TEMPLATE_FILE_NAMES`] in order and returns the first candidate that
/// exists as a regular file. A candidate that exists but is something else
/// (a directory named `template.yml`, for instance) is skipped.
///
/// # Returns
///
/// - `Ok(Some(path))` for the first regular-file candidate
/// - `Ok(None)` when no candidate exists
///
/// # Errors
///
/// Returns [`DetectError::FileOperation`] when a candidate cannot be checked
/// (permission denied, I/O fault). This is never folded into `Ok(None)`.
///
/// # Examples
///
/// ```rust,no_run
/// use sam_detect::template::locate;
/// use std::path::Path;
///
/// # async fn example() -> anyhow::Result<()> {
/// if let Some(template) = locate(Path::new("/projects/my-sam-app")).await? {
///     println!("Found {}", template.display());
/// }
/// # Ok(())
/// # }
/// ```
pub async fn locate(folder_root: &Path) -> Result<Option<PathBuf>, DetectError> {
    for file_name in TEMPLATE_FILE_NAMES {
        let candidate = folder_root.join(file_name);
        let metadata =
            FileOps::metadata_if_exists(&candidate, "locating template", "template::locate")
                .await?;

        match metadata {
            Some(metadata) if metadata.is_file() => {
                tracing::debug!("Found template {}", candidate.display());
                return Ok(Some(candidate));
            }
            Some(_) => {
                tracing::debug!("Skipping {}: not a regular file", candidate.display());
            }
            None => {}
        }
    }

    tracing::debug!("No template in {}", folder_root.display());
    Ok(None)
}
