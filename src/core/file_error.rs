//! Structured file system error handling for sam-detect
//!
//! File operations capture their context (what was being done, to which path,
//! and by whom) at the call site instead of leaving callers to parse
//! [`std::io::Error`] messages after the fact.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Types of file operations performed while scanning a workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOperation {
    /// Reading a file completely
    Read,
    /// Writing a file
    Write,
    /// Checking if a file exists
    Exists,
    /// Creating a directory
    CreateDir,
}

impl std::fmt::Display for FileOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileOperation::Read => write!(f, "reading"),
            FileOperation::Write => write!(f, "writing"),
            FileOperation::Exists => write!(f, "checking if file exists"),
            FileOperation::CreateDir => write!(f, "creating directory"),
        }
    }
}

/// File operation error with the context it happened in
#[derive(Error, Debug)]
#[error("File operation failed: {operation} {}", .file_path.display())]
pub struct FileOperationError {
    /// The type of operation that failed
    pub operation: FileOperation,
    /// The file path that was being accessed
    pub file_path: PathBuf,
    /// Why the file was being accessed
    pub purpose: String,
    /// What code initiated the operation
    pub caller: String,
    /// The underlying IO error
    #[source]
    pub source: std::io::Error,
}

impl FileOperationError {
    /// Create a new file operation error
    pub fn new(
        operation: FileOperation,
        file_path: impl Into<PathBuf>,
        purpose: impl Into<String>,
        caller: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Self {
            operation,
            file_path: file_path.into(),
            purpose: purpose.into(),
            caller: caller.into(),
            source,
        }
    }

    /// The kind of the underlying IO error.
    pub fn kind(&self) -> std::io::ErrorKind {
        self.source.kind()
    }

    /// Get a user-friendly error message with context
    pub fn user_message(&self) -> String {
        let mut message = format!(
            "Failed {} '{}' for {} ({})",
            self.operation,
            self.file_path.display(),
            self.purpose,
            self.caller
        );

        match self.source.kind() {
            std::io::ErrorKind::NotFound => {
                message.push_str("\n\nThe file disappeared or does not exist at the specified path.");
            }
            std::io::ErrorKind::PermissionDenied => {
                message.push_str(&format!(
                    "\n\nPermission denied. Check file/directory permissions for: {}",
                    self.file_path.display()
                ));
            }
            _ => {
                message.push_str(&format!("\n\nError details: {}", self.source));
            }
        }

        message
    }
}

/// Extension trait for Result types to add file operation context
pub trait FileResultExt<T> {
    /// Add file operation context to a Result
    fn with_file_context(
        self,
        operation: FileOperation,
        file_path: impl Into<PathBuf>,
        purpose: impl Into<String>,
        caller: impl Into<String>,
    ) -> Result<T, FileOperationError>;
}

impl<T> FileResultExt<T> for Result<T, std::io::Error> {
    fn with_file_context(
        self,
        operation: FileOperation,
        file_path: impl Into<PathBuf>,
        purpose: impl Into<String>,
        caller: impl Into<String>,
    ) -> Result<T, FileOperationError> {
        self.map_err(|io_error| {
            FileOperationError::new(operation, file_path, purpose, caller, io_error)
        })
    }
}

/// Convenience functions for common file operations with context
pub struct FileOps;

impl FileOps {
    /// Read a file's raw bytes with full context
    pub async fn read_bytes_with_context(
        path: &Path,
        purpose: &str,
        caller: &str,
    ) -> Result<Vec<u8>, FileOperationError> {
        tokio::fs::read(path).await.with_file_context(FileOperation::Read, path, purpose, caller)
    }

    /// Get file metadata, mapping `NotFound` to `None`.
    ///
    /// Any other failure (permissions, I/O faults) is returned as an error so
    /// callers can tell "does not exist" apart from "cannot be checked".
    pub async fn metadata_if_exists(
        path: &Path,
        purpose: &str,
        caller: &str,
    ) -> Result<Option<std::fs::Metadata>, FileOperationError> {
        match tokio::fs::metadata(path).await {
            Ok(metadata) => Ok(Some(metadata)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(FileOperationError::new(FileOperation::Exists, path, purpose, caller, e)),
        }
    }
}
