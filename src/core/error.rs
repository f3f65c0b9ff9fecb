//! Error handling for sam-detect
//!
//! The error system follows two rules:
//! 1. **Strongly-typed errors** ([`DetectError`]) inside the library, so callers
//!    can match on the failure mode of a folder scan or a settings operation.
//! 2. **User-friendly messages** ([`ErrorContext`]) at the CLI boundary, with
//!    details and an actionable suggestion.
//!
//! # Which outcomes are errors
//!
//! Scanning a workspace folder distinguishes benign outcomes from failures:
//!
//! | Outcome | Error? |
//! |---------|--------|
//! | No `template.yml`/`template.yaml` in the folder | no, zero records |
//! | Template is empty (zero bytes, whitespace or comments only) | no, zero records |
//! | Template has no usable `Resources` mapping | no, zero records |
//! | Template cannot be parsed as YAML | [`DetectError::MalformedTemplate`] |
//! | Template cannot be checked or read | [`DetectError::FileOperation`] |
//!
//! # Examples
//!
//! ```rust,no_run
//! use sam_detect::core::{DetectError, user_friendly_error};
//!
//! let error = DetectError::InvalidSetting {
//!     key: "detect.max_concurrency".to_string(),
//!     reason: "expected an integer".to_string(),
//! };
//!
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display(); // Shows colored error with suggestions
//! ```

use colored::Colorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use super::file_error::FileOperationError;

/// The main error type for sam-detect operations
#[derive(Error, Debug)]
pub enum DetectError {
    /// A template or settings file could not be checked, read, or written.
    #[error(transparent)]
    FileOperation(#[from] FileOperationError),

    /// A template file exists but is not a valid YAML document.
    #[error("Invalid template syntax in {}", .path.display())]
    MalformedTemplate {
        /// Path to the template that failed to parse
        path: PathBuf,
        /// The underlying YAML error
        #[source]
        source: serde_yaml::Error,
    },

    /// A settings file exists but is not valid TOML.
    #[error("Invalid settings file syntax in {}", .path.display())]
    SettingsParse {
        /// Path to the settings file that failed to parse
        path: PathBuf,
        /// The underlying TOML error
        #[source]
        source: toml::de::Error,
    },

    /// Settings could not be serialized back to TOML.
    #[error("Failed to serialize settings")]
    SettingsSerialize(#[from] toml::ser::Error),

    /// A setting exists but has the wrong shape for the requested type.
    #[error("Invalid value for setting '{key}': {reason}")]
    InvalidSetting {
        /// Dotted key of the setting
        key: String,
        /// Why the value was rejected
        reason: String,
    },

    /// The platform configuration directory could not be determined.
    #[error("Unable to determine the {what} directory")]
    DirectoryUnavailable {
        /// Which directory was being resolved
        what: &'static str,
    },
}

impl DetectError {
    /// Path of the file the error concerns, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            DetectError::FileOperation(e) => Some(&e.file_path),
            DetectError::MalformedTemplate {
                path,
                ..
            }
            | DetectError::SettingsParse {
                path,
                ..
            } => Some(path),
            _ => None,
        }
    }
}

/// Error with user-facing details and a suggested fix
///
/// Produced by [`user_friendly_error`] at the CLI boundary.
#[derive(Debug)]
pub struct ErrorContext {
    /// The primary error message
    pub message: String,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context from a message
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    ///
    /// - Error message: Red and bold
    /// - Details: Yellow
    /// - Suggestion: Green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.message);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] suitable for display.
///
/// [`DetectError`]s anywhere in the chain get tailored suggestions; anything
/// else is rendered with its full cause chain.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(detect_error) = error.chain().find_map(|e| e.downcast_ref::<DetectError>()) {
        return create_error_context(detect_error);
    }

    ErrorContext::new(message_with_chain(&error))
}

fn message_with_chain(error: &anyhow::Error) -> String {
    let mut message = error.to_string();
    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    message
}

fn create_error_context(error: &DetectError) -> ErrorContext {
    match error {
        DetectError::FileOperation(file_error) => {
            let ctx = ErrorContext::new(error.to_string()).with_details(file_error.user_message());
            match file_error.kind() {
                std::io::ErrorKind::PermissionDenied => ctx.with_suggestion(
                    "Check the ownership and permissions of the workspace folder and its template",
                ),
                std::io::ErrorKind::NotFound => ctx.with_suggestion(
                    "The file was removed while scanning; run the command again",
                ),
                _ => ctx,
            }
        }
        DetectError::MalformedTemplate {
            source,
            ..
        } => ErrorContext::new(error.to_string())
            .with_details(source.to_string())
            .with_suggestion(
                "Check the YAML syntax of the template: indentation, quoting, and duplicate keys",
            ),
        DetectError::SettingsParse {
            source,
            ..
        } => ErrorContext::new(error.to_string())
            .with_details(source.to_string())
            .with_suggestion("Fix the TOML syntax or remove the file to fall back to defaults"),
        DetectError::SettingsSerialize(source) => {
            ErrorContext::new(error.to_string()).with_details(source.to_string())
        }
        DetectError::InvalidSetting {
            key,
            ..
        } => ErrorContext::new(error.to_string())
            .with_suggestion(format!("Run 'sam-detect config set {key} <value>' to fix it")),
        DetectError::DirectoryUnavailable {
            ..
        } => ErrorContext::new(error.to_string())
            .with_suggestion("Pass an explicit settings file with --config"),
    }
}
