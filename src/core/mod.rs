//! Core types shared across sam-detect: the error taxonomy and file operation
//! context.

pub mod error;
pub mod file_error;

pub use error::{DetectError, ErrorContext, user_friendly_error};
pub use file_error::{FileOperation, FileOperationError, FileOps, FileResultExt};
