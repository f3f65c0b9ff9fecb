//! sam-detect - local serverless function detection
//!
//! Scans the folders of an open workspace for an AWS SAM template
//! (`template.yml` or `template.yaml` at the folder root) and lists the
//! `AWS::Serverless::Function` resources each template declares. Every
//! function becomes a [`detect::LocalFunctionRecord`] pairing its logical name
//! with the template path that declared it.
//!
//! # Architecture Overview
//!
//! Detection is a pipeline per workspace folder:
//!
//! 1. **Locate** ([`template::locate`]) - probe `template.yml`, then
//!    `template.yaml`; at most one template per folder
//! 2. **Extract** ([`template::extract_function_names`]) - parse the YAML and
//!    keep the names of resources whose `Type` is exactly
//!    `AWS::Serverless::Function`, in document order
//! 3. **Aggregate** ([`detect::detect`]) - scan folders concurrently and
//!    re-join the records in folder order
//!
//! Nothing is cached: each call reads the file system afresh.
//!
//! # Core Modules
//!
//! - [`workspace`] - workspace folders and the [`workspace::WorkspaceSource`] capability
//! - [`template`] - template location and function extraction
//! - [`detect`] - orchestration, failure policy and the detection report
//! - [`config`] - the [`config::SettingsStore`] capability and TOML settings files
//! - [`core`] - error types and user-facing error rendering
//! - [`cli`] - the `sam-detect` command-line interface
//!
//! # Example
//!
//! ```rust,no_run
//! use sam_detect::detect::detect_local_functions;
//! use sam_detect::workspace::WorkspaceFolder;
//!
//! # async fn example() {
//! let folders = WorkspaceFolder::from_paths(["/projects/my-sam-app"]);
//! for record in detect_local_functions(Some(folders.as_slice())).await {
//!     println!("{}  {}", record.label(), record.description());
//! }
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod detect;
pub mod template;
pub mod workspace;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
