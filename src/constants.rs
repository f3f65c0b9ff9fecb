//! Global constants used throughout the sam-detect codebase.
//!
//! Template file names, document keys, and defaults live here so the
//! locator, extractor, and settings code agree on them.

/// Candidate template file names, in precedence order.
///
/// The first one that exists as a regular file in a workspace folder wins.
pub const TEMPLATE_FILE_NAMES: [&str; 2] = ["template.yml", "template.yaml"];

/// Top-level template key holding the resource declarations.
pub const RESOURCES_KEY: &str = "Resources";

/// Resource descriptor key holding the resource type.
pub const TYPE_KEY: &str = "Type";

/// Resource type string identifying a serverless function.
pub const FUNCTION_RESOURCE_TYPE: &str = "AWS::Serverless::Function";

/// Default number of workspace folders scanned concurrently.
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// Directory (under the home directory) holding user settings.
pub const USER_CONFIG_DIR: &str = ".sam-detect";

/// Application directory name used under the platform data directory on Windows.
pub const APP_DIR_NAME: &str = "sam-detect";

/// File name of the user settings file.
pub const USER_CONFIG_FILE: &str = "config.toml";

/// File name of the workspace settings file, placed in the first workspace folder.
pub const WORKSPACE_CONFIG_FILE: &str = ".sam-detect.toml";
