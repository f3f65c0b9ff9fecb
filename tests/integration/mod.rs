//! Integration test suite for sam-detect
//!
//! End-to-end tests of the detection library against real temporary folders
//! and of the `sam-detect` binary.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **detect**: Library detection over workspace folders
//! - **cli_detect**: The `detect` command
//! - **cli_config**: The `config` command and settings files

mod cli_config;
mod cli_detect;
mod detect;
