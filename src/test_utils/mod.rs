//! Test utilities for sam-detect
//!
//! Helpers for writing tests: one-time logging setup and fixtures that write
//! SAM templates into temporary workspace folders.
//!
//! # Example
//!
//! ```rust,no_run
//! use sam_detect::test_utils::TemplateFixture;
//!
//! let temp = tempfile::tempdir().unwrap();
//! let path = TemplateFixture::with_functions(["MyFunction"])
//!     .write_to(temp.path(), "template.yml")
//!     .unwrap();
//! assert!(path.exists());
//! ```

pub mod fixtures;

pub use fixtures::TemplateFixture;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. Uses `level` if given, otherwise the
/// `RUST_LOG` environment variable; with neither, logging stays off.
///
/// ```bash
/// RUST_LOG=sam_detect=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
