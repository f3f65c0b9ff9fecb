//! SAM template location and parsing.
//!
//! - [`locate`] finds the template file in a workspace folder
//! - [`extract_function_names`] reads a template and lists its function resources

mod extractor;
mod locator;

pub use extractor::{TemplateDocument, TemplateOutcome, extract_function_names};
pub use locator::locate;
