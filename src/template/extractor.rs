//! Function resource extraction from SAM templates.
//!
//! A template is parsed into a generic [`serde_yaml::Value`] rather than a
//! typed schema: only the `Resources` mapping and each resource's `Type` are
//! interpreted, everything else (intrinsic functions such as `!Sub`, outputs,
//! parameters) is carried along untouched.

use serde::{Deserialize, de};
use serde_yaml::{Mapping, Value};
use std::path::Path;

use crate::constants::{FUNCTION_RESOURCE_TYPE, RESOURCES_KEY, TYPE_KEY};
use crate::core::{DetectError, FileOps};

/// What a parsed template turned out to contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateOutcome {
    /// Neither candidate file exists in the folder
    NotFound,
    /// Zero bytes, or only whitespace and comments
    EmptyContent,
    /// No `Resources` key, or it is not a mapping
    MissingResourcesSection,
    /// A `Resources` mapping with this many function resources
    Functions(usize),
}

/// A deserialized template document.
#[derive(Debug, Clone)]
pub struct TemplateDocument {
    root: Value,
}

impl TemplateDocument {
    /// Parse template content.
    ///
    /// Returns `Ok(None)` for empty content: zero bytes, a stream without
    /// documents (whitespace and comments only), or a null document.
    ///
    /// # Errors
    ///
    /// Returns the YAML error for syntactically invalid content, including
    /// invalid UTF-8 and duplicate mapping keys. A stream with more than one
    /// document is rejected, after any syntax error in the extra document.
    pub fn parse(content: &[u8]) -> Result<Option<Self>, serde_yaml::Error> {
        if content.is_empty() {
            return Ok(None);
        }

        let mut documents = serde_yaml::Deserializer::from_slice(content);
        let Some(document) = documents.next() else {
            return Ok(None);
        };
        let root = Value::deserialize(document)?;

        if let Some(extra) = documents.next() {
            Value::deserialize(extra)?;
            return Err(de::Error::custom("template must contain a single YAML document"));
        }

        if root.is_null() {
            return Ok(None);
        }

        Ok(Some(Self {
            root,
        }))
    }

    /// The `Resources` mapping, if present and a mapping.
    pub fn resources(&self) -> Option<&Mapping> {
        self.root.get(RESOURCES_KEY).and_then(Value::as_mapping)
    }

    /// Names of function resources, in document order.
    ///
    /// Scalar names (`123`, `true`) are reported in their string form.
    /// Entries without a `Type`, with a non-function type, or with a null or
    /// collection name are skipped.
    pub fn function_names(&self) -> Vec<String> {
        let Some(resources) = self.resources() else {
            return Vec::new();
        };

        resources
            .iter()
            .filter(|(_, descriptor)| {
                descriptor.get(TYPE_KEY).and_then(Value::as_str) == Some(FUNCTION_RESOURCE_TYPE)
            })
            .filter_map(|(name, _)| match name {
                Value::String(name) => Some(name.clone()),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                other => {
                    tracing::debug!("Skipping function resource with non-scalar name: {other:?}");
                    None
                }
            })
            .collect()
    }

    /// Classify the document for logging.
    pub fn outcome(&self) -> TemplateOutcome {
        match self.resources() {
            Some(_) => TemplateOutcome::Functions(self.function_names().len()),
            None => TemplateOutcome::MissingResourcesSection,
        }
    }
}

/// Extract the names of function resources declared in a template file.
///
/// Empty templates and templates without a usable `Resources` mapping yield an
/// empty list; they are not errors.
///
/// # Errors
///
/// - [`DetectError::FileOperation`] if the file cannot be read, including when
///   it disappeared after being located
/// - [`DetectError::MalformedTemplate`] if the content is not valid YAML
///
/// # Examples
///
/// ```rust,no_run
/// use sam_detect::template::extract_function_names;
/// use std::path::Path;
///
/// # async fn example() -> anyhow::Result<()> {
/// let names = extract_function_names(Path::new("/projects/app/template.yml")).await?;
/// for name in names {
///     println!("{name}");
/// }
/// # Ok(())
/// # }
/// ```
pub async fn extract_function_names(template_path: &Path) -> Result<Vec<String>, DetectError> {
    let content = FileOps::read_bytes_with_context(
        template_path,
        "reading template",
        "template::extract_function_names",
    )
    .await?;

    let document =
        TemplateDocument::parse(&content).map_err(|source| DetectError::MalformedTemplate {
            path: template_path.to_path_buf(),
            source,
        })?;

    let Some(document) = document else {
        tracing::debug!("{}: {:?}", template_path.display(), TemplateOutcome::EmptyContent);
        return Ok(Vec::new());
    };

    tracing::debug!("{}: {:?}", template_path.display(), document.outcome());
    Ok(document.function_names())
}
