//! Template fixtures for tests

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::FUNCTION_RESOURCE_TYPE;

/// Builder for SAM template files.
///
/// Renders a template in the shape `sam init` produces: a header, a
/// `Resources` section, and an `Outputs` section using intrinsic function
/// tags.
#[derive(Clone, Debug, Default)]
pub struct TemplateFixture {
    resources: Vec<(String, String)>,
    include_outputs: bool,
}

impl TemplateFixture {
    /// A template declaring one function resource per name.
    pub fn with_functions<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            resources: names
                .into_iter()
                .map(|name| (name.into(), FUNCTION_RESOURCE_TYPE.to_string()))
                .collect(),
            include_outputs: true,
        }
    }

    /// Add a resource of an arbitrary type.
    #[must_use]
    pub fn with_resource(mut self, name: impl Into<String>, resource_type: impl Into<String>) -> Self {
        self.resources.push((name.into(), resource_type.into()));
        self
    }

    /// Omit the `Outputs` section.
    #[must_use]
    pub fn without_outputs(mut self) -> Self {
        self.include_outputs = false;
        self
    }

    /// Render the template content.
    pub fn render(&self) -> String {
        let resources = self
            .resources
            .iter()
            .map(|(name, resource_type)| render_resource(name, resource_type))
            .collect::<Vec<_>>()
            .join("\n");

        let mut content = format!(
            "AWSTemplateFormatVersion: '2010-09-09'
Transform: AWS::Serverless-2016-10-31
Description: >
    my-sam-app

    Sample SAM Template for my-sam-app

Resources:
{resources}
"
        );

        if self.include_outputs {
            content.push_str(OUTPUTS);
        }

        content
    }

    /// Write the template as `file_name` inside `dir` and return its path.
    pub fn write_to(&self, dir: &Path, file_name: &str) -> Result<PathBuf> {
        let path = dir.join(file_name);
        fs::write(&path, self.render())
            .with_context(|| format!("Failed to write template fixture {}", path.display()))?;
        Ok(path)
    }
}

fn render_resource(name: &str, resource_type: &str) -> String {
    format!(
        "    {name}:
        Type: {resource_type}
        Properties:
            CodeUri: hello_world/
            Handler: app.lambdaHandler
            Runtime: nodejs8.10
            Environment:
                Variables:
                    PARAM1: VALUE
            Events:
                HelloWorld:
                    Type: Api
                    Properties:
                        Path: /hello
                        Method: get"
    )
}

const OUTPUTS: &str = r#"
Outputs:

    HelloWorldApi:
      Description: "API Gateway endpoint URL for Prod stage for Hello World function"
      Value: !Sub "https://${ServerlessRestApi}.execute-api.${AWS::Region}.amazonaws.com/Prod/hello/"

    HelloWorldFunction:
      Description: "Hello World Lambda Function ARN"
      Value: !GetAtt HelloWorldFunction.Arn
"#;
