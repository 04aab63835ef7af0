//! How the request body is produced

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

/// Body generation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyMode {
    /// Prompt for each field
    #[default]
    Interactive,
    /// Edit an annotated template in the editor
    Template,
    /// Use the synthesized example unchanged
    Example,
}

impl BodyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BodyMode::Interactive => "interactive",
            BodyMode::Template => "template",
            BodyMode::Example => "example",
        }
    }
}

impl fmt::Display for BodyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BodyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "interactive" => Ok(BodyMode::Interactive),
            "template" => Ok(BodyMode::Template),
            "example" => Ok(BodyMode::Example),
            other => Err(format!(
                "unknown body mode '{}' (expected interactive, template or example)",
                other
            )),
        }
    }
}

/// An empty object counts as no body
pub(crate) fn non_empty_body(body: Option<Value>) -> Option<Value> {
    body.filter(|value| value.as_object().map_or(true, |object| !object.is_empty()))
}
