//! Rendering the assembled request as a command line

use openapi_schema::HttpMethod;
use serde_json::Value;

use crate::settings::DEFAULT_ENVIRONMENT;

/// Everything that goes into the emitted command
#[derive(Debug, Clone, PartialEq)]
pub struct CommandLine {
    /// Leading program, e.g. `curl` or a wrapper
    pub program: String,
    pub environment: String,
    /// Base URL, path and query string
    pub url: String,
    pub method: HttpMethod,
    /// Headers in collection order
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl CommandLine {
    /// `<program>[ --env <env>] '<url>' -X <METHOD>[ -H '<n>: <v>']...[ -d '<json>']`
    ///
    /// `--env` is only passed for environments other than the default one.
    pub fn render(&self) -> String {
        let mut command = self.program.clone();

        if self.environment != DEFAULT_ENVIRONMENT {
            command.push_str(" --env ");
            command.push_str(&self.environment);
        }

        command.push(' ');
        command.push_str(&shell_quote(&self.url));
        command.push_str(" -X ");
        command.push_str(self.method.as_str());

        for (name, value) in &self.headers {
            command.push_str(" -H ");
            command.push_str(&shell_quote(&format!("{}: {}", name, value)));
        }

        if let Some(body) = &self.body {
            command.push_str(" -d ");
            command.push_str(&shell_quote(&body.to_string()));
        }

        command
    }
}

/// Wrap in single quotes, escaping embedded single quotes as `'\''`
pub fn shell_quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', r"'\''"))
}
