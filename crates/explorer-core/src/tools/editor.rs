//! Editing body templates in the operator's editor

use std::io::Write;
use std::process::Command;

use super::traits::Editor;
use super::tool_error;
use crate::error::{ExplorerError, Result};

/// Runs an editor command on a temporary file
pub struct CommandEditor {
    command: String,
}

impl CommandEditor {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Configured editor, else `$VISUAL`, else `$EDITOR`, else `vi`
    pub fn from_settings(configured: Option<&str>) -> Self {
        let command = configured
            .map(str::to_string)
            .or_else(|| std::env::var("VISUAL").ok())
            .or_else(|| std::env::var("EDITOR").ok())
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| "vi".to_string());
        Self::new(command)
    }
}

impl Editor for CommandEditor {
    fn edit(&self, initial: &str) -> Result<String> {
        let mut file = tempfile::Builder::new()
            .prefix("api-explorer-")
            .suffix(".jsonc")
            .tempfile()?;
        file.write_all(initial.as_bytes())?;
        file.flush()?;

        let mut parts = self.command.split_whitespace();
        let program = parts.next().ok_or_else(|| ExplorerError::ToolNotFound {
            tool: "editor".to_string(),
        })?;

        // Keep stdout clean for the rendered command
        let status = Command::new(program)
            .args(parts)
            .arg(file.path())
            .stdout(std::io::stderr())
            .status()
            .map_err(|e| tool_error(program, e))?;

        if !status.success() {
            return Err(ExplorerError::ToolFailed {
                tool: program.to_string(),
                message: format!("exited with {}", status),
            });
        }

        Ok(std::fs::read_to_string(file.path())?)
    }
}
