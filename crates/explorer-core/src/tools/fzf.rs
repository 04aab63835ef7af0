//! fzf-backed selector

use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};
use tracing::debug;

use super::traits::Selector;
use super::tool_error;
use crate::error::Result;

/// Runs an fzf-compatible program with the choices on stdin
pub struct FzfSelector {
    program: String,
}

impl FzfSelector {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Selector for FzfSelector {
    fn select(&self, prompt: &str, choices: &[String]) -> Result<Option<String>> {
        let mut child = Command::new(&self.program)
            .arg("--height=60%")
            .arg("--reverse")
            .arg("--border")
            .arg(format!("--prompt={}: ", prompt))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| tool_error(&self.program, e))?;

        if let Some(mut stdin) = child.stdin.take() {
            // The selector may exit before reading everything
            match stdin.write_all(choices.join("\n").as_bytes()) {
                Err(e) if e.kind() != ErrorKind::BrokenPipe => return Err(e.into()),
                _ => {}
            }
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            debug!("{} exited with {}, no selection", self.program, output.status);
            return Ok(None);
        }

        let selected = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(Some(selected).filter(|s| !s.is_empty()))
    }
}
