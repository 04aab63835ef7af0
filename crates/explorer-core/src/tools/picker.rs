//! Identifier picker run as a child process

use std::process::{Command, Stdio};
use tracing::debug;

use super::traits::IdPicker;

/// Runs `<program> [--client <scope>]` and reads one identifier from stdout
pub struct ProcessIdPicker {
    program: String,
}

impl ProcessIdPicker {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl IdPicker for ProcessIdPicker {
    fn pick(&self, client_scope: Option<&str>) -> Option<String> {
        let mut command = Command::new(&self.program);
        if let Some(scope) = client_scope {
            command.arg("--client").arg(scope);
        }

        let output = match command.stderr(Stdio::inherit()).output() {
            Ok(output) => output,
            Err(e) => {
                debug!("Could not run {}: {}", self.program, e);
                return None;
            }
        };

        if !output.status.success() {
            debug!("{} exited with {}", self.program, output.status);
            return None;
        }

        let picked = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Some(picked).filter(|p| !p.is_empty())
    }
}
