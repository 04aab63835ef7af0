//! psql-backed query runner

use std::process::Command;
use tracing::debug;

use super::traits::QueryRunner;
use super::tool_error;
use crate::error::{ExplorerError, Result};

/// Runs `psql [<database url>] -t -c <sql>`
pub struct PsqlRunner {
    program: String,
    database_url: Option<String>,
}

impl PsqlRunner {
    pub fn new(program: impl Into<String>, database_url: Option<String>) -> Self {
        Self {
            program: program.into(),
            database_url,
        }
    }
}

impl QueryRunner for PsqlRunner {
    fn query(&self, sql: &str) -> Result<Vec<Vec<String>>> {
        let mut command = Command::new(&self.program);
        if let Some(url) = &self.database_url {
            command.arg(url);
        }
        command.arg("-t").arg("-c").arg(sql);

        debug!("Running query: {}", sql);
        let output = command.output().map_err(|e| tool_error(&self.program, e))?;

        if !output.status.success() {
            return Err(ExplorerError::ToolFailed {
                tool: self.program.clone(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(parse_rows(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Split tuples-only output into rows of trimmed cells
pub fn parse_rows(output: &str) -> Vec<Vec<String>> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.split('|').map(|cell| cell.trim().to_string()).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rows() {
        let output = " 3f2a | Alpha Fund \n\n 9c1b |  \n";
        assert_eq!(
            parse_rows(output),
            vec![vec!["3f2a", "Alpha Fund"], vec!["9c1b", ""]]
        );
    }

    #[test]
    fn test_missing_psql_is_fatal() {
        let runner = PsqlRunner::new("api-explorer-no-such-psql", None);
        let err = runner.query("SELECT 1").unwrap_err();

        assert!(matches!(err, ExplorerError::ToolNotFound { .. }));
    }
}
