//! Collaborator trait definitions

use crate::error::Result;

/// Fuzzy selection over a list of lines
pub trait Selector {
    /// Offer `choices` under `prompt`. `Ok(None)` means the operator picked
    /// nothing; a missing tool is an error.
    fn select(&self, prompt: &str, choices: &[String]) -> Result<Option<String>>;
}

/// External identifier picker
pub trait IdPicker {
    /// Pick one identifier, optionally scoped to a client. Any failure is
    /// `None` and callers fall back to manual entry.
    fn pick(&self, client_scope: Option<&str>) -> Option<String>;
}

/// Raw SQL against the configured database
pub trait QueryRunner {
    /// Run `sql` and return its rows as trimmed cells
    fn query(&self, sql: &str) -> Result<Vec<Vec<String>>>;
}

/// Interactive text editing
pub trait Editor {
    /// Let the operator edit `initial` and return the saved text
    fn edit(&self, initial: &str) -> Result<String>;
}
