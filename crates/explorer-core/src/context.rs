//! Per-run state shared between header and body collection

use tracing::debug;

/// State of one explorer run.
///
/// Created fresh for each invocation and passed down the collection call
/// chain. The only thing it carries is the client-scoping identifier captured
/// from the scope header; the first value captured is kept for the rest of
/// the run.
#[derive(Debug, Default, Clone)]
pub struct SessionContext {
    client_scope: Option<String>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the client-scoping identifier. Returns `false` (and keeps the
    /// existing value) when one was already captured or `value` is blank.
    pub fn capture_client_scope(&mut self, value: &str) -> bool {
        let value = value.trim();
        if self.client_scope.is_some() || value.is_empty() {
            return false;
        }

        debug!("Captured client scope {}", value);
        self.client_scope = Some(value.to_string());
        true
    }

    pub fn client_scope(&self) -> Option<&str> {
        self.client_scope.as_deref()
    }
}
