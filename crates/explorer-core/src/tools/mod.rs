//! External programs the explorer delegates to
//!
//! Each collaborator sits behind a small trait so collection logic can be
//! exercised without a terminal:
//! 1. Fuzzy selector (endpoints, enum values)
//! 2. Identifier picker (uuid fields)
//! 3. Database query runner (identifier lookup)
//! 4. Editor (template body mode)

mod traits;
mod fzf;
mod picker;
mod psql;
mod editor;

pub use traits::{Editor, IdPicker, QueryRunner, Selector};
pub use fzf::FzfSelector;
pub use picker::ProcessIdPicker;
pub use psql::{parse_rows, PsqlRunner};
pub use editor::CommandEditor;

use std::io;

use crate::error::ExplorerError;
use crate::settings::ToolSettings;

/// Map a spawn failure, turning a missing binary into `ToolNotFound`
pub(crate) fn tool_error(program: &str, error: io::Error) -> ExplorerError {
    if error.kind() == io::ErrorKind::NotFound {
        ExplorerError::ToolNotFound {
            tool: program.to_string(),
        }
    } else {
        ExplorerError::ToolFailed {
            tool: program.to_string(),
            message: error.to_string(),
        }
    }
}

/// The collaborators used by one explorer run
pub struct Toolbox {
    pub selector: Box<dyn Selector>,
    pub id_picker: Box<dyn IdPicker>,
    pub editor: Box<dyn Editor>,
}

impl Toolbox {
    pub fn from_settings(tools: &ToolSettings) -> Self {
        Self {
            selector: Box::new(FzfSelector::new(&tools.selector)),
            id_picker: Box::new(ProcessIdPicker::new(&tools.id_picker)),
            editor: Box::new(CommandEditor::from_settings(tools.editor.as_deref())),
        }
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use crate::error::Result;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Selector answering from a script; `None` entries mean "cancelled"
    #[derive(Default)]
    pub struct FakeSelector {
        answers: RefCell<VecDeque<Option<String>>>,
        pub offered: RefCell<Vec<Vec<String>>>,
        pub missing: bool,
    }

    impl FakeSelector {
        pub fn new<I>(answers: I) -> Self
        where
            I: IntoIterator<Item = Option<&'static str>>,
        {
            Self {
                answers: RefCell::new(
                    answers.into_iter().map(|a| a.map(str::to_string)).collect(),
                ),
                ..Self::default()
            }
        }

        /// A selector that is not installed
        pub fn missing() -> Self {
            Self {
                missing: true,
                ..Self::default()
            }
        }
    }

    impl Selector for FakeSelector {
        fn select(&self, _prompt: &str, choices: &[String]) -> Result<Option<String>> {
            if self.missing {
                return Err(ExplorerError::ToolNotFound {
                    tool: "fzf".to_string(),
                });
            }
            self.offered.borrow_mut().push(choices.to_vec());
            Ok(self.answers.borrow_mut().pop_front().flatten())
        }
    }

    /// Picker returning scripted identifiers and recording the scopes it saw
    #[derive(Default)]
    pub struct FakePicker {
        answers: RefCell<VecDeque<Option<String>>>,
        pub scopes: RefCell<Vec<Option<String>>>,
    }

    impl FakePicker {
        pub fn new<I>(answers: I) -> Self
        where
            I: IntoIterator<Item = Option<&'static str>>,
        {
            Self {
                answers: RefCell::new(
                    answers.into_iter().map(|a| a.map(str::to_string)).collect(),
                ),
                ..Self::default()
            }
        }

        pub fn calls(&self) -> usize {
            self.scopes.borrow().len()
        }
    }

    impl IdPicker for FakePicker {
        fn pick(&self, client_scope: Option<&str>) -> Option<String> {
            self.scopes
                .borrow_mut()
                .push(client_scope.map(str::to_string));
            self.answers.borrow_mut().pop_front().flatten()
        }
    }

    /// Editor that replaces whatever it is given with fixed text
    pub struct FakeEditor {
        pub replacement: Option<String>,
        pub seen: RefCell<Option<String>>,
    }

    impl FakeEditor {
        pub fn returning(text: &str) -> Self {
            Self {
                replacement: Some(text.to_string()),
                seen: RefCell::new(None),
            }
        }

        /// Editor that saves the template untouched
        pub fn unchanged() -> Self {
            Self {
                replacement: None,
                seen: RefCell::new(None),
            }
        }
    }

    impl Editor for FakeEditor {
        fn edit(&self, initial: &str) -> Result<String> {
            *self.seen.borrow_mut() = Some(initial.to_string());
            Ok(self
                .replacement
                .clone()
                .unwrap_or_else(|| initial.to_string()))
        }
    }

    /// Query runner returning canned rows and recording the SQL
    #[derive(Default)]
    pub struct FakeQueryRunner {
        pub rows: Vec<Vec<String>>,
        pub queries: RefCell<Vec<String>>,
    }

    impl FakeQueryRunner {
        pub fn with_rows(rows: &[&[&str]]) -> Self {
            Self {
                rows: rows
                    .iter()
                    .map(|row| row.iter().map(|c| c.to_string()).collect())
                    .collect(),
                queries: RefCell::new(Vec::new()),
            }
        }
    }

    impl QueryRunner for FakeQueryRunner {
        fn query(&self, sql: &str) -> Result<Vec<Vec<String>>> {
            self.queries.borrow_mut().push(sql.to_string());
            Ok(self.rows.clone())
        }
    }
}
