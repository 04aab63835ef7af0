//! Operator interaction seam
//!
//! Collection code talks to the operator only through [`Prompter`], so the
//! terminal front end and tests can supply their own implementation.

use std::io;

/// Where a value being asked for will end up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOrigin {
    Path,
    Query,
    Header,
    Body,
}

/// What the operator is shown before being asked for a value
#[derive(Debug, Clone, PartialEq)]
pub struct FieldPrompt<'a> {
    pub name: &'a str,
    pub origin: FieldOrigin,
    pub required: bool,
    /// Declared type, e.g. `string` or `array`
    pub type_label: Option<&'a str>,
    pub description: Option<&'a str>,
    /// Value comes from a fixed set of choices
    pub enumerated: bool,
}

impl<'a> FieldPrompt<'a> {
    pub fn new(name: &'a str, origin: FieldOrigin) -> Self {
        Self {
            name,
            origin,
            required: false,
            type_label: None,
            description: None,
            enumerated: false,
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn type_label(mut self, type_label: &'a str) -> Self {
        self.type_label = Some(type_label);
        self
    }

    pub fn description(mut self, description: Option<&'a str>) -> Self {
        self.description = description.filter(|d| !d.is_empty());
        self
    }

    pub fn enumerated(mut self) -> Self {
        self.enumerated = true;
        self
    }

    /// Fields mentioning a uuid are offered to the identifier picker first
    pub fn wants_identifier(&self) -> bool {
        mentions_uuid(self.name) || self.description.map(mentions_uuid).unwrap_or(false)
    }
}

pub(crate) fn mentions_uuid(text: &str) -> bool {
    text.to_lowercase().contains("uuid")
}

/// Kind of status line shown to the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Info,
    Success,
    Warning,
}

/// Operator-facing input and output
pub trait Prompter {
    /// Start a titled section ("Path Parameters", "Request Body", ...)
    fn section(&mut self, title: &str);

    /// Show name, type, required-ness and description of a field
    fn describe(&mut self, field: &FieldPrompt<'_>);

    /// Show a status line
    fn notify(&mut self, level: Notice, message: &str);

    /// Read one line of free text. End of input reads as an empty line.
    fn read_line(&mut self, label: &str) -> io::Result<String>;

    /// Ask a yes/no question; only `y`/`yes` count as yes
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        let answer = self.read_line(question)?;
        Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
    }
}
