//! Reading single values from the operator

use std::io;

use crate::context::SessionContext;
use crate::prompt::{FieldPrompt, Notice, Prompter};
use crate::tools::IdPicker;

/// Ask for one free-text value.
///
/// Fields that mention a uuid go to the identifier picker first, scoped to
/// the captured client when there is one. Blank input is `None`.
pub(crate) fn solicit_text(
    prompter: &mut dyn Prompter,
    picker: &dyn IdPicker,
    context: &SessionContext,
    field: &FieldPrompt<'_>,
) -> io::Result<Option<String>> {
    let line = solicit_verbatim(prompter, picker, context, field)?;
    let text = line.trim();
    Ok((!text.is_empty()).then(|| text.to_string()))
}

/// Like [`solicit_text`] but returns the typed line untouched, empty included
pub(crate) fn solicit_verbatim(
    prompter: &mut dyn Prompter,
    picker: &dyn IdPicker,
    context: &SessionContext,
    field: &FieldPrompt<'_>,
) -> io::Result<String> {
    prompter.describe(field);

    if field.wants_identifier() {
        if let Some(picked) = pick_identifier(prompter, picker, context) {
            return Ok(picked);
        }
    }

    prompter.read_line("Enter value")
}

/// Run the identifier picker, reporting the outcome
pub(crate) fn pick_identifier(
    prompter: &mut dyn Prompter,
    picker: &dyn IdPicker,
    context: &SessionContext,
) -> Option<String> {
    match picker.pick(context.client_scope()) {
        Some(picked) => {
            prompter.notify(Notice::Success, &format!("Selected: {}", picked));
            Some(picked)
        }
        None => {
            prompter.notify(
                Notice::Info,
                "Identifier picker unavailable, falling back to manual input",
            );
            None
        }
    }
}

/// Read one line, trimmed; blank is `None`
pub(crate) fn read_text(prompter: &mut dyn Prompter, label: &str) -> io::Result<Option<String>> {
    let line = prompter.read_line(label)?;
    let text = line.trim();
    Ok((!text.is_empty()).then(|| text.to_string()))
}
