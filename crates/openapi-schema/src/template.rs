//! Commented, human-editable body templates
//!
//! A template is JSON with `//` comment lines describing each field. It is
//! meant to be edited by hand and read back with [`strip_comments`], which
//! removes whole-line comments, truncates trailing comments and drops lines
//! left empty.

use serde_json::Value;

use crate::error::SchemaResult;
use crate::resolver::RefTrail;
use crate::synth::ValueSynthesizer;
use crate::types::{SchemaDocument, SchemaType};

const COMMENT: &str = "//";

/// Renders annotated templates for request bodies
#[derive(Debug, Clone, Copy)]
pub struct TemplateRenderer<'a> {
    synth: ValueSynthesizer<'a>,
}

impl<'a> TemplateRenderer<'a> {
    pub fn new(document: &'a SchemaDocument) -> Self {
        Self {
            synth: ValueSynthesizer::new(document),
        }
    }

    /// Render `schema` as commented JSON. `endpoint` (e.g. `POST /widgets`)
    /// is written as a header comment when given.
    pub fn render(&self, schema: &Value, endpoint: Option<&str>) -> String {
        let resolver = self.synth.resolver();
        let mut trail = RefTrail::new();
        let root = resolver.resolve_or_untyped(schema, &trail);

        let Some(properties) = root.definition.properties.as_ref() else {
            return "{}".to_string();
        };
        trail.enter(&root.refs);

        let mut lines = Vec::new();
        if let Some(endpoint) = endpoint {
            lines.push(format!("{} Endpoint: {}", COMMENT, endpoint));
            lines.push(COMMENT.to_string());
        }
        lines.push("{".to_string());

        let count = properties.len();
        for (idx, (name, field_schema)) in properties.iter().enumerate() {
            let field = resolver.resolve_or_untyped(field_schema, &trail);
            let definition = &field.definition;
            let field_type = definition.effective_type();

            let mut comment_parts = Vec::new();
            if let Some(description) = definition.description.as_deref().filter(|d| !d.is_empty()) {
                comment_parts.push(single_line(description));
            }
            let mut type_info = format!("Type: {}", field_type);
            if root.definition.is_required(name) {
                type_info.push_str(" (REQUIRED)");
            }
            comment_parts.push(type_info);
            lines.push(format!("  {} {}", COMMENT, comment_parts.join(" | ")));

            if field_type == SchemaType::Array {
                if let Some(items) = &definition.items {
                    trail.enter(&field.refs);
                    self.push_item_example(&mut lines, items, &mut trail);
                    trail.leave(&field.refs);
                }
            }

            let value = self.synth.field_value(name, field_schema, &mut trail);
            let comma = if idx + 1 == count { "" } else { "," };
            lines.push(format!("  {}: {}{}", json_text(&Value::from(name.as_str())), json_text(&value), comma));

            if idx + 1 != count {
                lines.push(String::new());
            }
        }

        lines.push("}".to_string());
        trail.leave(&root.refs);

        lines.join("\n")
    }

    /// Commented rendering of one example item, for arrays of objects
    fn push_item_example(&self, lines: &mut Vec<String>, items: &Value, trail: &mut RefTrail) {
        let resolver = self.synth.resolver();
        let Some(item) = resolver.resolve(items, trail) else {
            return;
        };
        if item.definition.effective_type() != SchemaType::Object {
            return;
        }

        let example = self.synth.root_example(items, trail);
        let pretty = serde_json::to_string_pretty(&example).unwrap_or_else(|_| json_text(&example));
        for line in pretty.lines() {
            lines.push(format!("  {} {}", COMMENT, line));
        }
    }
}

fn json_text(value: &Value) -> String {
    // Serializing a `Value` cannot fail
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove `//` comments from template text.
///
/// Lines that are only a comment are dropped; a trailing comment truncates
/// its line; lines that end up blank are dropped. Markers inside JSON string
/// literals are left alone.
pub fn strip_comments(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim_start().starts_with(COMMENT))
        .map(|line| match comment_start(line) {
            Some(pos) => line[..pos].trim_end(),
            None => line,
        })
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Byte offset of the first comment marker outside a string literal
fn comment_start(line: &str) -> Option<usize> {
    let mut in_string = false;
    let mut escaped = false;
    let mut previous_slash = false;

    for (pos, ch) in line.char_indices() {
        if in_string {
            match (escaped, ch) {
                (true, _) => escaped = false,
                (false, '\\') => escaped = true,
                (false, '"') => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => {
                in_string = true;
                previous_slash = false;
            }
            '/' if previous_slash => return Some(pos - 1),
            '/' => previous_slash = true,
            _ => previous_slash = false,
        }
    }

    None
}

/// Strip comments from an edited template and parse what remains.
/// Returns `None` when nothing but comments and whitespace is left.
pub fn parse_template(text: &str) -> SchemaResult<Option<Value>> {
    let stripped = strip_comments(text);
    if stripped.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(&stripped)?))
}
