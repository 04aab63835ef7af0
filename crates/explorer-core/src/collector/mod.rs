//! Interactive collection of request bodies
//!
//! The collector walks a body definition field by field in declaration order
//! and asks the operator for each value. Per field it either offers the enum
//! choices, recurses into a nested object, collects a list, or reads a single
//! value, then coerces the text to the declared type.
//!
//! Empty answers are omissions: an optional field is left out, a required one
//! is kept as `null`, and an object with no populated fields collapses to
//! `None` so its parent can skip it.

mod coerce;
mod field;
mod solicit;

pub use coerce::{coerce, coerce_list, Coercion};
pub(crate) use solicit::{solicit_text, solicit_verbatim};

use openapi_schema::{RefTrail, ResolvedType, SchemaDocument, SchemaResolver, SchemaType, TypeDefinition};
use serde_json::{Map, Value};
use tracing::debug;

use crate::context::SessionContext;
use crate::error::{ExplorerError, Result};
use crate::prompt::{mentions_uuid, FieldOrigin, FieldPrompt, Notice, Prompter};
use crate::tools::{IdPicker, Selector};
use field::{choice_text, FieldKind};
use solicit::{pick_identifier, read_text};

/// Collects body values for one run
pub struct Collector<'a> {
    resolver: SchemaResolver<'a>,
    selector: &'a dyn Selector,
    picker: &'a dyn IdPicker,
    context: &'a SessionContext,
    /// References being expanded on the current path
    trail: RefTrail,
}

impl<'a> Collector<'a> {
    pub fn new(
        document: &'a SchemaDocument,
        selector: &'a dyn Selector,
        picker: &'a dyn IdPicker,
        context: &'a SessionContext,
    ) -> Self {
        Self {
            resolver: SchemaResolver::new(document),
            selector,
            picker,
            context,
            trail: RefTrail::new(),
        }
    }

    /// Collect a body for `schema`.
    ///
    /// Returns `Ok(None)` when the definition has no properties or the
    /// operator populated nothing.
    pub fn collect(&mut self, schema: &Value, prompter: &mut dyn Prompter) -> Result<Option<Value>> {
        let resolved = self.resolver.resolve_or_untyped(schema, &self.trail);
        if !resolved.definition.is_structured_object() {
            prompter.notify(Notice::Info, "No properties defined in body schema");
            return Ok(None);
        }

        let body = self.collect_object(&resolved, prompter)?;
        match body {
            Some(_) => prompter.notify(Notice::Success, "Body built successfully"),
            None => prompter.notify(Notice::Info, "Empty body, skipping"),
        }
        Ok(body)
    }

    fn collect_object(
        &mut self,
        resolved: &ResolvedType,
        prompter: &mut dyn Prompter,
    ) -> Result<Option<Value>> {
        self.trail.enter(&resolved.refs);
        let result = self.collect_fields(&resolved.definition, prompter);
        self.trail.leave(&resolved.refs);
        result
    }

    fn collect_fields(
        &mut self,
        definition: &TypeDefinition,
        prompter: &mut dyn Prompter,
    ) -> Result<Option<Value>> {
        let Some(properties) = &definition.properties else {
            return Ok(None);
        };

        let mut object = Map::new();
        for (name, schema) in properties {
            let required = definition.is_required(name);
            let field = self.resolver.resolve_or_untyped(schema, &self.trail);
            let type_name = field.definition.effective_type().to_string();
            let prompt = FieldPrompt::new(name, FieldOrigin::Body)
                .required(required)
                .type_label(&type_name)
                .description(field.definition.description.as_deref());

            let value = match FieldKind::classify(&field.definition, &self.resolver, &self.trail) {
                FieldKind::Nested => {
                    prompter.describe(&prompt);
                    // An empty nested object is left out, required or not
                    if let Some(nested) = self.collect_object(&field, prompter)? {
                        object.insert(name.clone(), nested);
                    }
                    continue;
                }
                FieldKind::Enumerated(choices) => self
                    .choose(&prompt.enumerated(), &choices, prompter)?
                    .map(|text| coerce_reporting(&text, &field.definition.effective_type(), prompter)),
                FieldKind::List(items) => self.collect_list(&prompt, &items, prompter)?,
                FieldKind::Scalar(schema_type) => {
                    solicit_text(prompter, self.picker, self.context, &prompt)?
                        .map(|text| coerce_reporting(&text, &schema_type, prompter))
                }
            };

            match value {
                Some(value) => {
                    object.insert(name.clone(), value);
                }
                None if required => {
                    prompter.notify(Notice::Info, "Required field left empty, including as null");
                    object.insert(name.clone(), Value::Null);
                }
                None => {}
            }
        }

        if object.is_empty() {
            Ok(None)
        } else {
            Ok(Some(Value::Object(object)))
        }
    }

    /// Let the operator pick one of the enum values
    fn choose(
        &self,
        prompt: &FieldPrompt<'_>,
        choices: &[Value],
        prompter: &mut dyn Prompter,
    ) -> Result<Option<String>> {
        prompter.describe(prompt);
        let lines: Vec<String> = choices.iter().map(choice_text).collect();

        match self.selector.select(&format!("Select {}", prompt.name), &lines) {
            Ok(Some(selected)) => {
                prompter.notify(Notice::Success, &format!("Selected: {}", selected));
                Ok(Some(selected))
            }
            Ok(None) => {
                prompter.notify(Notice::Info, "No selection made");
                Ok(None)
            }
            Err(ExplorerError::ToolNotFound { tool }) => {
                debug!("{} not found, reading enum value as text", tool);
                prompter.notify(Notice::Info, &format!("Options: {}", lines.join(", ")));
                Ok(read_text(prompter, "Enter value")?)
            }
            Err(e) => Err(e),
        }
    }

    /// Collect an array field
    fn collect_list(
        &mut self,
        prompt: &FieldPrompt<'_>,
        items: &ResolvedType,
        prompter: &mut dyn Prompter,
    ) -> Result<Option<Value>> {
        prompter.describe(prompt);
        let name = prompt.name;

        if items.definition.is_structured_object() {
            let mut values = Vec::new();
            while prompter.confirm(&format!("Add item to {}? (y/n)", name))? {
                if let Some(item) = self.collect_object(items, prompter)? {
                    values.push(item);
                }
            }
            return Ok(non_empty(values));
        }

        let item_type = items.definition.effective_type();
        prompter.notify(Notice::Info, &format!("Items type: {}", item_type));

        let item_description = items.definition.description.as_deref().unwrap_or_default();
        if mentions_uuid(name) || mentions_uuid(item_description) {
            let mut values = Vec::new();
            while prompter.confirm(&format!("Add UUID to {}? (y/n)", name))? {
                let picked = match pick_identifier(prompter, self.picker, self.context) {
                    Some(picked) => Some(picked),
                    None => read_text(prompter, "Enter UUID")?,
                };
                if let Some(picked) = picked {
                    values.push(Value::String(picked));
                }
            }
            return Ok(non_empty(values));
        }

        let Some(text) = read_text(prompter, "Enter values (comma-separated)")? else {
            return Ok(None);
        };
        let coercion = coerce_list(&text, &item_type);
        if coercion.is_fallback() {
            prompter.notify(
                Notice::Warning,
                &format!("Not every item is a valid {}, keeping text", item_type),
            );
        }

        match coercion.into_value() {
            Value::Array(values) => Ok(non_empty(values)),
            other => Ok(Some(other)),
        }
    }
}

/// Coerce, warning when the text had to be kept as is
fn coerce_reporting(text: &str, schema_type: &SchemaType, prompter: &mut dyn Prompter) -> Value {
    let coercion = coerce(text, schema_type);
    if coercion.is_fallback() {
        prompter.notify(
            Notice::Warning,
            &format!("Invalid {}, using as string", schema_type),
        );
    }
    coercion.into_value()
}

fn non_empty(values: Vec<Value>) -> Option<Value> {
    (!values.is_empty()).then_some(Value::Array(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::scripted::ScriptedPrompter;
    use crate::tools::fake::{FakePicker, FakeSelector};
    use serde_json::json;

    fn document() -> SchemaDocument {
        SchemaDocument::from_value(json!({
            "openapi": "3.0.0",
            "paths": {},
            "components": {"schemas": {
                "Widget": {
                    "type": "object",
                    "required": ["name"],
                    "properties": {
                        "name": {"type": "string"},
                        "count": {"type": "integer"}
                    }
                },
                "Line": {
                    "type": "object",
                    "properties": {"sku": {"type": "string"}}
                },
                "Tree": {
                    "type": "object",
                    "properties": {
                        "label": {"type": "string"},
                        "parent": {"$ref": "#/components/schemas/Tree"}
                    }
                }
            }}
        }))
        .unwrap()
    }

    fn collect_with(
        schema: Value,
        prompter: &mut ScriptedPrompter,
        selector: &FakeSelector,
        picker: &FakePicker,
        context: &SessionContext,
    ) -> Option<Value> {
        let doc = document();
        let mut collector = Collector::new(&doc, selector, picker, context);
        collector.collect(&schema, prompter).unwrap()
    }

    fn collect(schema: Value, answers: &[&str]) -> (Option<Value>, ScriptedPrompter) {
        let mut prompter = ScriptedPrompter::new(answers.iter().copied());
        let value = collect_with(
            schema,
            &mut prompter,
            &FakeSelector::default(),
            &FakePicker::default(),
            &SessionContext::new(),
        );
        (value, prompter)
    }

    fn widget() -> Value {
        json!({"$ref": "#/components/schemas/Widget"})
    }

    #[test]
    fn test_optional_empty_field_is_omitted() {
        let (body, _) = collect(widget(), &["Foo", ""]);
        assert_eq!(body, Some(json!({"name": "Foo"})));
    }

    #[test]
    fn test_required_empty_field_is_null() {
        let (body, _) = collect(widget(), &["", ""]);
        assert_eq!(body, Some(json!({"name": null})));
    }

    #[test]
    fn test_no_fields_populated_is_none() {
        let schema = json!({"type": "object", "properties": {"a": {"type": "string"}}});
        let (body, prompter) = collect(schema, &[""]);

        assert_eq!(body, None);
        assert!(prompter
            .notices
            .iter()
            .any(|(_, message)| message == "Empty body, skipping"));
    }

    #[test]
    fn test_integer_is_coerced_or_kept_with_warning() {
        let (body, prompter) = collect(widget(), &["Foo", "12"]);
        assert_eq!(body, Some(json!({"name": "Foo", "count": 12})));
        assert!(!prompter.warned());

        let (body, prompter) = collect(widget(), &["Foo", "twelve"]);
        assert_eq!(body, Some(json!({"name": "Foo", "count": "twelve"})));
        assert!(prompter.warned());
    }

    #[test]
    fn test_boolean_and_number_fields() {
        let schema = json!({"type": "object", "properties": {
            "active": {"type": "boolean"},
            "ratio": {"type": "number"}
        }});
        let (body, _) = collect(schema, &["Yes", "0.25"]);
        assert_eq!(body, Some(json!({"active": true, "ratio": 0.25})));
    }

    #[test]
    fn test_string_array_from_comma_separated_text() {
        let schema = json!({"type": "object", "properties": {
            "tags": {"type": "array", "items": {"type": "string"}}
        }});
        let (body, _) = collect(schema, &["a, b, b"]);
        assert_eq!(body, Some(json!({"tags": ["a", "b", "b"]})));
    }

    #[test]
    fn test_integer_array_partial_coercion_keeps_text() {
        let schema = json!({"type": "object", "properties": {
            "sizes": {"type": "array", "items": {"type": "integer"}}
        }});

        let (body, _) = collect(schema.clone(), &["1, 2"]);
        assert_eq!(body, Some(json!({"sizes": [1, 2]})));

        let (body, prompter) = collect(schema, &["1, x"]);
        assert_eq!(body, Some(json!({"sizes": ["1", "x"]})));
        assert!(prompter.warned());
    }

    #[test]
    fn test_nested_object_is_collected_or_omitted() {
        let schema = json!({"type": "object", "required": ["address"], "properties": {
            "address": {"type": "object", "properties": {"street": {"type": "string"}}},
            "note": {"type": "string"}
        }});

        let (body, _) = collect(schema.clone(), &["Main St", "hi"]);
        assert_eq!(body, Some(json!({"address": {"street": "Main St"}, "note": "hi"})));

        // Required but empty nested objects are left out, not null
        let (body, _) = collect(schema, &["", "hi"]);
        assert_eq!(body, Some(json!({"note": "hi"})));
    }

    #[test]
    fn test_array_of_objects_loops_until_declined() {
        let schema = json!({"type": "object", "properties": {
            "lines": {"type": "array", "items": {"$ref": "#/components/schemas/Line"}}
        }});

        let (body, prompter) = collect(schema, &["y", "A1", "yes", "", "n"]);

        assert_eq!(body, Some(json!({"lines": [{"sku": "A1"}]})));
        assert_eq!(prompter.remaining(), 0);
    }

    #[test]
    fn test_enum_uses_selector_and_coerces() {
        let schema = json!({"type": "object", "properties": {
            "colour": {"type": "string", "enum": ["red", "blue"]},
            "level": {"type": "integer", "enum": [1, 2]}
        }});
        let selector = FakeSelector::new([Some("blue"), Some("2")]);
        let mut prompter = ScriptedPrompter::new(Vec::<String>::new());

        let body = collect_with(
            schema,
            &mut prompter,
            &selector,
            &FakePicker::default(),
            &SessionContext::new(),
        );

        assert_eq!(body, Some(json!({"colour": "blue", "level": 2})));
        assert_eq!(selector.offered.borrow()[1], vec!["1", "2"]);
    }

    #[test]
    fn test_enum_cancel_and_missing_selector() {
        let schema = json!({"type": "object", "properties": {
            "colour": {"enum": ["red", "blue"]}
        }});

        let mut prompter = ScriptedPrompter::new(Vec::<String>::new());
        let cancelled = collect_with(
            schema.clone(),
            &mut prompter,
            &FakeSelector::new([None]),
            &FakePicker::default(),
            &SessionContext::new(),
        );
        assert_eq!(cancelled, None);

        let mut prompter = ScriptedPrompter::new(["red"]);
        let typed = collect_with(
            schema,
            &mut prompter,
            &FakeSelector::missing(),
            &FakePicker::default(),
            &SessionContext::new(),
        );
        assert_eq!(typed, Some(json!({"colour": "red"})));
    }

    #[test]
    fn test_uuid_field_is_delegated_with_client_scope() {
        let schema = json!({"type": "object", "properties": {
            "owner_uuid": {"type": "string"}
        }});
        let picker = FakePicker::new([Some("3f2a")]);
        let mut context = SessionContext::new();
        context.capture_client_scope("c-9");
        let mut prompter = ScriptedPrompter::new(Vec::<String>::new());

        let body = collect_with(schema, &mut prompter, &FakeSelector::default(), &picker, &context);

        assert_eq!(body, Some(json!({"owner_uuid": "3f2a"})));
        assert_eq!(*picker.scopes.borrow(), vec![Some("c-9".to_string())]);
    }

    #[test]
    fn test_uuid_array_picks_each_item() {
        let schema = json!({"type": "object", "properties": {
            "member_uuids": {"type": "array", "items": {"type": "string"}}
        }});
        let picker = FakePicker::new([Some("a1"), None]);
        let mut prompter = ScriptedPrompter::new(["y", "y", "b2", "n"]);

        let body = collect_with(
            schema,
            &mut prompter,
            &FakeSelector::default(),
            &picker,
            &SessionContext::new(),
        );

        assert_eq!(body, Some(json!({"member_uuids": ["a1", "b2"]})));
        assert_eq!(picker.calls(), 2);
    }

    #[test]
    fn test_recursive_definition_terminates() {
        let (body, _) = collect(json!({"$ref": "#/components/schemas/Tree"}), &["root", "up"]);
        assert_eq!(body, Some(json!({"label": "root", "parent": "up"})));
    }

    #[test]
    fn test_body_without_properties_is_skipped() {
        let (body, prompter) = collect(json!({"type": "string"}), &["ignored"]);

        assert_eq!(body, None);
        assert_eq!(prompter.remaining(), 1);
    }
}
