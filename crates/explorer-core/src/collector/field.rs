//! How a single field is collected

use openapi_schema::{RefTrail, ResolvedType, SchemaResolver, SchemaType, TypeDefinition};
use serde_json::Value;

/// Collection strategy for one field, checked in this order
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FieldKind {
    /// Pick from the declared `enum` values
    Enumerated(Vec<Value>),
    /// Object with properties, collected field by field
    Nested,
    /// Array, with its resolved item definition
    List(ResolvedType),
    /// Single free-text value of the given type
    Scalar(SchemaType),
}

impl FieldKind {
    pub(crate) fn classify(
        definition: &TypeDefinition,
        resolver: &SchemaResolver<'_>,
        trail: &RefTrail,
    ) -> Self {
        if let Some(choices) = definition.enum_values.as_ref().filter(|c| !c.is_empty()) {
            return FieldKind::Enumerated(choices.clone());
        }
        if definition.is_structured_object() {
            return FieldKind::Nested;
        }

        match definition.effective_type() {
            SchemaType::Array => FieldKind::List(
                definition
                    .items
                    .as_ref()
                    .map(|items| resolver.resolve_or_untyped(items, trail))
                    .unwrap_or_else(ResolvedType::unresolved),
            ),
            other => FieldKind::Scalar(other),
        }
    }
}

/// Text offered to the selector for one enum value
pub(crate) fn choice_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openapi_schema::SchemaDocument;
    use serde_json::json;

    fn classify(schema: Value) -> FieldKind {
        let doc = SchemaDocument::from_value(json!({
            "components": {"schemas": {"Tag": {"type": "object", "properties": {"x": {}}}}}
        }))
        .unwrap();
        let resolver = SchemaResolver::new(&doc);
        FieldKind::classify(&TypeDefinition::from_value(&schema), &resolver, &RefTrail::new())
    }

    #[test]
    fn test_enum_takes_precedence() {
        let kind = classify(json!({"type": "object", "enum": ["a", 1], "properties": {}}));
        assert_eq!(kind, FieldKind::Enumerated(vec![json!("a"), json!(1)]));
    }

    #[test]
    fn test_classify_structures() {
        assert_eq!(classify(json!({"properties": {"a": {}}})), FieldKind::Nested);
        assert_eq!(classify(json!({"type": "object"})), FieldKind::Scalar(SchemaType::Object));
        assert_eq!(classify(json!({})), FieldKind::Scalar(SchemaType::String));
        assert_eq!(classify(json!({"enum": []})), FieldKind::Scalar(SchemaType::String));

        let FieldKind::List(items) = classify(json!({
            "type": "array",
            "items": {"$ref": "#/components/schemas/Tag"}
        })) else {
            panic!("expected a list");
        };
        assert!(items.definition.is_structured_object());
        assert_eq!(items.refs, vec!["#/components/schemas/Tag".to_string()]);
    }

    #[test]
    fn test_array_without_items_has_untyped_items() {
        let FieldKind::List(items) = classify(json!({"type": "array"})) else {
            panic!("expected a list");
        };
        assert_eq!(items.definition.effective_type(), SchemaType::String);
    }

    #[test]
    fn test_choice_text() {
        assert_eq!(choice_text(&json!("red")), "red");
        assert_eq!(choice_text(&json!(3)), "3");
        assert_eq!(choice_text(&json!(true)), "true");
    }
}
