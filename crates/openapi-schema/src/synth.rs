//! Representative example values for type definitions

use serde_json::{Map, Value};

use crate::resolver::{RefTrail, ResolvedType, SchemaResolver};
use crate::types::{SchemaDocument, SchemaType, TypeDefinition};

/// Placeholder used for string values: `<field-name>`
pub fn placeholder(name: &str) -> Value {
    Value::String(format!("<{}>", name))
}

/// Structural default for a declared type
pub fn default_for(schema_type: &SchemaType, name: &str) -> Value {
    match schema_type {
        SchemaType::String => placeholder(name),
        SchemaType::Integer => Value::from(0),
        SchemaType::Number => Value::from(0.0),
        SchemaType::Boolean => Value::Bool(false),
        SchemaType::Array => Value::Array(Vec::new()),
        SchemaType::Object => Value::Object(Map::new()),
        SchemaType::Other(_) => Value::Null,
    }
}

/// Produces example values without operator input.
///
/// Output depends only on the definition and the document it resolves
/// against.
#[derive(Debug, Clone, Copy)]
pub struct ValueSynthesizer<'a> {
    resolver: SchemaResolver<'a>,
}

impl<'a> ValueSynthesizer<'a> {
    pub fn new(document: &'a SchemaDocument) -> Self {
        Self {
            resolver: SchemaResolver::new(document),
        }
    }

    pub(crate) fn resolver(&self) -> SchemaResolver<'a> {
        self.resolver
    }

    /// Example value for a top-level definition.
    ///
    /// An explicit `example` is returned verbatim; a definition with neither
    /// `type` nor `properties` (or one that cannot be resolved) yields `{}`.
    pub fn example(&self, schema: &Value) -> Value {
        let mut trail = RefTrail::new();
        self.root_example(schema, &mut trail)
    }

    pub(crate) fn root_example(&self, schema: &Value, trail: &mut RefTrail) -> Value {
        let Some(resolved) = self.resolver.resolve(schema, trail) else {
            return Value::Object(Map::new());
        };
        let definition = &resolved.definition;

        if let Some(example) = &definition.example {
            return example.clone();
        }
        if definition.schema_type.is_none() && definition.properties.is_none() {
            return Value::Object(Map::new());
        }

        self.structural(&resolved, "value", trail)
    }

    /// Example value for one field of an object. The field's own `example`
    /// wins; untyped or unresolvable fields are treated as strings.
    pub(crate) fn field_value(&self, name: &str, schema: &Value, trail: &mut RefTrail) -> Value {
        let resolved = self.resolver.resolve_or_untyped(schema, trail);

        match &resolved.definition.example {
            Some(example) => example.clone(),
            None => self.structural(&resolved, name, trail),
        }
    }

    fn structural(&self, resolved: &ResolvedType, name: &str, trail: &mut RefTrail) -> Value {
        let definition = &resolved.definition;

        if definition.is_structured_object() {
            trail.enter(&resolved.refs);
            let value = self.object_fields(definition, trail);
            trail.leave(&resolved.refs);
            return value;
        }

        default_for(&definition.effective_type(), name)
    }

    fn object_fields(&self, definition: &TypeDefinition, trail: &mut RefTrail) -> Value {
        let mut object = Map::new();

        if let Some(properties) = &definition.properties {
            for (name, schema) in properties {
                let value = self.field_value(name, schema, trail);
                object.insert(name.clone(), value);
            }
        }

        Value::Object(object)
    }
}
