//! Type definitions for schema documents

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

use crate::error::{SchemaError, SchemaResult};

/// HTTP methods that may appear under a path item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    Trace,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Trace => "TRACE",
        }
    }

    /// Key used for this method inside a path item
    pub fn key(&self) -> String {
        self.as_str().to_lowercase()
    }

    /// Methods for which a request body is collected
    pub fn accepts_body(&self) -> bool {
        matches!(
            self,
            HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch | HttpMethod::Delete
        )
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(HttpMethod::Get),
            "post" => Ok(HttpMethod::Post),
            "put" => Ok(HttpMethod::Put),
            "patch" => Ok(HttpMethod::Patch),
            "delete" => Ok(HttpMethod::Delete),
            "head" => Ok(HttpMethod::Head),
            "options" => Ok(HttpMethod::Options),
            "trace" => Ok(HttpMethod::Trace),
            other => Err(format!("unsupported HTTP method: {}", other)),
        }
    }
}

/// Parameter location in HTTP request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

impl ParameterLocation {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "path" => Some(ParameterLocation::Path),
            "query" => Some(ParameterLocation::Query),
            "header" => Some(ParameterLocation::Header),
            "cookie" => Some(ParameterLocation::Cookie),
            _ => None,
        }
    }
}

/// Declared type of a schema fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
    Other(String),
}

impl SchemaType {
    pub fn as_str(&self) -> &str {
        match self {
            SchemaType::String => "string",
            SchemaType::Integer => "integer",
            SchemaType::Number => "number",
            SchemaType::Boolean => "boolean",
            SchemaType::Array => "array",
            SchemaType::Object => "object",
            SchemaType::Other(name) => name,
        }
    }

    fn from_name(name: &str) -> Self {
        match name {
            "string" => SchemaType::String,
            "integer" => SchemaType::Integer,
            "number" => SchemaType::Number,
            "boolean" => SchemaType::Boolean,
            "array" => SchemaType::Array,
            "object" => SchemaType::Object,
            other => SchemaType::Other(other.to_string()),
        }
    }

    /// Read a `type` keyword. OpenAPI 3.1 allows a list such as
    /// `["string", "null"]`; the first non-null entry wins.
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(name) => Some(Self::from_name(name)),
            Value::Array(names) => names
                .iter()
                .filter_map(Value::as_str)
                .find(|name| *name != "null")
                .map(Self::from_name),
            _ => None,
        }
    }
}

impl std::fmt::Display for SchemaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One type definition, either a `$ref` or an inline schema.
///
/// Nested `properties` and `items` are kept as raw values and read on demand,
/// so a malformed nested fragment only degrades that one field.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TypeDefinition {
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "schema_type")]
    pub schema_type: Option<SchemaType>,
    pub properties: Option<IndexMap<String, Value>>,
    pub items: Option<Value>,
    #[serde(default, deserialize_with = "field_names")]
    pub required: Vec<String>,
    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(default, deserialize_with = "present")]
    pub example: Option<Value>,
    pub description: Option<String>,
}

impl TypeDefinition {
    /// Read a definition from a raw schema fragment. Anything that is not a
    /// well-formed schema object reads as an empty, untyped definition.
    pub fn from_value(value: &Value) -> Self {
        Self::deserialize(value).unwrap_or_else(|e| {
            tracing::debug!("Treating malformed schema fragment as untyped: {}", e);
            Self::default()
        })
    }

    /// Declared type, falling back to `object` when only `properties` are
    /// given and to `string` when nothing is declared at all.
    pub fn effective_type(&self) -> SchemaType {
        match (&self.schema_type, &self.properties) {
            (Some(declared), _) => declared.clone(),
            (None, Some(_)) => SchemaType::Object,
            (None, None) => SchemaType::String,
        }
    }

    pub fn is_required(&self, field: &str) -> bool {
        self.required.iter().any(|name| name == field)
    }

    /// Object with a `properties` block, i.e. something that can be walked
    pub fn is_structured_object(&self) -> bool {
        self.effective_type() == SchemaType::Object && self.properties.is_some()
    }
}

fn schema_type<'de, D>(deserializer: D) -> Result<Option<SchemaType>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(SchemaType::from_value(&value))
}

fn field_names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    // `required: true` on a property (Swagger 2 style) carries no field names
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_array()
        .map(|names| {
            names
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default())
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    // An explicit `example: null` is still an example
    Value::deserialize(deserializer).map(Some)
}

/// A parameter for an operation
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Parameter name
    pub name: String,
    /// Where the parameter is located
    pub location: ParameterLocation,
    /// Whether the parameter is required
    pub required: bool,
    /// Declared `schema.type`, `string` when absent
    pub schema_type: SchemaType,
    /// Parameter description
    pub description: Option<String>,
}

/// Raw parameter object as written in a document
#[derive(Debug, Clone, Deserialize)]
pub struct RawParameter {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "in", default)]
    pub location: String,
    #[serde(default)]
    pub required: bool,
    pub description: Option<String>,
    pub schema: Option<Value>,
}

impl RawParameter {
    pub fn into_parameter(self) -> Option<Parameter> {
        let location = ParameterLocation::parse(&self.location)?;
        if self.name.is_empty() {
            return None;
        }

        let schema_type = self
            .schema
            .as_ref()
            .and_then(|s| s.get("type"))
            .and_then(SchemaType::from_value)
            .unwrap_or(SchemaType::String);

        Some(Parameter {
            name: self.name,
            location,
            required: self.required,
            schema_type,
            description: self.description.filter(|d| !d.is_empty()),
        })
    }
}

/// A schema document: `openapi`, `info`, `paths` and `components.schemas`.
///
/// The raw tree is kept as-is so that `$ref` pointers can address any part of
/// it; accessors give typed views over the pieces the explorer reads.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDocument {
    root: Value,
}

/// Version string used when a document does not declare one
pub const DEFAULT_OPENAPI_VERSION: &str = "3.0.0";

impl SchemaDocument {
    /// An empty document with empty `paths` and `components.schemas`
    pub fn empty() -> Self {
        Self::assemble(
            DEFAULT_OPENAPI_VERSION.to_string(),
            Value::Object(Map::new()),
            Map::new(),
            Map::new(),
        )
    }

    pub(crate) fn assemble(
        openapi: String,
        info: Value,
        paths: Map<String, Value>,
        schemas: Map<String, Value>,
    ) -> Self {
        let mut components = Map::new();
        components.insert("schemas".to_string(), Value::Object(schemas));

        let mut root = Map::new();
        root.insert("openapi".to_string(), Value::String(openapi));
        root.insert("info".to_string(), info);
        root.insert("paths".to_string(), Value::Object(paths));
        root.insert("components".to_string(), Value::Object(components));

        Self {
            root: Value::Object(root),
        }
    }

    /// Wrap an already parsed document
    pub fn from_value(root: Value) -> SchemaResult<Self> {
        if !root.is_object() {
            return Err(SchemaError::InvalidFormat(
                "document root is not an object".to_string(),
            ));
        }
        Ok(Self { root })
    }

    /// Parse document text (auto-detects JSON/YAML)
    pub fn parse(content: &str) -> SchemaResult<Self> {
        let root: Value = if content.trim_start().starts_with('{') {
            serde_json::from_str(content)?
        } else {
            serde_yaml::from_str(content)?
        };
        Self::from_value(root)
    }

    pub fn as_value(&self) -> &Value {
        &self.root
    }

    pub fn openapi(&self) -> Option<&str> {
        self.root.get("openapi").and_then(Value::as_str)
    }

    pub fn info(&self) -> Option<&Value> {
        self.root.get("info")
    }

    /// Path string -> path item
    pub fn paths(&self) -> Option<&Map<String, Value>> {
        self.root.get("paths").and_then(Value::as_object)
    }

    /// Type name -> definition
    pub fn component_schemas(&self) -> Option<&Map<String, Value>> {
        self.root
            .get("components")
            .and_then(|c| c.get("schemas"))
            .and_then(Value::as_object)
    }

    pub fn path_item(&self, path: &str) -> Option<&Value> {
        self.paths()?.get(path)
    }

    pub fn operation(&self, path: &str, method: HttpMethod) -> Option<&Value> {
        self.path_item(path)?.get(method.key())
    }
}
