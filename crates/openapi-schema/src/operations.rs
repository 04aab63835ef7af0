//! Endpoint listing and per-operation lookups

use serde_json::Value;

use crate::types::{HttpMethod, Parameter, ParameterLocation, RawParameter, SchemaDocument};

/// Longest summary shown in a selection line before it is cut
const SUMMARY_LIMIT: usize = 100;

/// One operation of the merged document
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    pub method: HttpMethod,
    pub path: String,
    pub summary: Option<String>,
}

impl Endpoint {
    /// `<METHOD> <path> -- <summary>` as offered to the selector
    pub fn format_line(&self) -> String {
        let summary = self
            .summary
            .as_deref()
            .and_then(|s| s.lines().next())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("No description");

        format!("{} {} -- {}", self.method, self.path, truncate(summary))
    }

    /// `<METHOD> <path>`
    pub fn label(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

fn truncate(summary: &str) -> String {
    if summary.chars().count() <= SUMMARY_LIMIT {
        return summary.to_string();
    }
    let head: String = summary.chars().take(SUMMARY_LIMIT - 3).collect();
    format!("{}...", head)
}

/// Recover method and path from a line produced by [`Endpoint::format_line`]
pub fn parse_selection(line: &str) -> Option<(HttpMethod, String)> {
    let head = line.split(" -- ").next()?.trim();
    let (method, path) = head.split_once(' ')?;
    let method = method.parse().ok()?;
    let path = path.trim();
    if path.is_empty() {
        return None;
    }
    Some((method, path.to_string()))
}

/// Read-only view over the operations of a document
pub struct EndpointCatalog<'a> {
    document: &'a SchemaDocument,
}

impl<'a> EndpointCatalog<'a> {
    pub fn new(document: &'a SchemaDocument) -> Self {
        Self { document }
    }

    /// Every (path, method) pair, in document order
    pub fn endpoints(&self) -> Vec<Endpoint> {
        let Some(paths) = self.document.paths() else {
            return Vec::new();
        };

        let mut endpoints = Vec::new();
        for (path, item) in paths {
            let Some(methods) = item.as_object() else {
                continue;
            };
            for (key, operation) in methods {
                // Path items also carry `parameters`, `summary`, `servers`...
                let Ok(method) = key.parse::<HttpMethod>() else {
                    continue;
                };
                let summary = operation
                    .get("summary")
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty())
                    .or_else(|| operation.get("description").and_then(Value::as_str))
                    .map(str::to_string);

                endpoints.push(Endpoint {
                    method,
                    path: path.clone(),
                    summary,
                });
            }
        }

        endpoints
    }

    /// Parameters declared at `location` for one operation.
    ///
    /// Path-level parameters apply to every method; an operation-level
    /// parameter with the same name and location replaces them.
    pub fn parameters(
        &self,
        path: &str,
        method: HttpMethod,
        location: ParameterLocation,
    ) -> Vec<Parameter> {
        let shared = self
            .document
            .path_item(path)
            .and_then(|item| item.get("parameters"));
        let own = self
            .document
            .operation(path, method)
            .and_then(|op| op.get("parameters"));

        let mut parameters: Vec<Parameter> = Vec::new();
        for source in [shared, own].into_iter().flatten() {
            for param in Self::read_parameters(source) {
                if param.location != location {
                    continue;
                }
                parameters.retain(|existing| existing.name != param.name);
                parameters.push(param);
            }
        }

        parameters
    }

    fn read_parameters(value: &Value) -> Vec<Parameter> {
        value
            .as_array()
            .map(|list| {
                list.iter()
                    .filter_map(|raw| serde_json::from_value::<RawParameter>(raw.clone()).ok())
                    .filter_map(RawParameter::into_parameter)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The `application/json` request body schema of an operation
    pub fn request_body_schema(&self, path: &str, method: HttpMethod) -> Option<&'a Value> {
        self.document
            .operation(path, method)?
            .get("requestBody")?
            .get("content")?
            .get("application/json")?
            .get("schema")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SchemaType;
    use serde_json::json;

    fn document() -> SchemaDocument {
        SchemaDocument::from_value(json!({
            "openapi": "3.0.0",
            "paths": {
                "/widgets": {
                    "get": {
                        "summary": "List widgets\nwith paging",
                        "parameters": [
                            {"name": "limit", "in": "query", "schema": {"type": "integer"}},
                            {"name": "X-Trace", "in": "header"}
                        ]
                    },
                    "post": {
                        "description": "Create a widget",
                        "requestBody": {"content": {"application/json": {
                            "schema": {"$ref": "#/components/schemas/Widget"}
                        }}}
                    }
                },
                "/widgets/{id}": {
                    "parameters": [
                        {"name": "id", "in": "path", "required": true, "description": "old"}
                    ],
                    "delete": {
                        "parameters": [
                            {"name": "id", "in": "path", "required": true, "description": "Widget id"}
                        ]
                    },
                    "patch": {}
                }
            },
            "components": {"schemas": {"Widget": {"type": "object"}}}
        }))
        .unwrap()
    }

    #[test]
    fn test_endpoints_skip_non_methods() {
        let doc = document();
        let endpoints = EndpointCatalog::new(&doc).endpoints();

        let labels: Vec<_> = endpoints.iter().map(Endpoint::label).collect();
        assert_eq!(
            labels,
            vec!["GET /widgets", "POST /widgets", "DELETE /widgets/{id}", "PATCH /widgets/{id}"]
        );
    }

    #[test]
    fn test_format_line() {
        let doc = document();
        let endpoints = EndpointCatalog::new(&doc).endpoints();

        assert_eq!(endpoints[0].format_line(), "GET /widgets -- List widgets");
        assert_eq!(endpoints[1].format_line(), "POST /widgets -- Create a widget");
        assert_eq!(endpoints[3].format_line(), "PATCH /widgets/{id} -- No description");
    }

    #[test]
    fn test_format_line_truncates_long_summary() {
        let endpoint = Endpoint {
            method: HttpMethod::Get,
            path: "/x".to_string(),
            summary: Some("a".repeat(150)),
        };
        let line = endpoint.format_line();
        let summary = line.split(" -- ").nth(1).unwrap();

        assert_eq!(summary.len(), 100);
        assert!(summary.ends_with("..."));
    }

    #[test]
    fn test_parse_selection() {
        assert_eq!(
            parse_selection("DELETE /widgets/{id} -- Remove -- really"),
            Some((HttpMethod::Delete, "/widgets/{id}".to_string()))
        );
        assert_eq!(parse_selection("nonsense"), None);
        assert_eq!(parse_selection("FETCH /x -- y"), None);
    }

    #[test]
    fn test_parameters_by_location() {
        let doc = document();
        let catalog = EndpointCatalog::new(&doc);

        let query = catalog.parameters("/widgets", HttpMethod::Get, ParameterLocation::Query);
        assert_eq!(query.len(), 1);
        assert_eq!(query[0].name, "limit");
        assert_eq!(query[0].schema_type, SchemaType::Integer);

        let headers = catalog.parameters("/widgets", HttpMethod::Get, ParameterLocation::Header);
        assert_eq!(headers[0].name, "X-Trace");
        assert_eq!(headers[0].schema_type, SchemaType::String);

        assert!(catalog
            .parameters("/missing", HttpMethod::Get, ParameterLocation::Query)
            .is_empty());
    }

    #[test]
    fn test_operation_parameters_override_path_level() {
        let doc = document();
        let catalog = EndpointCatalog::new(&doc);

        let delete = catalog.parameters("/widgets/{id}", HttpMethod::Delete, ParameterLocation::Path);
        assert_eq!(delete.len(), 1);
        assert_eq!(delete[0].description.as_deref(), Some("Widget id"));

        let patch = catalog.parameters("/widgets/{id}", HttpMethod::Patch, ParameterLocation::Path);
        assert_eq!(patch[0].description.as_deref(), Some("old"));
    }

    #[test]
    fn test_request_body_schema() {
        let doc = document();
        let catalog = EndpointCatalog::new(&doc);

        assert_eq!(
            catalog.request_body_schema("/widgets", HttpMethod::Post),
            Some(&json!({"$ref": "#/components/schemas/Widget"}))
        );
        assert!(catalog.request_body_schema("/widgets", HttpMethod::Get).is_none());
    }
}
