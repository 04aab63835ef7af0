//! Combining several schema documents into one addressable document

use serde_json::{Map, Value};
use tracing::debug;

use crate::types::{SchemaDocument, DEFAULT_OPENAPI_VERSION};

/// One input to a merge: a document and the prefix for its paths
#[derive(Debug, Clone)]
pub struct MergeEntry {
    pub document: SchemaDocument,
    /// Prepended to every path key of `document` (empty = unchanged)
    pub path_prefix: String,
}

impl MergeEntry {
    pub fn new(document: SchemaDocument, path_prefix: impl Into<String>) -> Self {
        Self {
            document,
            path_prefix: path_prefix.into(),
        }
    }
}

/// Merges documents describing one API surface split across several files
pub struct DocumentMerger;

impl DocumentMerger {
    /// Merge `entries` in order.
    ///
    /// `openapi` and `info` come from the first document. Paths are prefixed
    /// and, when two documents share a full path, the later method map is
    /// merged over the earlier one method by method. Component schemas share
    /// one flat namespace in which the last definition of a name wins.
    pub fn merge(entries: &[MergeEntry]) -> SchemaDocument {
        let Some(first) = entries.first() else {
            return SchemaDocument::empty();
        };

        let openapi = first
            .document
            .openapi()
            .unwrap_or(DEFAULT_OPENAPI_VERSION)
            .to_string();
        let info = first
            .document
            .info()
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()));

        let mut paths = Map::new();
        let mut schemas = Map::new();

        for entry in entries {
            if let Some(entry_paths) = entry.document.paths() {
                for (path, methods) in entry_paths {
                    let full_path = format!("{}{}", entry.path_prefix, path);
                    Self::merge_path_item(&mut paths, full_path, methods);
                }
            }

            if let Some(entry_schemas) = entry.document.component_schemas() {
                for (name, definition) in entry_schemas {
                    if schemas.insert(name.clone(), definition.clone()).is_some() {
                        debug!("Type {} redefined by a later document", name);
                    }
                }
            }
        }

        debug!(
            "Merged {} documents: {} paths, {} types",
            entries.len(),
            paths.len(),
            schemas.len()
        );

        SchemaDocument::assemble(openapi, info, paths, schemas)
    }

    fn merge_path_item(paths: &mut Map<String, Value>, full_path: String, methods: &Value) {
        if let (Some(Value::Object(existing)), Value::Object(incoming)) =
            (paths.get_mut(&full_path), methods)
        {
            for (method, operation) in incoming {
                existing.insert(method.clone(), operation.clone());
            }
            return;
        }

        paths.insert(full_path, methods.clone());
    }
}
