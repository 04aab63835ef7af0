//! # openapi-schema
//!
//! OpenAPI 3.x schema handling for API Explorer.
//! Merges several description documents into one addressable document,
//! resolves `$ref` pointers and synthesizes example request bodies.

mod types;
mod resolver;
mod merge;
mod synth;
mod template;
mod operations;
mod loader;
mod error;

pub use types::*;
pub use resolver::{RefTrail, ResolvedType, SchemaResolver};
pub use merge::{DocumentMerger, MergeEntry};
pub use synth::{default_for, placeholder, ValueSynthesizer};
pub use template::{parse_template, strip_comments, TemplateRenderer};
pub use operations::{parse_selection, Endpoint, EndpointCatalog};
pub use loader::{SchemaLoader, SchemaSource};
pub use error::{SchemaError, SchemaResult};
