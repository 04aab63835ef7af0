//! # explorer-core
//!
//! Interactive request construction for API Explorer:
//! - Environment settings and the per-run session context
//! - The operator prompt seam and external collaborators (selector,
//!   identifier picker, database client, editor)
//! - Field-by-field body collection with type coercion
//! - Request assembly and command rendering
//! - Identifier lookup for the `api-id-picker` collaborator

pub mod collector;
pub mod context;
pub mod error;
pub mod lookup;
pub mod prompt;
pub mod request;
pub mod settings;
pub mod tools;

pub use collector::{coerce, coerce_list, Coercion, Collector};
pub use context::SessionContext;
pub use error::{ExplorerError, Result};
pub use lookup::{uuid_from_line, IdLookup, IdRow, LookupQuery};
pub use prompt::{FieldOrigin, FieldPrompt, Notice, Prompter};
pub use request::{BodyMode, CommandLine, Outcome, RequestAssembler, RequestTarget};
pub use settings::{
    EnvironmentSettings, HeaderSettings, IdLookupSettings, SchemaSettings, Settings,
    SettingsManager, TableLookup, ToolSettings, DEFAULT_ENVIRONMENT,
};
pub use tools::{
    CommandEditor, Editor, FzfSelector, IdPicker, ProcessIdPicker, PsqlRunner, QueryRunner,
    Selector, Toolbox,
};
