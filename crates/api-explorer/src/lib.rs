//! # api-explorer
//!
//! Terminal front end for API Explorer. Prompts and diagnostics go to
//! stderr; stdout carries only the result (a command line or an identifier).

pub mod cli;
mod console;
mod logging;

pub use console::ConsolePrompter;
pub use logging::init_logging;
