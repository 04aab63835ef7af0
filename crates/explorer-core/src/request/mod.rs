//! Request assembly: endpoint selection through to the rendered command

mod assembler;
mod body;
mod command;

pub use assembler::{substitute_path, Outcome, RequestAssembler, RequestTarget};
pub use body::BodyMode;
pub use command::{shell_quote, CommandLine};
