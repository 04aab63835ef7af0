//! Terminal implementation of the prompt seam

use std::io::{self, BufRead, Stderr, StdinLock, Write};

use colored::Colorize;
use explorer_core::{FieldOrigin, FieldPrompt, Notice, Prompter};

/// Prompts on a writer (stderr in practice) and reads answers line by line
pub struct ConsolePrompter<R, W> {
    input: R,
    output: W,
}

impl ConsolePrompter<StdinLock<'static>, Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> ConsolePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    // Prompt output is best effort; a closed stderr must not abort the run
    fn emit(&mut self, line: &str) {
        let _ = writeln!(self.output, "{}", line);
    }
}

impl<R: BufRead, W: Write> Prompter for ConsolePrompter<R, W> {
    fn section(&mut self, title: &str) {
        self.emit("");
        self.emit(&format!("{}", format!("=== {} ===", title).cyan().bold()));
    }

    fn describe(&mut self, field: &FieldPrompt<'_>) {
        let name = field.name.bright_magenta();
        let heading = match field.origin {
            FieldOrigin::Path => format!("{} {{{}}}", "Variable:".bold(), name),
            FieldOrigin::Query => format!("{} ?{}=", "Query param:".bold(), name),
            FieldOrigin::Header => format!("{} {}", "Header:".bold(), name),
            FieldOrigin::Body => format!("{} \"{}\"", "Body field:".bold(), name),
        };

        let mut meta = vec![if field.required {
            "REQUIRED".bright_red().to_string()
        } else {
            "optional".yellow().to_string()
        }];
        if let Some(type_label) = field.type_label {
            meta.push(type_label.cyan().to_string());
        }
        if field.enumerated {
            meta.push("enum".green().to_string());
        }

        self.emit("");
        self.emit(&format!("  {}", heading));
        self.emit(&format!("  {} {}", "Type:".bold(), meta.join(", ")));
        if let Some(description) = field.description {
            self.emit(&format!("  {} {}", "Description:".bold(), description));
        }
    }

    fn notify(&mut self, level: Notice, message: &str) {
        let line = match level {
            Notice::Info => message.blue().to_string(),
            Notice::Success => format!("✓ {}", message).green().to_string(),
            Notice::Warning => format!("! {}", message).yellow().to_string(),
        };
        self.emit(&format!("  {}", line));
    }

    fn read_line(&mut self, label: &str) -> io::Result<String> {
        write!(self.output, "  {} ", format!("{}:", label).bold())?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            // End of input reads as an empty answer
            self.emit("");
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}
