//! REPL command handler
//!
//! A line is either a command (`run`, `reset`, `quit`, or one of the
//! `:`-prefixed forms) or a fragment for the session.

use std::path::Path;

use owo_colors::OwoColorize;

use crate::repl::dir::validate_output_dir;
use crate::session::{RunOutcome, Session};
use crate::toolchain::EntryStatus;

/// Command result
#[derive(Debug, PartialEq, Eq)]
pub enum CommandResult {
    /// Exit the REPL
    Exit,
    /// Continue to next input
    Continue,
    /// Output a message
    Output(String),
}

/// A parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    Run,
    Reset,
    Quit,
    Help,
    Source,
    Dir(Option<&'a str>),
    Empty,
    Unknown(&'a str),
    Fragment(&'a str),
}

impl<'a> Command<'a> {
    /// Classify an already trimmed line
    pub fn parse(line: &'a str) -> Self {
        match line {
            "" => Command::Empty,
            "run" | ":run" | ":r" => Command::Run,
            "reset" | ":reset" | ":clear" | ":c" => Command::Reset,
            "quit" | ":quit" | ":q" => Command::Quit,
            ":help" | ":h" => Command::Help,
            ":source" | ":s" => Command::Source,
            _ if line.starts_with(':') => {
                let mut parts = line[1..].splitn(2, char::is_whitespace);
                match parts.next() {
                    Some("dir") => {
                        Command::Dir(parts.next().map(str::trim).filter(|p| !p.is_empty()))
                    }
                    _ => Command::Unknown(line),
                }
            }
            _ => Command::Fragment(line),
        }
    }
}

/// Command handler for REPL
pub struct CommandHandler<'a> {
    session: &'a mut Session,
    colors: bool,
}

impl<'a> CommandHandler<'a> {
    pub fn new(
        session: &'a mut Session,
        colors: bool,
    ) -> Self {
        Self { session, colors }
    }

    /// Handle one input line
    pub fn handle(
        &mut self,
        line: &str,
    ) -> CommandResult {
        match Command::parse(line.trim()) {
            Command::Empty => CommandResult::Continue,
            Command::Quit => CommandResult::Exit,
            Command::Reset => {
                self.session.reset();
                CommandResult::Continue
            }
            Command::Run => self.run(),
            Command::Help => CommandResult::Output(help_text()),
            Command::Source => {
                CommandResult::Output(self.session.render_preview().source().to_string())
            }
            Command::Dir(None) => CommandResult::Output(format!(
                "Output directory: {}",
                self.session.output_directory().display()
            )),
            Command::Dir(Some(path)) => match validate_output_dir(Path::new(path)) {
                Ok(dir) => {
                    self.session.set_output_directory(&dir);
                    CommandResult::Output(format!("Output directory: {}", dir.display()))
                }
                Err(e) => self.error(e.to_string()),
            },
            Command::Unknown(cmd) => self.error(format!("Unknown command: {}", cmd)),
            Command::Fragment(text) => match self.session.add(text) {
                Ok(()) => CommandResult::Continue,
                Err(e) => self.error(e.to_string()),
            },
        }
    }

    fn run(&mut self) -> CommandResult {
        match self.session.run_outcome() {
            Ok(RunOutcome::Executed(EntryStatus::Completed)) => CommandResult::Continue,
            Ok(RunOutcome::Executed(EntryStatus::Panicked)) => {
                self.error("A statement panicked; the trace is above.".to_string())
            }
            Ok(RunOutcome::CompileFailed { summary, log }) => {
                let message = match summary {
                    Some(summary) => summary,
                    None => format!("Compilation failed; see {}", log.display()),
                };
                self.error(message)
            }
            Err(e) => self.error(format!("Error: {}", e)),
        }
    }

    fn error(
        &self,
        message: String,
    ) -> CommandResult {
        if self.colors {
            CommandResult::Output(message.red().to_string())
        } else {
            CommandResult::Output(message)
        }
    }
}

/// Usage shown on start-up and by `:help`
pub fn help_text() -> String {
    [
        "Enter a Rust statement or a `use` declaration.",
        "No `return` statements or top-level items other than `use`/`extern crate`;",
        "local fns, structs and closures inside statements are fine.",
        "You can enter a `use` declaration at any point; it is moved to the top.",
        "Panics are caught for you and reported with their trace.",
        "Enter 'run' to run the statements, 'reset' to discard them, or 'quit' to quit.",
        "Other commands: :source (show the generated unit), :dir [PATH], :help.",
        "Note: all statements must be entered *before* running;",
        "after running, all statements are forgotten.",
        "",
        "Some examples:",
        "",
        "use std::collections::HashMap;",
        "let i = 0;",
        "if 2_i32.pow(2) == 4 { println!(\"Equal\"); }",
        "let mut i = 0; while i < 3 { println!(\"Nice!\"); i += 1; }",
        "struct Hello; impl Hello { fn hello(&self) { println!(\"Hello!\"); } } Hello.hello();",
    ]
    .join("\n")
}
