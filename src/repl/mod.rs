//! REPL front end
//!
//! This module contains:
//! - [`line::LineREPL`] - interactive loop with rustyline
//! - [`commands::CommandHandler`] - command processor
//! - [`demo`] - static, non-interactive demo
//! - [`dir`] - output directory validation

pub mod commands;
pub mod demo;
pub mod dir;
pub mod line;

pub use commands::{Command, CommandHandler, CommandResult};
pub use dir::{prompt_output_dir, validate_output_dir, OutputDirError};
pub use line::LineREPL;
