//! Toolchain error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while driving the external compiler.
#[derive(Debug, Error)]
pub enum ToolchainError {
    /// No compiler could be resolved from config, environment or PATH
    #[error("Rust compiler not found: {0}")]
    NotFound(String),

    /// The compiler process could not be started
    #[error("Failed to start `{program}`: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error while preparing sources or the diagnostic log
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while loading a compiled unit.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The expected artifact is not in the output directory
    #[error("Compiled unit not found: {0}")]
    Missing(PathBuf),

    /// The artifact could not be copied to its staging file
    #[error("Failed to stage compiled unit: {0}")]
    Stage(#[source] std::io::Error),

    /// The dynamic loader rejected the artifact
    #[error("Failed to open compiled unit: {0}")]
    Open(#[from] libloading::Error),
}

/// Errors raised while invoking a loaded unit.
#[derive(Debug, Error)]
pub enum InvokeError {
    /// No exported symbol with the requested name
    #[error("Couldn't find the entry point `{0}` in the compiled unit")]
    MethodNotFound(String),

    /// The entry point returned a status outside the known contract
    #[error("Entry point returned unexpected status {0}")]
    UnexpectedStatus(i32),
}

/// Result type for toolchain operations
pub type ToolchainResult<T> = Result<T, ToolchainError>;
