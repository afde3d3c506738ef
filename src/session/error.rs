//! Session error types

use thiserror::Error;

use crate::toolchain::{InvokeError, LoadError, ToolchainError};

/// Errors surfaced by [`crate::session::Session`].
///
/// Compile failures are not errors: `run` reports them as `Ok(false)` and
/// keeps the summary in `last_diagnostic`.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A disallowed construct was added; nothing was buffered
    #[error("Invalid statement: {0}")]
    InvalidStatement(String),

    /// Writing the unit or running the compiler failed
    #[error(transparent)]
    Toolchain(#[from] ToolchainError),

    /// The compiled unit could not be loaded
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The entry point could not be found or misbehaved
    #[error(transparent)]
    Invoke(#[from] InvokeError),
}

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;
