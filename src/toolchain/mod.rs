//! External toolchain integration
//!
//! - [`driver::CompilerDriver`] - writes sources and runs rustc
//! - [`diagnostic`] - one-line summaries of the compiler log
//! - [`loader::Loader`] - opens compiled units and calls their entry point

pub mod diagnostic;
pub mod driver;
pub mod error;
pub mod loader;

pub use driver::{CompiledArtifact, CompilerDriver, ERROR_LOG};
pub use error::{InvokeError, LoadError, ToolchainError, ToolchainResult};
pub use loader::{EntryFn, EntryStatus, LoadedUnit, Loader, ENTRY_SYMBOL};
