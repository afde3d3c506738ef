//! Runlet
//!
//! Accumulate Rust statements and `use` declarations, assemble them into a
//! single unit, build it with `rustc` as a shared library, load it and call
//! its entry point.
//!
//! # Example
//!
//! ```no_run
//! use runlet::{run_snippets, Result};
//!
//! fn main() -> Result<()> {
//!     let ok = run_snippets(
//!         "/tmp/runlet",
//!         &["use std::collections::*;", "let mut l = Vec::new(); l.push(5); println!(\"{}\", l[0]);"],
//!     )?;
//!     assert!(ok);
//!     Ok(())
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/runlet")]
#![warn(rust_2018_idioms)]

pub mod repl;
pub mod session;
pub mod toolchain;

// Utility modules
pub mod util;

// Re-exports
pub use anyhow::{Context, Result};
pub use session::{RunOutcome, Session, SessionError, SharedSession};

use std::path::PathBuf;

use tracing::debug;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Tool name
pub const NAME: &str = "Runlet";

/// Add `fragments` to a fresh session in `output_dir` and run them once
pub fn run_snippets(
    output_dir: impl Into<PathBuf>,
    fragments: &[&str],
) -> Result<bool> {
    let mut session = Session::with_output_dir(output_dir);
    for fragment in fragments {
        session.add(*fragment)?;
    }
    debug!("Running {} fragments", fragments.len());
    let ok = session.run()?;
    if !ok {
        debug!(
            "Compile failed: {}",
            session.last_diagnostic().unwrap_or("no diagnostic")
        );
    }
    Ok(ok)
}
