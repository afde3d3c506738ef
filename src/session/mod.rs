//! Statement sessions
//!
//! A [`Session`] collects statements and imports, then on [`Session::run`]
//! renders them into one unit, compiles it with rustc, loads the library and
//! calls its entry point. All previously added fragments are forgotten after
//! every run, whether it succeeded or not.
//!
//! ```no_run
//! use runlet::session::Session;
//!
//! # fn main() -> Result<(), runlet::session::SessionError> {
//! let mut session = Session::with_output_dir("/tmp/runlet");
//! session.add("use std::collections::*;")?;
//! session.add("let mut l = Vec::new(); l.push(5); println!(\"{}\", l[0]);")?;
//! assert!(session.run()?);
//! # Ok(())
//! # }
//! ```

pub mod assembler;
pub mod error;
pub mod shared;

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::toolchain::{CompilerDriver, EntryStatus, Loader};
use crate::util::config::ToolchainConfig;

pub use assembler::{CompilationUnit, SourceAssembler, SOURCE_FILE, UNIT_NAME};
pub use error::{SessionError, SessionResult};
pub use shared::SharedSession;

const RETURN_KEYWORD: &str = "return";

/// What a run ended with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The unit compiled and its entry point ran
    Executed(EntryStatus),
    /// rustc rejected the unit
    CompileFailed {
        /// One-line summary, if the log had one
        summary: Option<String>,
        /// Full diagnostic log
        log: PathBuf,
    },
}

impl RunOutcome {
    /// Compiled and executed, even if a statement panicked
    pub fn succeeded(&self) -> bool {
        matches!(self, RunOutcome::Executed(_))
    }
}

/// Caller-owned interpreter state.
#[derive(Debug)]
pub struct Session {
    assembler: SourceAssembler,
    driver: CompilerDriver,
    last_diagnostic: Option<String>,
}

impl Session {
    pub fn new(
        output_dir: impl Into<PathBuf>,
        toolchain: ToolchainConfig,
    ) -> Self {
        Self {
            assembler: SourceAssembler::new(),
            driver: CompilerDriver::new(output_dir, toolchain),
            last_diagnostic: None,
        }
    }

    /// Session with the default toolchain settings
    pub fn with_output_dir(output_dir: impl Into<PathBuf>) -> Self {
        Self::new(output_dir, ToolchainConfig::default())
    }

    /// Add a statement or an import.
    ///
    /// `return` statements are rejected. Text starting with `use` or
    /// `extern crate` goes to the import buffer. Anything else is appended
    /// verbatim; syntax errors surface when the unit is compiled.
    pub fn add_statement(
        &mut self,
        text: impl Into<String>,
    ) -> SessionResult<()> {
        let text = text.into();
        if starts_with_keyword(&text, RETURN_KEYWORD) {
            return Err(SessionError::InvalidStatement(
                "No return statements allowed.".to_string(),
            ));
        }
        if is_import(&text) {
            debug!("Routing to imports: {}", text);
            self.assembler.push_import(text);
        } else {
            self.assembler.push_statement(text);
        }
        Ok(())
    }

    /// Same as [`Session::add_statement`]
    pub fn add(
        &mut self,
        text: impl Into<String>,
    ) -> SessionResult<()> {
        self.add_statement(text)
    }

    /// Append to the import buffer without classification
    pub fn add_import(
        &mut self,
        text: impl Into<String>,
    ) {
        self.assembler.push_import(text);
    }

    /// Forget all buffered fragments
    pub fn reset(&mut self) {
        self.assembler.clear();
    }

    pub fn imports(&self) -> &[String] {
        self.assembler.imports()
    }

    pub fn statements(&self) -> &[String] {
        self.assembler.statements()
    }

    /// Render the buffers without consuming them
    pub fn render_preview(&self) -> CompilationUnit {
        self.assembler.render()
    }

    pub fn output_directory(&self) -> &Path {
        self.driver.output_dir()
    }

    pub fn set_output_directory(
        &mut self,
        output_dir: impl Into<PathBuf>,
    ) {
        self.driver.set_output_dir(output_dir);
    }

    /// Summary of the last failed compile, if any
    pub fn last_diagnostic(&self) -> Option<&str> {
        self.last_diagnostic.as_deref()
    }

    /// Full diagnostic log of the last compile
    pub fn diagnostic_log_path(&self) -> PathBuf {
        self.driver.log_path()
    }

    /// Compile and run the buffered fragments.
    ///
    /// Returns `Ok(false)` when rustc rejects the unit; see
    /// [`Session::last_diagnostic`] for the reason.
    pub fn run(&mut self) -> SessionResult<bool> {
        self.run_outcome().map(|outcome| outcome.succeeded())
    }

    /// Like [`Session::run`], with the detailed outcome
    pub fn run_outcome(&mut self) -> SessionResult<RunOutcome> {
        let pending = self.assembler.take();
        self.last_diagnostic = None;

        let unit = pending.render();
        debug!(
            "Rendering {} imports and {} statements into {}",
            pending.imports().len(),
            pending.statements().len(),
            unit.file_name()
        );

        let source = self.driver.create_source_file(unit.file_name(), unit.source())?;
        let artifact = self.driver.compile(&source)?;
        if !artifact.succeeded {
            let summary = self.driver.compile_error();
            info!(
                "Compile failed: {}",
                summary.as_deref().unwrap_or("no diagnostic")
            );
            self.last_diagnostic = summary.clone();
            return Ok(RunOutcome::CompileFailed {
                summary,
                log: artifact.diagnostic_log_path,
            });
        }

        debug!(
            "Compiled {} into {}",
            artifact.source_path.display(),
            artifact.library_path.display()
        );
        let loaded = Loader::load_path(&artifact.library_path, unit.name())?;
        let status = loaded.invoke(unit.entry_symbol())?;
        info!("{} finished: {:?}", unit.name(), status);
        Ok(RunOutcome::Executed(status))
    }
}

/// `keyword` at the start of `text` (after whitespace), not followed by an
/// identifier character
fn starts_with_keyword(
    text: &str,
    keyword: &str,
) -> bool {
    match text.trim_start().strip_prefix(keyword) {
        Some(rest) => rest
            .chars()
            .next()
            .map_or(true, |c| !unicode_ident::is_xid_continue(c)),
        None => false,
    }
}

fn is_import(text: &str) -> bool {
    if starts_with_keyword(text, "use") {
        return true;
    }
    match text.trim_start().strip_prefix("extern") {
        Some(rest) if starts_with_keyword(rest, "crate") => {
            rest.starts_with(char::is_whitespace)
        }
        _ => false,
    }
}
