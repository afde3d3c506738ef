//! Source assembler
//!
//! Accumulates import and statement fragments and renders them into one
//! compilable unit. The layout below is fixed so that compiler diagnostics
//! point at stable columns:
//!
//! ```text
//! <imports><PREAMBLE><GUARD_OPEN><statements><GUARD_CLOSE>
//! ```
//!
//! Nothing is inserted between fragments; callers bring their own `;`.

use crate::toolchain::loader::ENTRY_SYMBOL;

/// Name of the generated unit; reused (and overwritten) on every run
pub const UNIT_NAME: &str = "runner";

/// Source file the unit is written to
pub const SOURCE_FILE: &str = "runner.rs";

/// Opens the exported, parameterless entry point
pub const PREAMBLE: &str = "#[unsafe(no_mangle)] pub extern \"C\" fn runlet_entry() -> i32 { ";

/// Installs a panic hook that prints the message and a captured backtrace,
/// then opens the panic boundary around the statements
pub const GUARD_OPEN: &str = "::std::panic::set_hook(::std::boxed::Box::new(|info| { \
    ::std::eprintln!(\"{}\\nstack backtrace:\\n{}\", info, ::std::backtrace::Backtrace::force_capture()); })); \
    match ::std::panic::catch_unwind(::std::panic::AssertUnwindSafe(|| { ";

/// Closes the panic boundary: status 0 when the statements finish, 1 when
/// one of them panicked (the hook has already printed the trace)
pub const GUARD_CLOSE: &str = " })) { \
    Ok(()) => { let _ = ::std::io::Write::flush(&mut ::std::io::stdout()); 0 } \
    Err(_) => { let _ = ::std::io::Write::flush(&mut ::std::io::stdout()); 1 } \
    } }";

/// A rendered unit, ready to be written and compiled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationUnit {
    name: &'static str,
    source: String,
}

impl CompilationUnit {
    pub fn name(&self) -> &str {
        self.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// File name the unit is written to
    pub fn file_name(&self) -> &'static str {
        SOURCE_FILE
    }

    /// Exported entry point name
    pub fn entry_symbol(&self) -> &'static str {
        ENTRY_SYMBOL
    }
}

impl std::fmt::Display for CompilationUnit {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

/// Import and statement buffers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceAssembler {
    imports: Vec<String>,
    statements: Vec<String>,
}

impl SourceAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_import(
        &mut self,
        text: impl Into<String>,
    ) {
        self.imports.push(text.into());
    }

    pub fn push_statement(
        &mut self,
        text: impl Into<String>,
    ) {
        self.statements.push(text.into());
    }

    pub fn imports(&self) -> &[String] {
        &self.imports
    }

    pub fn statements(&self) -> &[String] {
        &self.statements
    }

    pub fn is_empty(&self) -> bool {
        self.imports.is_empty() && self.statements.is_empty()
    }

    /// Empty both buffers
    pub fn clear(&mut self) {
        self.imports.clear();
        self.statements.clear();
    }

    /// Move the buffers out, leaving this assembler empty
    pub fn take(&mut self) -> SourceAssembler {
        std::mem::take(self)
    }

    /// Render the current buffers
    pub fn render(&self) -> CompilationUnit {
        let fragments = self.imports.iter().chain(&self.statements);
        let capacity = PREAMBLE.len()
            + GUARD_OPEN.len()
            + GUARD_CLOSE.len()
            + fragments.map(String::len).sum::<usize>();

        let mut source = String::with_capacity(capacity);
        for import in &self.imports {
            source.push_str(import);
        }
        source.push_str(PREAMBLE);
        source.push_str(GUARD_OPEN);
        for statement in &self.statements {
            source.push_str(statement);
        }
        source.push_str(GUARD_CLOSE);

        CompilationUnit {
            name: UNIT_NAME,
            source,
        }
    }
}
