//! Compiler driver
//!
//! Writes generated sources into the output directory, runs `rustc` on them
//! and keeps the compiler's stderr in `error.log` beside the source.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::toolchain::diagnostic;
use crate::toolchain::error::{ToolchainError, ToolchainResult};
use crate::util::config::{ToolchainConfig, RUSTC_ENV};

/// Diagnostic log file name, truncated on every compile
pub const ERROR_LOG: &str = "error.log";

/// Result of one compiler invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledArtifact {
    /// Source file that was compiled
    pub source_path: PathBuf,
    /// Whether the compiler exited with status zero
    pub succeeded: bool,
    /// Where the compiler's stderr went
    pub diagnostic_log_path: PathBuf,
    /// Where the shared library is expected to be
    pub library_path: PathBuf,
}

/// Drives the external compiler against files in one output directory.
#[derive(Debug, Clone)]
pub struct CompilerDriver {
    output_dir: PathBuf,
    toolchain: ToolchainConfig,
}

impl CompilerDriver {
    /// Create a driver writing into `output_dir`
    pub fn new(
        output_dir: impl Into<PathBuf>,
        toolchain: ToolchainConfig,
    ) -> Self {
        Self {
            output_dir: output_dir.into(),
            toolchain,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn set_output_dir(
        &mut self,
        output_dir: impl Into<PathBuf>,
    ) {
        self.output_dir = output_dir.into();
    }

    /// Path of the diagnostic log in the current output directory
    pub fn log_path(&self) -> PathBuf {
        self.output_dir.join(ERROR_LOG)
    }

    /// Write `content` to `output_dir/relative_path`, replacing any existing file.
    ///
    /// Missing directories inside `relative_path` are created; the output
    /// directory itself must already exist.
    pub fn create_source_file(
        &self,
        relative_path: impl AsRef<Path>,
        content: &str,
    ) -> ToolchainResult<PathBuf> {
        let relative_path = relative_path.as_ref();
        if !fs::metadata(&self.output_dir)?.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("{} is not a directory", self.output_dir.display()),
            )
            .into());
        }

        let path = self.output_dir.join(relative_path);
        if let Some(parent) = relative_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(self.output_dir.join(parent))?;
        }
        fs::write(&path, content)?;
        debug!("Wrote {} bytes to {}", content.len(), path.display());
        Ok(path)
    }

    /// Compile `source` into a shared library next to it.
    ///
    /// A non-zero compiler exit is reported through
    /// [`CompiledArtifact::succeeded`], not as an error.
    pub fn compile(
        &self,
        source: &Path,
    ) -> ToolchainResult<CompiledArtifact> {
        let program = self.resolve_rustc()?;
        let out_dir = source
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.output_dir.clone());
        let crate_name = crate_name_for(source);
        let log_path = self.log_path();
        let log = File::create(&log_path)?;

        let mut cmd = Command::new(&program);
        cmd.arg("--crate-type")
            .arg("cdylib")
            .arg("--crate-name")
            .arg(&crate_name)
            .arg("--edition")
            .arg(&self.toolchain.edition)
            .arg("--error-format")
            .arg(self.toolchain.error_format.as_arg())
            .arg("-C")
            .arg(format!("opt-level={}", self.toolchain.opt_level))
            .arg("-A")
            .arg("warnings")
            .arg("--out-dir")
            .arg(&out_dir)
            .args(&self.toolchain.extra_args)
            .arg(source)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::from(log));

        debug!("Running {:?}", cmd);
        let status = cmd.status().map_err(|source| ToolchainError::Spawn {
            program: program.clone(),
            source,
        })?;
        info!("{} finished with {}", program.display(), status);

        Ok(CompiledArtifact {
            source_path: source.to_path_buf(),
            succeeded: status.success(),
            diagnostic_log_path: log_path,
            library_path: out_dir.join(libloading::library_filename(&crate_name)),
        })
    }

    /// One-line summary of the last compile's diagnostics
    pub fn compile_error(&self) -> Option<String> {
        diagnostic::summarize_file(&self.log_path())
    }

    /// Compiler to run: config, then `RUNLET_RUSTC`, then `rustc` on PATH.
    pub fn resolve_rustc(&self) -> ToolchainResult<PathBuf> {
        if let Some(rustc) = &self.toolchain.rustc {
            return Ok(rustc.clone());
        }
        if let Some(rustc) = std::env::var_os(RUSTC_ENV).filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(rustc));
        }
        which::which("rustc").map_err(|e| ToolchainError::NotFound(e.to_string()))
    }
}

/// rustc crate name derived from the source file stem
fn crate_name_for(source: &Path) -> String {
    source
        .file_stem()
        .map(|stem| stem.to_string_lossy().replace('-', "_"))
        .unwrap_or_else(|| "runner".to_string())
}
