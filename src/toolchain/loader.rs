//! Dynamic loader and invoker
//!
//! A compiled unit is a shared library exporting one entry point with a
//! fixed C signature. Before opening, the library is copied to a uniquely
//! named staging file: the unit name never changes between runs, and the
//! platform loader would otherwise hand back the previously mapped image.

use std::fs;
use std::path::{Path, PathBuf};

use libloading::Library;
use tempfile::TempPath;
use tracing::debug;

use crate::toolchain::error::{InvokeError, LoadError};

/// Exported name of the entry point in every generated unit
pub const ENTRY_SYMBOL: &str = "runlet_entry";

/// Signature of the entry point
pub type EntryFn = unsafe extern "C" fn() -> i32;

/// How the entry point finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    /// Every statement ran
    Completed,
    /// A statement panicked; the unit caught it and printed the trace
    Panicked,
}

impl EntryStatus {
    /// Map the entry point's return value
    pub fn from_code(code: i32) -> Result<Self, InvokeError> {
        match code {
            0 => Ok(EntryStatus::Completed),
            1 => Ok(EntryStatus::Panicked),
            other => Err(InvokeError::UnexpectedStatus(other)),
        }
    }
}

/// Loads compiled units from one output directory.
#[derive(Debug, Clone)]
pub struct Loader {
    output_dir: PathBuf,
}

impl Loader {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Platform-specific artifact path for `unit_name`
    pub fn library_path(
        &self,
        unit_name: &str,
    ) -> PathBuf {
        self.output_dir.join(libloading::library_filename(unit_name))
    }

    /// Load the unit named `unit_name`, with the output directory as the only search root.
    pub fn load(
        &self,
        unit_name: &str,
    ) -> Result<LoadedUnit, LoadError> {
        Self::load_path(&self.library_path(unit_name), unit_name)
    }

    /// Load the library at `path` as `unit_name`; the staging copy goes
    /// beside it.
    pub fn load_path(
        path: &Path,
        unit_name: &str,
    ) -> Result<LoadedUnit, LoadError> {
        if !path.is_file() {
            return Err(LoadError::Missing(path.to_path_buf()));
        }

        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let staged = stage(path, dir, unit_name)?;
        debug!("Loading {} from {}", unit_name, staged.display());

        // SAFETY: the library was produced by our own compile step from a
        // generated unit whose only initializers are those of std.
        let library = unsafe { Library::new(staged.as_os_str()) }?;

        Ok(LoadedUnit {
            name: unit_name.to_string(),
            library,
            staged,
        })
    }
}

fn stage(
    path: &Path,
    dir: &Path,
    unit_name: &str,
) -> Result<TempPath, LoadError> {
    let file = tempfile::Builder::new()
        .prefix(&format!("{unit_name}-"))
        .suffix(std::env::consts::DLL_SUFFIX)
        .tempfile_in(dir)
        .map_err(LoadError::Stage)?;
    let staged = file.into_temp_path();
    fs::copy(path, &staged).map_err(LoadError::Stage)?;
    Ok(staged)
}

/// A unit opened by the dynamic loader.
///
/// Field order matters: the library is closed before its staging file is removed.
#[derive(Debug)]
pub struct LoadedUnit {
    name: String,
    library: Library,
    staged: TempPath,
}

impl LoadedUnit {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path the library was actually opened from
    pub fn staged_path(&self) -> &Path {
        &self.staged
    }

    /// Look up `symbol` and call it as an [`EntryFn`].
    pub fn invoke(
        &self,
        symbol: &str,
    ) -> Result<EntryStatus, InvokeError> {
        // SAFETY: every exported entry point of a generated unit has the
        // `EntryFn` signature.
        let entry: EntryFn = unsafe {
            *self
                .library
                .get::<EntryFn>(symbol.as_bytes())
                .map_err(|_| InvokeError::MethodNotFound(symbol.to_string()))?
        };

        debug!("Invoking {}::{}", self.name, symbol);
        // SAFETY: the entry point takes no arguments and catches panics
        // before they reach the C ABI boundary.
        let code = unsafe { entry() };
        EntryStatus::from_code(code)
    }

    /// Invoke [`ENTRY_SYMBOL`]
    pub fn invoke_entry(&self) -> Result<EntryStatus, InvokeError> {
        self.invoke(ENTRY_SYMBOL)
    }
}
