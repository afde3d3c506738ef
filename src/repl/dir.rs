//! Output directory validation

use std::path::{Path, PathBuf};

use rustyline::DefaultEditor;
use thiserror::Error;

/// Why a directory cannot hold generated units
#[derive(Debug, Error)]
pub enum OutputDirError {
    #[error("Invalid file location: {0} does not exist")]
    Missing(PathBuf),

    #[error("Invalid file location: {0} is not a directory")]
    NotADirectory(PathBuf),

    #[error("Invalid file location: {path} is not writable ({source})")]
    NotWritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Check that `path` is an existing, writable directory and return it as an
/// absolute path.
pub fn validate_output_dir(path: &Path) -> Result<PathBuf, OutputDirError> {
    if !path.exists() {
        return Err(OutputDirError::Missing(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(OutputDirError::NotADirectory(path.to_path_buf()));
    }

    // Permission bits lie on some filesystems; creating a file does not.
    tempfile::tempfile_in(path).map_err(|source| OutputDirError::NotWritable {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf()))
}

/// Ask the user for an output directory on the terminal
pub fn prompt_output_dir() -> anyhow::Result<PathBuf> {
    let mut editor = DefaultEditor::new()?;
    let line = editor.readline(
        "Enter a valid temporary file directory (that you have access permissions for): ",
    )?;
    Ok(validate_output_dir(Path::new(line.trim()))?)
}
