//! Runlet configuration system
//!
//! # Configuration hierarchy
//!
//! ```text
//! Priority (high → low):
//! 1. CLI arguments
//! 2. Environment variables (RUNLET_RUSTC)
//! 3. User-level (~/.config/runlet/config.toml)
//! 4. Default values
//! ```
//!
//! # Usage
//!
//! ```rust
//! use runlet::util::config::parse_config;
//!
//! let config = parse_config("[toolchain]\nopt_level = \"2\"").unwrap();
//! assert_eq!(config.toolchain.opt_level, "2");
//! assert_eq!(config.toolchain.edition, "2021");
//! ```

use serde::Deserialize;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the compiler path
pub const RUSTC_ENV: &str = "RUNLET_RUSTC";

/// User-level configuration for Runlet
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct RunletConfig {
    /// Compiler settings
    #[serde(default)]
    pub toolchain: ToolchainConfig,
    /// REPL settings
    #[serde(default)]
    pub repl: ReplConfig,
    /// Session settings
    #[serde(default)]
    pub session: SessionConfig,
}

impl RunletConfig {
    /// Layer environment variables over the file settings
    pub fn apply_env(&mut self) {
        self.apply_rustc_override(std::env::var_os(RUSTC_ENV));
    }

    fn apply_rustc_override(
        &mut self,
        value: Option<OsString>,
    ) {
        if let Some(rustc) = value.filter(|v| !v.is_empty()) {
            self.toolchain.rustc = Some(PathBuf::from(rustc));
        }
    }
}

/// How rustc reports diagnostics into the log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ErrorFormat {
    /// One line per diagnostic, prefixed with `path:line:col:`
    #[default]
    Short,
    /// rustc's multi-line human format
    Human,
}

impl ErrorFormat {
    /// Value passed to `--error-format`
    pub fn as_arg(&self) -> &'static str {
        match self {
            ErrorFormat::Short => "short",
            ErrorFormat::Human => "human",
        }
    }
}

/// Toolchain configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ToolchainConfig {
    /// Explicit compiler path
    #[serde(default)]
    pub rustc: Option<PathBuf>,
    /// Edition the generated unit is compiled with
    #[serde(default = "default_edition")]
    pub edition: String,
    /// `-C opt-level`
    #[serde(default = "default_opt_level")]
    pub opt_level: String,
    /// Diagnostic format written to the log
    #[serde(default)]
    pub error_format: ErrorFormat,
    /// Extra arguments appended before the source path
    #[serde(default)]
    pub extra_args: Vec<String>,
}

fn default_edition() -> String {
    "2021".to_string()
}

fn default_opt_level() -> String {
    "0".to_string()
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            rustc: None,
            edition: default_edition(),
            opt_level: default_opt_level(),
            error_format: ErrorFormat::default(),
            extra_args: Vec::new(),
        }
    }
}

/// REPL configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ReplConfig {
    /// History size
    #[serde(default = "default_history_size")]
    pub history_size: usize,
    /// History file path
    #[serde(default)]
    pub history_file: Option<PathBuf>,
    /// Prompt string
    #[serde(default = "default_prompt")]
    pub prompt: String,
    /// Colored diagnostics
    #[serde(default = "default_colors")]
    pub colors: bool,
}

fn default_history_size() -> usize {
    1000
}

fn default_prompt() -> String {
    "runlet> ".to_string()
}

fn default_colors() -> bool {
    true
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            history_size: default_history_size(),
            history_file: None,
            prompt: default_prompt(),
            colors: default_colors(),
        }
    }
}

impl ReplConfig {
    /// History file with a leading `~` expanded to the home directory
    pub fn history_path(&self) -> Option<PathBuf> {
        let path = self.history_file.as_deref()?;
        Some(expand_home(path, std::env::var_os("HOME")))
    }
}

fn expand_home(
    path: &Path,
    home: Option<OsString>,
) -> PathBuf {
    match (path.strip_prefix("~"), home) {
        (Ok(rest), Some(home)) => PathBuf::from(home).join(rest),
        _ => path.to_path_buf(),
    }
}

/// Session configuration
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct SessionConfig {
    /// Directory for generated sources, artifacts and the diagnostic log
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

/// Get the user config directory
pub fn get_config_dir() -> Option<PathBuf> {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg_config).join("runlet"));
    }

    if let Ok(home) = std::env::var("HOME") {
        return Some(PathBuf::from(home).join(".config").join("runlet"));
    }

    if let Ok(appdata) = std::env::var("APPDATA") {
        return Some(PathBuf::from(appdata).join("runlet"));
    }

    None
}

/// Get the user config file path (~/.config/runlet/config.toml)
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join("config.toml"))
}

/// Parse configuration text
pub fn parse_config(content: &str) -> Result<RunletConfig, ConfigError> {
    toml::from_str(content).map_err(ConfigError::ParseError)
}

/// Load user-level configuration
/// Returns default config if file doesn't exist
pub fn load_user_config() -> Result<RunletConfig, ConfigError> {
    let path = match get_config_path() {
        Some(p) => p,
        None => return Ok(RunletConfig::default()),
    };

    if !path.exists() {
        return Ok(RunletConfig::default());
    }

    let content = fs::read_to_string(&path).map_err(ConfigError::IoError)?;
    parse_config(&content)
}

/// Configuration errors
#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    ParseError(toml::de::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::ParseError(e) => write!(f, "Config parse error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}
