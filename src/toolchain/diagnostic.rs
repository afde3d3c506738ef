//! Compile diagnostic summaries
//!
//! The compiler's stderr is redirected to a log file. Only a short,
//! single-line summary is extracted from it; the full log stays on disk
//! for callers that need more.
//!
//! # Contract
//!
//! 1. Take the first non-blank line of the log. None → no summary.
//! 2. Drop a leading source location (`path:line:col:`), as emitted by
//!    `--error-format short`. The path may contain spaces.
//! 3. Join the remaining tokens with single spaces. Nothing left → no summary.
//!
//! `None` is the only "no diagnostic available" signal.

use std::io::ErrorKind;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

/// Leading `path:line:col:`; the path may contain colons (Windows drives)
/// and spaces.
static LOCATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\S.*?:\d+:\d+:(?:\s+|$)").expect("location pattern is valid")
});

/// Summarize diagnostic log text.
pub fn summarize(log: &str) -> Option<String> {
    let line = log.lines().find(|line| !line.trim().is_empty())?;

    let rest = strip_location(line);
    let summary = rest.split_whitespace().collect::<Vec<_>>().join(" ");
    if summary.is_empty() {
        None
    } else {
        Some(summary)
    }
}

/// Summarize the log file at `path`.
///
/// A missing file yields `None`; other read failures are logged and also
/// yield `None`.
pub fn summarize_file(path: &Path) -> Option<String> {
    match std::fs::read(path) {
        Ok(bytes) => summarize(&String::from_utf8_lossy(&bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => {
            warn!("Cannot read diagnostic log {}: {}", path.display(), e);
            None
        }
    }
}

fn strip_location(line: &str) -> &str {
    match LOCATION.find(line) {
        Some(location) => &line[location.end()..],
        None => line,
    }
}
