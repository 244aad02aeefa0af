//! Target list assembly.
//!
//! Targets come from explicit URLs, a single target, a list file, or piped
//! text. Lines are trimmed and blank lines are skipped; no other validation
//! happens here, so malformed URLs surface later as per-target errors.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Errors raised while assembling the target list.
#[derive(Debug, Error)]
pub enum TargetError {
    /// No source produced a single target.
    #[error("no targets specified: pass -u/--urls, -t/--target, -l/--list, or pipe URLs on stdin")]
    NoTargetsSpecified,

    /// The target list file could not be read.
    #[error("failed to read target list {path}: {source}")]
    Io {
        /// The list file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// Where targets come from, in concatenation order.
#[derive(Debug, Clone, Default)]
pub struct TargetSources {
    /// URLs given directly.
    pub urls: Vec<String>,
    /// A single extra target.
    pub target: Option<String>,
    /// A file with one target per line.
    pub list: Option<PathBuf>,
    /// Text piped on stdin, one target per line.
    pub stdin: Option<String>,
}

/// Splits text into targets, one per line, skipping blank lines.
#[must_use]
pub fn parse_target_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Reads a target list file.
///
/// # Errors
///
/// Returns [`TargetError::Io`] if the file cannot be read.
pub fn load_target_file(path: &Path) -> Result<Vec<String>, TargetError> {
    let text = fs::read_to_string(path).map_err(|source| TargetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let targets = parse_target_lines(&text);
    debug!(path = %path.display(), targets = targets.len(), "loaded target list");
    Ok(targets)
}

/// Concatenates all sources into one target list.
///
/// Duplicates are kept; each occurrence is probed and reported.
///
/// # Errors
///
/// Returns [`TargetError::Io`] if the list file cannot be read, or
/// [`TargetError::NoTargetsSpecified`] if the combined list is empty.
pub fn collect_targets(sources: &TargetSources) -> Result<Vec<String>, TargetError> {
    let mut targets: Vec<String> = sources
        .urls
        .iter()
        .map(|url| url.trim())
        .filter(|url| !url.is_empty())
        .map(ToString::to_string)
        .collect();

    if let Some(target) = sources.target.as_deref().map(str::trim)
        && !target.is_empty()
    {
        targets.push(target.to_string());
    }

    if let Some(path) = &sources.list {
        targets.extend(load_target_file(path)?);
    }

    if let Some(text) = &sources.stdin {
        targets.extend(parse_target_lines(text));
    }

    if targets.is_empty() {
        return Err(TargetError::NoTargetsSpecified);
    }
    Ok(targets)
}
