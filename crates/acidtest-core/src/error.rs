//! Error taxonomy.
//!
//! Every failure mode is a typed value, not a thrown control-flow event.
//! Only [`AcidError::Input`] is fatal to a scan; every other variant is
//! recorded as a warning or a finding and the scan continues.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AcidError>;

/// Top-level error taxonomy for the scanning kernel.
#[derive(Debug, Error)]
pub enum AcidError {
    /// The bundle path does not exist, isn't a directory, or carries no
    /// recognizable manifest. Fatal: the scan cannot identify a bundle to
    /// analyze at all.
    #[error("cannot load bundle at {path}: {reason}")]
    Input { path: PathBuf, reason: String },

    /// A code file failed to parse. Non-fatal: surfaced as a MEDIUM
    /// `parse-error` finding attached to that file.
    #[error("failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    /// A pattern bundle failed schema or semantic validation. Non-fatal:
    /// that category's patterns are absent for the run.
    #[error("pattern bundle {category} invalid: {reason}")]
    PatternLoad { category: String, reason: String },

    /// The `.acidtest.json` config file failed to parse. Non-fatal: the
    /// scan proceeds with default configuration.
    #[error("config file invalid: {reason}")]
    Config { reason: String },

    /// A single code file could not be read from disk. Non-fatal: the
    /// file is omitted from the code file list.
    #[error("cannot read {path}: {reason}")]
    Io { path: PathBuf, reason: String },
}

impl AcidError {
    pub fn input(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Input { path: path.into(), reason: reason.into() }
    }

    pub fn parse(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Parse { path: path.into(), reason: reason.into() }
    }

    pub fn pattern_load(category: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::PatternLoad { category: category.into(), reason: reason.into() }
    }

    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config { reason: reason.into() }
    }

    pub fn io(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Io { path: path.into(), reason: reason.into() }
    }

    /// Whether this error aborts the whole scan or is recoverable at the
    /// point it was raised.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AcidError::Input { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_input_errors_are_fatal() {
        assert!(AcidError::input("/nowhere", "missing").is_fatal());
        assert!(!AcidError::parse("a.js", "unexpected token").is_fatal());
        assert!(!AcidError::pattern_load("secrets", "bad regex").is_fatal());
        assert!(!AcidError::config("not json").is_fatal());
        assert!(!AcidError::io("a.py", "permission denied").is_fatal());
    }
}
