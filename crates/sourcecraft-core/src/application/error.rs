//! Application layer errors.
//!
//! These errors represent failures in orchestration and I/O, not in the
//! compile / generate logic. Those are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while moving trees between disk and memory.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApplicationError {
    /// A filesystem operation failed. No retry or rollback is attempted; a
    /// write that fails midway can leave the target partially updated.
    #[error("Filesystem error at {path}: failed to {operation}: {reason}")]
    FilesystemError {
        path: PathBuf,
        operation: &'static str,
        reason: String,
    },

    /// A path that must exist does not.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// A path exists but is the wrong kind (file vs directory).
    #[error("Expected a directory at {path}")]
    NotADirectory { path: PathBuf },

    /// An ignore pattern or ignore file could not be parsed.
    #[error("Invalid ignore pattern '{pattern}': {reason}")]
    InvalidIgnorePattern { pattern: String, reason: String },

    /// Input and output directories overlap; writing would clobber the input.
    #[error("Output {output} overlaps input {input}")]
    OverlappingPaths { input: PathBuf, output: PathBuf },

    /// In-memory adapter state was poisoned by a panicking writer.
    #[error("Filesystem state lock poisoned")]
    LockPoisoned,
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::FilesystemError { path, operation, .. } => vec![
                format!("Failed to {}: {}", operation, path.display()),
                "Check that you have the required permissions".into(),
                "The output directory may be partially updated; re-run to converge".into(),
            ],
            Self::NotFound { path } => vec![
                format!("Nothing exists at {}", path.display()),
                "Check the path for typos".into(),
            ],
            Self::NotADirectory { path } => vec![
                format!("{} is a file", path.display()),
                "Point the command at a directory".into(),
            ],
            Self::InvalidIgnorePattern { pattern, .. } => vec![
                format!("Fix or remove the pattern '{}'", pattern),
                "Patterns use .gitignore syntax, e.g. target/ or *.log".into(),
            ],
            Self::OverlappingPaths { .. } => vec![
                "Writing the output would delete or rewrite the input".into(),
                "Choose an output directory outside the input directory".into(),
            ],
            Self::LockPoisoned => vec!["This is a bug, please report it".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FilesystemError { .. } | Self::LockPoisoned => ErrorCategory::Internal,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::NotADirectory { .. }
            | Self::InvalidIgnorePattern { .. }
            | Self::OverlappingPaths { .. } => ErrorCategory::Validation,
        }
    }
}
