//! Unified error handling for SourceCraft Core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with rich context and user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for SourceCraft Core operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CraftError {
    /// Errors from the domain layer (bad rules, templates, generators).
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (filesystem, paths).
    #[error("Application error: {0}")]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl CraftError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Check your config file and SOURCECRAFT__* variables".into(),
            ],
            Self::Internal { .. } => vec!["This appears to be a bug in SourceCraft".into()],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Corrupt => ErrorCategory::Corrupt,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    /// A stored generator module is damaged or was edited by hand.
    Corrupt,
    NotFound,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type CraftResult<T> = Result<T, CraftError>;

/// Extension trait for adding context to foreign errors.
pub trait Context<T> {
    fn context(self, msg: impl Into<String>) -> CraftResult<T>;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> CraftResult<T> {
        self.map_err(|e| CraftError::Internal {
            message: format!("{}: {}", msg.into(), e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn categories_follow_the_wrapped_error() {
        let domain: CraftError = DomainError::EmptyLiteral {
            template: "app".into(),
        }
        .into();
        assert_eq!(domain.category(), ErrorCategory::Validation);

        let corrupt: CraftError = DomainError::InvalidModule {
            path: "src".into(),
            reason: "missing index".into(),
        }
        .into();
        assert_eq!(corrupt.category(), ErrorCategory::Corrupt);

        let missing: CraftError = ApplicationError::NotFound {
            path: PathBuf::from("/x"),
        }
        .into();
        assert_eq!(missing.category(), ErrorCategory::NotFound);
    }

    #[test]
    fn context_wraps_foreign_errors_as_internal() {
        let parsed: Result<u8, _> = "300".parse::<u8>();
        let err = parsed.context("reading format").unwrap_err();
        assert!(matches!(err, CraftError::Internal { .. }));
        assert!(err.to_string().contains("reading format"));
    }
}
