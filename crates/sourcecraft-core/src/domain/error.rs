// ============================================================================
// domain/error.rs - COMPILE / GENERATE / MODULE ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (a failed generate is safe to retry with new bindings)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    // ========================================================================
    // Rule validation (raised before any tree is compiled)
    // ========================================================================
    #[error("literal rule for parameter '{template}' has an empty literal")]
    EmptyLiteral { template: String },

    #[error("'{name}' is not a valid parameter name")]
    InvalidParameterName { name: String },

    #[error("parameter '{name}' is bound to two literals: '{first}' and '{second}'")]
    DuplicateParameterName {
        name: String,
        first: String,
        second: String,
    },

    #[error("unknown case style '{0}'")]
    UnknownCaseStyle(String),

    // ========================================================================
    // Tree shape
    // ========================================================================
    #[error("invalid entry name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    // ========================================================================
    // Generation
    // ========================================================================
    #[error("missing parameter '{name}' required by '{path}'")]
    MissingParameter { name: String, path: String },

    #[error("two entries in '{path}' generate the same name '{name}'")]
    NameCollision { name: String, path: String },

    // ========================================================================
    // Persisted generator modules
    // ========================================================================
    #[error("malformed template: {reason}")]
    MalformedTemplate { reason: String },

    #[error("invalid generator module at '{path}': {reason}")]
    InvalidModule { path: String, reason: String },

    #[error("parameter list of '{path}' is [{declared}] but its entries require [{derived}]")]
    ParamMismatch {
        path: String,
        declared: String,
        derived: String,
    },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::EmptyLiteral { template } => vec![
                format!("Give the rule for '{}' a non-empty literal", template),
                "A literal is the exact text to replace, e.g. literal = \"my_app\"".into(),
            ],
            Self::InvalidParameterName { name } => vec![
                format!("'{}' cannot be used as a parameter name", name),
                "Use letters, digits, '_' or '$', not starting with a digit".into(),
                "Examples: app_name, entryType, $module".into(),
            ],
            Self::DuplicateParameterName {
                name,
                first,
                second,
            } => vec![
                format!("Only one literal may map to '{}'", name),
                format!("Rename the parameter for '{}' or for '{}'", first, second),
            ],
            Self::UnknownCaseStyle(_) => vec![
                "Supported case styles:".into(),
                "  • snake_case, camelCase, PascalCase, kebab-case".into(),
                "  • Title Case, SCREAMING_SNAKE_CASE, lowercase, UPPERCASE".into(),
            ],
            Self::MissingParameter { name, .. } => vec![
                format!("Provide a value for '{}'", name),
                format!("Example: --set {}=value", name),
                "List required parameters with: sourcecraft params <GENERATOR>".into(),
            ],
            Self::NameCollision { name, .. } => vec![
                format!("Several entries would be written as '{}'", name),
                "Choose parameter values that keep entry names distinct".into(),
            ],
            Self::InvalidName { reason, .. } => vec![
                format!("Entry names must be plain file names ({})", reason),
                "Parameter values used in names must not contain '/' or '\\'".into(),
            ],
            Self::MalformedTemplate { .. }
            | Self::InvalidModule { .. }
            | Self::ParamMismatch { .. } => vec![
                "The generator module looks hand-edited or corrupted".into(),
                "Recompile it with: sourcecraft compile <SOURCE> <OUTPUT>".into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::EmptyLiteral { .. }
            | Self::InvalidParameterName { .. }
            | Self::DuplicateParameterName { .. }
            | Self::UnknownCaseStyle(_)
            | Self::InvalidName { .. }
            | Self::NameCollision { .. } => ErrorCategory::Validation,
            Self::MissingParameter { .. } => ErrorCategory::Validation,
            Self::MalformedTemplate { .. }
            | Self::InvalidModule { .. }
            | Self::ParamMismatch { .. } => ErrorCategory::Corrupt,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Corrupt,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_parameter_names_the_key() {
        let err = DomainError::MissingParameter {
            name: "app_name".into(),
            path: "src/main.rs".into(),
        };
        assert!(err.to_string().contains("'app_name'"));
        assert!(err.to_string().contains("src/main.rs"));
        assert!(err.suggestions().iter().any(|s| s.contains("--set app_name=")));
    }

    #[test]
    fn duplicate_parameter_mentions_both_literals() {
        let err = DomainError::DuplicateParameterName {
            name: "a".into(),
            first: "foo".into(),
            second: "bar".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("foo") && msg.contains("bar"));
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn module_errors_are_corrupt() {
        let err = DomainError::InvalidModule {
            path: ".".into(),
            reason: "missing index".into(),
        };
        assert_eq!(err.category(), ErrorCategory::Corrupt);
    }
}
