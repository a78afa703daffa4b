//! Errors surfaced by the `sourcecraft` binary.
//!
//! Everything the commands can fail with ends up as a [`CliError`], which
//! knows its exit code, a few hints for the user, and how to print itself.

use std::error::Error as _;

use owo_colors::OwoColorize;
use thiserror::Error;

use sourcecraft_core::error::{CraftError, ErrorCategory as CoreCategory};

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// Malformed `--rule` / `--set` values, unreadable answers, bad paths.
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A configuration file could not be read, parsed, or written.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("{0}")]
    Core(#[from] CraftError),

    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Operation cancelled")]
    Cancelled,

    /// A cargo feature this build was compiled without.
    #[error("Feature not available: {feature}")]
    FeatureNotAvailable { feature: &'static str },
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

/// How an error is classified for exit codes and log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad arguments, invalid rules, missing parameters, damaged generators.
    UserError,
    NotFound,
    Configuration,
    Internal,
}

impl ErrorCategory {
    /// | Category      | Code |
    /// |---------------|------|
    /// | User error    |  2   |
    /// | Not found     |  3   |
    /// | Configuration |  4   |
    /// | Internal      |  1   |
    pub fn exit_code(self) -> u8 {
        match self {
            Self::UserError => 2,
            Self::NotFound => 3,
            Self::Configuration => 4,
            Self::Internal => 1,
        }
    }
}

impl CliError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            source: None,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
            source: None,
        }
    }

    /// Hints printed under the error message.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { .. } => vec!["Run with --help for usage".into()],
            Self::ConfigError { .. } => vec![
                "Show the config location with: sourcecraft config path".into(),
                "Write a default config with: sourcecraft init --force".into(),
            ],
            Self::Core(err) => err.suggestions(),
            Self::IoError { .. } => vec!["Check file permissions and free space".into()],
            Self::Cancelled => vec!["No changes were made".into()],
            Self::FeatureNotAvailable { feature } => vec![format!(
                "Reinstall with: cargo install sourcecraft-cli --features {feature}"
            )],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } | Self::Cancelled => ErrorCategory::UserError,
            Self::ConfigError { .. } | Self::FeatureNotAvailable { .. } => {
                ErrorCategory::Configuration
            }
            Self::Core(err) => match err.category() {
                CoreCategory::Validation | CoreCategory::Corrupt => ErrorCategory::UserError,
                CoreCategory::NotFound => ErrorCategory::NotFound,
                CoreCategory::Configuration => ErrorCategory::Configuration,
                CoreCategory::Internal => ErrorCategory::Internal,
            },
            Self::IoError { .. } => ErrorCategory::Internal,
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.category().exit_code()
    }

    /// Message, cause chain (when `verbose`), and suggestions, ready for
    /// stderr. `color` switches ANSI styling on.
    pub fn render(&self, verbose: bool, color: bool) -> String {
        let paint = |text: String, style: fn(&str) -> String| {
            if color { style(&text) } else { text }
        };

        let mut lines = vec![
            String::new(),
            paint(format!("Error: {self}"), |s| s.red().bold().to_string()),
        ];

        if verbose {
            let mut cause = self.source();
            while let Some(err) = cause {
                lines.push(paint(format!("  Caused by: {err}"), |s| s.dimmed().to_string()));
                cause = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            lines.push(String::new());
            lines.push(paint("Suggestions:".into(), |s| s.yellow().bold().to_string()));
            lines.extend(suggestions.iter().map(|s| format!("  {s}")));
        }

        if !verbose {
            lines.push(String::new());
            lines.push(paint(
                "Use -v / --verbose for more details.".into(),
                |s| s.dimmed().to_string(),
            ));
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    pub fn log(&self) {
        match self.category() {
            ErrorCategory::UserError | ErrorCategory::NotFound => {
                tracing::warn!(code = self.exit_code(), "{self}")
            }
            ErrorCategory::Configuration | ErrorCategory::Internal => {
                tracing::error!(code = self.exit_code(), "{self}")
            }
        }
        if let Some(source) = self.source() {
            tracing::debug!("caused by: {source}");
        }
    }
}

/// Attach a context message while converting into [`CliError`].
pub trait IntoCli<T> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IntoCli<T> for Result<T, std::io::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::IoError {
            message: f().into(),
            source: e,
        })
    }
}

/// `--rule` / `--set` parse failures from the adapters come back as strings.
impl<T> IntoCli<T> for Result<T, String> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::invalid_input(format!("{}: {e}", f().into())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sourcecraft_core::{application::ApplicationError, domain::DomainError};
    use std::io;
    use std::path::PathBuf;

    fn missing_parameter() -> CliError {
        CliError::Core(
            DomainError::MissingParameter {
                name: "app".into(),
                path: "src/app.rs".into(),
            }
            .into(),
        )
    }

    #[test]
    fn core_suggestions_pass_through() {
        assert!(missing_parameter().suggestions().iter().any(|s| s.contains("--set")));
    }

    #[test]
    fn feature_suggestion_names_the_feature() {
        let err = CliError::FeatureNotAvailable {
            feature: "interactive",
        };
        assert!(err.suggestions().iter().any(|s| s.contains("--features interactive")));
    }

    #[test]
    fn exit_codes_by_category() {
        assert_eq!(CliError::invalid_input("x").exit_code(), 2);
        assert_eq!(missing_parameter().exit_code(), 2);
        assert_eq!(CliError::config("x").exit_code(), 4);
        assert_eq!(
            CliError::Core(
                ApplicationError::NotFound {
                    path: PathBuf::from("/nope"),
                }
                .into(),
            )
            .exit_code(),
            3
        );
        assert_eq!(CliError::from(io::Error::other("e")).exit_code(), 1);
    }

    #[test]
    fn corrupt_generator_is_a_user_error() {
        let err = CliError::Core(
            DomainError::InvalidModule {
                path: ".".into(),
                reason: "missing _generator.toml".into(),
            }
            .into(),
        );
        assert_eq!(err.category(), ErrorCategory::UserError);
    }

    #[test]
    fn plain_render_has_message_and_hints() {
        let s = CliError::invalid_input("expected LITERAL=PARAM").render(false, false);
        assert!(s.contains("Error: Invalid input: expected LITERAL=PARAM"));
        assert!(s.contains("Suggestions:"));
        assert!(s.contains("--verbose"));
        assert!(!s.contains('\u{1b}'));
    }

    #[test]
    fn verbose_render_shows_causes_and_drops_hint() {
        let err = CliError::IoError {
            message: "writing config".into(),
            source: io::Error::other("read-only filesystem"),
        };
        let s = err.render(true, false);
        assert!(s.contains("Caused by: read-only filesystem"));
        assert!(!s.contains("--verbose"));
    }

    #[test]
    fn string_errors_become_invalid_input() {
        let result: Result<(), String> = Err("expected KEY=VALUE".into());
        let cli = result.with_cli_context(|| "--set");
        assert!(matches!(
            cli,
            Err(CliError::InvalidInput { ref message, .. }) if message == "--set: expected KEY=VALUE"
        ));
    }

    #[test]
    fn io_errors_keep_their_context() {
        let result: Result<(), io::Error> = Err(io::Error::new(io::ErrorKind::NotFound, "missing"));
        let cli = result.with_cli_context(|| "reading values file");
        assert!(matches!(cli, Err(CliError::IoError { ref message, .. }) if message == "reading values file"));
    }
}
