//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `SOURCECRAFT__<SECTION>__<KEY>`, lists
//!    comma-separated (`SOURCECRAFT__IGNORE__PATTERNS=dist/,*.log`)
//! 3. Config file (`--config`, else the platform config directory)
//! 4. Built-in defaults (always present)

use std::path::PathBuf;

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CliError, CliResult};

const ENV_PREFIX: &str = "SOURCECRAFT";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// What `compile` skips when reading the source directory.
    pub ignore: IgnoreConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IgnoreConfig {
    /// Files read as `.gitignore`-style rules in every directory.
    pub file_names: Vec<String>,
    /// Patterns applied from the source root down.
    pub patterns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    /// `auto`, `human`, `plain` or `json`.
    pub format: String,
}

impl Default for IgnoreConfig {
    fn default() -> Self {
        Self {
            file_names: vec![".gitignore".into()],
            patterns: vec![".git/".into()],
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, file and environment.
    ///
    /// A file named with `--config` must exist; the default location is
    /// optional.
    pub fn load(config_file: Option<&PathBuf>) -> CliResult<Self> {
        let defaults = Config::try_from(&Self::default()).map_err(config_error)?;

        let (path, required) = match config_file {
            Some(path) => (path.clone(), true),
            None => (Self::config_path(), false),
        };
        debug!(path = %path.display(), required, "loading configuration");

        Config::builder()
            .add_source(defaults)
            .add_source(File::from(path.as_path()).format(FileFormat::Toml).required(required))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("ignore.file_names")
                    .with_list_parse_key("ignore.patterns")
                    .try_parsing(true),
            )
            .build()
            .and_then(|merged| merged.try_deserialize::<Self>())
            .map_err(config_error)
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.sourcecraft.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "sourcecraft", "sourcecraft")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".sourcecraft.toml"))
    }
}

fn config_error(e: config::ConfigError) -> CliError {
    CliError::ConfigError {
        message: e.to_string(),
        source: Some(Box::new(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_ignores_git_directory() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.ignore.patterns, vec![".git/"]);
        assert_eq!(cfg.ignore.file_names, vec![".gitignore"]);
    }

    #[test]
    fn default_no_color_is_false() {
        assert!(!AppConfig::default().output.no_color);
    }

    #[test]
    fn file_values_override_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom.conf");
        std::fs::write(&path, "[ignore]\npatterns = [\"dist/\"]\n").unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.ignore.patterns, vec!["dist/"]);
        assert_eq!(cfg.ignore.file_names, vec![".gitignore"]);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let missing = PathBuf::from("/definitely/not/here.toml");
        assert!(matches!(
            AppConfig::load(Some(&missing)),
            Err(CliError::ConfigError { .. })
        ));
    }

    #[test]
    fn config_path_is_not_empty() {
        let p = AppConfig::config_path();
        assert!(!p.as_os_str().is_empty());
    }
}
