//! Loader for parameter values.
//!
//! A values file is a flat TOML table. Strings are taken as-is; numbers and
//! booleans are converted to their TOML text.
//!
//! ```toml
//! app_name = "shop"
//! entry = "order"
//! ```

use std::fs;
use std::path::Path;

use sourcecraft_core::{
    application::ApplicationError,
    domain::Bindings,
    error::{CraftError, CraftResult},
};
use toml::{Table, Value};
use tracing::instrument;

/// Read bindings from the TOML file at `path`.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_values(path: &Path) -> CraftResult<Bindings> {
    let raw = fs::read_to_string(path).map_err(|e| ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        operation: "read values file",
        reason: e.to_string(),
    })?;
    parse_values(&raw).map_err(|message| CraftError::Configuration {
        message: format!("failed to parse '{}': {message}", path.display()),
    })
}

fn parse_values(raw: &str) -> Result<Bindings, String> {
    let table: Table = toml::from_str(raw).map_err(|e| e.to_string())?;
    let mut bindings = Bindings::new();
    for (key, value) in table {
        let text = match value {
            Value::String(s) => s,
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Boolean(b) => b.to_string(),
            other => {
                return Err(format!(
                    "value of '{key}' must be a string, got {}",
                    other.type_str()
                ));
            }
        };
        bindings.insert(key, text);
    }
    Ok(bindings)
}

/// Parse a `KEY=VALUE` command-line binding. Splits on the first `=`, so
/// values may contain `=`.
pub fn parse_set_arg(arg: &str) -> Result<(String, String), String> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{arg}'"))?;
    Ok((key.trim().to_string(), value.to_string()))
}
