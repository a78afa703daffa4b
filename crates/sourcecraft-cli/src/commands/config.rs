//! `sourcecraft config`: inspect the resolved configuration.

use crate::{
    cli::ConfigCommands,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(cmd: ConfigCommands, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let table = to_toml(&config)?;

    match cmd {
        ConfigCommands::Get { key } => {
            let value = lookup(&table, &key)?;
            if output.is_json() {
                output.json(&serde_json::json!({ "key": key, "value": value.to_string() }))?;
            } else {
                output.print(&format!("{key} = {value}"))?;
            }
        }
        ConfigCommands::List => {
            output.header("Current configuration:")?;
            let text = toml::to_string_pretty(&table).map_err(|e| CliError::ConfigError {
                message: format!("cannot render configuration: {e}"),
                source: Some(Box::new(e)),
            })?;
            output.print(text.trim_end())?;
        }
        ConfigCommands::Path => {
            output.print(&AppConfig::config_path().display().to_string())?;
        }
    }
    Ok(())
}

fn to_toml(config: &AppConfig) -> CliResult<toml::Value> {
    toml::Value::try_from(config).map_err(|e| CliError::ConfigError {
        message: format!("cannot serialise configuration: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Resolve a dotted key such as `ignore.patterns` against the resolved table.
/// Only leaf values are accepted; `config list` shows whole sections.
fn lookup<'a>(table: &'a toml::Value, key: &str) -> CliResult<&'a toml::Value> {
    let value = key
        .split('.')
        .try_fold(table, |node, part| node.get(part))
        .ok_or_else(|| CliError::config(format!("unknown config key '{key}'")))?;

    if value.is_table() {
        return Err(CliError::config(format!(
            "'{key}' is a section; use one of its keys or `sourcecraft config list`"
        )));
    }
    Ok(value)
}
