//! Loader for rule files.
//!
//! ```toml
//! [[rules]]
//! literal = "my_app"
//! template = "app_name"
//! case_by_extension = { rs = "snake_case", ts = "camelCase" }
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;
use sourcecraft_core::{
    application::ApplicationError,
    domain::LiteralRule,
    error::{CraftError, CraftResult},
};
use tracing::{debug, instrument};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RulesFile {
    #[serde(default)]
    rules: Vec<LiteralRule>,
}

/// Read the rules listed in the TOML file at `path`, in file order.
///
/// The rules are not validated here; build a `RuleSet` from them for that.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_rules(path: &Path) -> CraftResult<Vec<LiteralRule>> {
    let raw = fs::read_to_string(path).map_err(|e| ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        operation: "read rules file",
        reason: e.to_string(),
    })?;
    let rules = parse_rules(&raw).map_err(|message| CraftError::Configuration {
        message: format!("failed to parse '{}': {message}", path.display()),
    })?;
    debug!(count = rules.len(), "rules loaded");
    Ok(rules)
}

fn parse_rules(raw: &str) -> Result<Vec<LiteralRule>, String> {
    toml::from_str::<RulesFile>(raw)
        .map(|file| file.rules)
        .map_err(|e| e.to_string())
}

/// Parse a `LITERAL=PARAM` command-line rule. The literal is everything up to
/// the last `=`, so literals may themselves contain `=`.
pub fn parse_rule_arg(arg: &str) -> Result<LiteralRule, String> {
    let (literal, template) = arg
        .rsplit_once('=')
        .ok_or_else(|| format!("expected LITERAL=PARAM, got '{arg}'"))?;
    Ok(LiteralRule::new(literal, template.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sourcecraft_core::domain::CaseStyle;
    use tempfile::TempDir;

    #[test]
    fn loads_rules_in_order() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("rules.toml");
        fs::write(
            &path,
            r#"
[[rules]]
literal = "my_app"
template = "app_name"
case_by_extension = { rs = "snake_case" }

[[rules]]
literal = "BlogPost"
template = "entry"
"#,
        )
        .unwrap();

        let rules = load_rules(&path).unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].literal, "my_app");
        assert_eq!(rules[0].case_for("lib.rs"), Some(CaseStyle::SnakeCase));
        assert_eq!(rules[1].template, "entry");
    }

    #[test]
    fn empty_file_has_no_rules() {
        assert!(parse_rules("").unwrap().is_empty());
    }

    #[test]
    fn unknown_keys_are_configuration_errors() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("rules.toml");
        fs::write(&path, "[[rulez]]\nliteral = \"x\"\n").unwrap();
        assert!(matches!(
            load_rules(&path),
            Err(CraftError::Configuration { .. })
        ));
    }

    #[test]
    fn missing_file_is_a_filesystem_error() {
        let err = load_rules(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(
            err,
            CraftError::Application(ApplicationError::FilesystemError { .. })
        ));
    }

    #[test]
    fn rule_arg_splits_on_last_equals() {
        let rule = parse_rule_arg("a=b=param").unwrap();
        assert_eq!(rule.literal, "a=b");
        assert_eq!(rule.template, "param");
        assert!(parse_rule_arg("no-equals").is_err());
    }
}
