//! Command handlers. Each translates parsed arguments into a core request,
//! calls the service, and reports the result. No compile or generate logic
//! lives here.

pub mod compile;
pub mod completions;
pub mod config;
pub mod generate;
pub mod init;
pub mod params;

use serde_json::json;
use sourcecraft_core::application::WriteReport;

use crate::{error::CliResult, output::OutputManager};

/// Print what a write did, or would do under `--dry-run`.
pub(crate) fn print_write_report(
    output: &OutputManager,
    report: &WriteReport,
    dry_run: bool,
) -> CliResult<()> {
    for path in &report.created {
        output.change('+', path)?;
    }
    for path in &report.updated {
        output.change('~', path)?;
    }
    for path in &report.removed {
        output.change('-', path)?;
    }

    let verb = if dry_run { "would change" } else { "changed" };
    output.info(&format!(
        "{} {verb}, {} unchanged",
        plural(report.changes(), "entry", "entries"),
        report.unchanged.len(),
    ))?;
    Ok(())
}

pub(crate) fn write_report_json(report: &WriteReport) -> serde_json::Value {
    json!({
        "created": report.created,
        "updated": report.updated,
        "unchanged": report.unchanged,
        "removed": report.removed,
    })
}

fn plural(n: usize, one: &str, many: &str) -> String {
    format!("{n} {}", if n == 1 { one } else { many })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plural_forms() {
        assert_eq!(plural(1, "entry", "entries"), "1 entry");
        assert_eq!(plural(0, "entry", "entries"), "0 entries");
    }

    #[test]
    fn report_json_lists_every_bucket() {
        let report = WriteReport {
            created: vec!["a".into()],
            removed: vec!["b".into()],
            ..WriteReport::default()
        };
        let value = write_report_json(&report);
        assert_eq!(value["created"][0], "a");
        assert_eq!(value["removed"][0], "b");
        assert!(value["updated"].as_array().unwrap().is_empty());
    }
}
