//! Implementation of the `sourcecraft compile` command.

use serde_json::json;
use tracing::{debug, instrument};

use sourcecraft_adapters::{LocalFilesystem, load_rules, parse_rule_arg};
use sourcecraft_core::{
    application::{CompileRequest, CraftService, Emit, ReadOptions},
    domain::{LiteralRule, RuleSet},
};

use crate::{
    cli::{CompileArgs, EmitFormat},
    commands::{print_write_report, write_report_json},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Execute the `sourcecraft compile` command.
///
/// 1. Collect rules: `--rules` file first, then each `--rule`
/// 2. Build read options from config and flags
/// 3. Compile and write (or plan, under `--dry-run`)
/// 4. Report parameters, unused rules and changes
#[instrument(skip_all, fields(source = %args.source.display(), output = %args.output.display()))]
pub fn execute(args: CompileArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let rules = collect_rules(&args)?;
    if rules.is_empty() {
        output.warning("No rules given; the generator will reproduce the source verbatim")?;
    }
    let read = read_options(&args, &config);
    debug!(rules = rules.len(), ?read, "compile request built");

    let request = CompileRequest {
        source: args.source.clone(),
        output: args.output.clone(),
        rules,
        read,
        emit: match args.emit {
            EmitFormat::Native => Emit::Native,
            EmitFormat::Typescript => Emit::TypeScript,
        },
        dry_run: args.dry_run,
    };

    let service = CraftService::new(Box::new(LocalFilesystem::new()));
    let spinner = output.spinner(&format!("Compiling {}", args.source.display()));
    let result = service.compile(&request);
    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }
    let summary = result?;

    if output.is_json() {
        output.json(&json!({
            "params": summary.params.iter().collect::<Vec<_>>(),
            "files": summary.report.files,
            "parameterized_files": summary.report.parameterized_files,
            "rules": summary.report.usage.iter().map(|(literal, template, count)| json!({
                "literal": literal,
                "template": template,
                "replacements": count,
            })).collect::<Vec<_>>(),
            "dry_run": args.dry_run,
            "write": write_report_json(&summary.write),
        }))?;
        return Ok(());
    }

    for (literal, template) in summary.report.unused() {
        output.warning(&format!("Rule '{literal}' → '{template}' matched nothing"))?;
    }
    print_write_report(&output, &summary.write, args.dry_run)?;

    let params = if summary.params.is_empty() {
        "none".to_string()
    } else {
        summary.params.to_string()
    };
    let done = format!(
        "Compiled {} files ({} parameterized), parameters: {params}",
        summary.report.files, summary.report.parameterized_files,
    );
    if args.dry_run {
        output.info(&format!("Dry run: {done}"))?;
    } else {
        output.success(&done)?;
    }
    Ok(())
}

/// File rules first, then command-line rules, validated together.
fn collect_rules(args: &CompileArgs) -> CliResult<RuleSet> {
    let mut rules: Vec<LiteralRule> = match &args.rules {
        Some(path) => load_rules(path)?,
        None => Vec::new(),
    };
    for arg in &args.rule {
        rules.push(parse_rule_arg(arg).with_cli_context(|| "--rule")?);
    }
    RuleSet::new(rules).map_err(|e| CliError::Core(e.into()))
}

fn read_options(args: &CompileArgs, config: &AppConfig) -> ReadOptions {
    let ignore_file_names = if args.no_ignore_files {
        Vec::new()
    } else {
        config.ignore.file_names.clone()
    };
    ReadOptions {
        ignore_file_names,
        ignore_patterns: config
            .ignore
            .patterns
            .iter()
            .chain(&args.ignore)
            .cloned()
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    fn compile_args(argv: &[&str]) -> CompileArgs {
        let mut full = vec!["sourcecraft", "compile", "src", "gen"];
        full.extend_from_slice(argv);
        match Cli::parse_from(full).command {
            Commands::Compile(args) => args,
            _ => unreachable!(),
        }
    }

    #[test]
    fn command_line_rules_keep_their_order() {
        let rules = collect_rules(&compile_args(&["--rule", "b=x", "--rule", "a=y"])).unwrap();
        let literals: Vec<&str> = rules.rules().iter().map(|r| r.literal.as_str()).collect();
        assert_eq!(literals, vec!["b", "a"]);
    }

    #[test]
    fn malformed_rule_is_invalid_input() {
        let err = collect_rules(&compile_args(&["--rule", "nothing"])).unwrap_err();
        assert!(matches!(err, CliError::InvalidInput { .. }));
    }

    #[test]
    fn invalid_parameter_name_is_rejected() {
        let err = collect_rules(&compile_args(&["--rule", "x=not valid"])).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn ignore_patterns_extend_config() {
        let read = read_options(&compile_args(&["--ignore", "dist/"]), &AppConfig::default());
        assert_eq!(read.ignore_patterns, vec![".git/", "dist/"]);
        assert_eq!(read.ignore_file_names, vec![".gitignore"]);

        let read = read_options(&compile_args(&["--no-ignore-files"]), &AppConfig::default());
        assert!(read.ignore_file_names.is_empty());
    }
}
