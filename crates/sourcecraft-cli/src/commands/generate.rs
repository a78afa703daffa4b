//! Implementation of the `sourcecraft generate` command.

use serde_json::json;
use tracing::{debug, instrument};

use sourcecraft_adapters::{LocalFilesystem, load_values, parse_set_arg};
use sourcecraft_core::{
    application::{CraftService, GenerateRequest},
    domain::{Bindings, ParamSet},
};

use crate::{
    cli::GenerateArgs,
    commands::{print_write_report, write_report_json},
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Execute the `sourcecraft generate` command.
#[instrument(skip_all, fields(generator = %args.generator.display(), output = %args.output.display()))]
pub fn execute(args: GenerateArgs, output: OutputManager) -> CliResult<()> {
    let service = CraftService::new(Box::new(LocalFilesystem::new()));

    let mut bindings = collect_bindings(&args)?;
    if args.interactive {
        let params = service.params(&args.generator)?;
        prompt_missing(&params, &mut bindings)?;
    }
    debug!(bound = bindings.len(), "bindings collected");

    let request = GenerateRequest {
        generator: args.generator.clone(),
        output: args.output.clone(),
        bindings,
        dry_run: args.dry_run,
    };

    let spinner = output.spinner(&format!("Generating {}", args.output.display()));
    let result = service.generate(&request);
    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }
    let summary = result?;

    if output.is_json() {
        output.json(&json!({
            "files": summary.files,
            "dry_run": args.dry_run,
            "write": write_report_json(&summary.write),
        }))?;
        return Ok(());
    }

    print_write_report(&output, &summary.write, args.dry_run)?;
    let done = format!(
        "Generated {} files into {}",
        summary.files,
        args.output.display()
    );
    if args.dry_run {
        output.info(&format!("Dry run: {done}"))?;
    } else {
        output.success(&done)?;
    }
    Ok(())
}

/// `--values` file first, then each `--set`, later entries winning.
fn collect_bindings(args: &GenerateArgs) -> CliResult<Bindings> {
    let mut bindings = match &args.values {
        Some(path) => load_values(path)?,
        None => Bindings::new(),
    };
    for arg in &args.set {
        let (key, value) = parse_set_arg(arg).with_cli_context(|| "--set")?;
        bindings.insert(key, value);
    }
    Ok(bindings)
}

#[cfg(feature = "interactive")]
fn prompt_missing(params: &ParamSet, bindings: &mut Bindings) -> CliResult<()> {
    use dialoguer::Input;

    for name in params.iter() {
        if bindings.get(name).is_some() {
            continue;
        }
        let value: String = Input::new()
            .with_prompt(name)
            .interact_text()
            .map_err(|e| match e {
                dialoguer::Error::IO(io) if io.kind() == std::io::ErrorKind::Interrupted => {
                    CliError::Cancelled
                }
                dialoguer::Error::IO(io) => CliError::IoError {
                    message: format!("failed to read a value for '{name}'"),
                    source: io,
                },
            })?;
        bindings.insert(name, value);
    }
    Ok(())
}

#[cfg(not(feature = "interactive"))]
fn prompt_missing(_params: &ParamSet, _bindings: &mut Bindings) -> CliResult<()> {
    Err(CliError::FeatureNotAvailable {
        feature: "interactive",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use tempfile::TempDir;

    fn generate_args(argv: &[&str]) -> GenerateArgs {
        let mut full = vec!["sourcecraft", "generate", "gen", "out"];
        full.extend_from_slice(argv);
        match Cli::parse_from(full).command {
            Commands::Generate(args) => args,
            _ => unreachable!(),
        }
    }

    #[test]
    fn set_overrides_values_file() {
        let temp = TempDir::new().unwrap();
        let values = temp.path().join("values.toml");
        std::fs::write(&values, "app = \"from_file\"\nentry = \"post\"\n").unwrap();
        let values = values.to_str().unwrap();

        let bindings =
            collect_bindings(&generate_args(&["--values", values, "--set", "app=cli"])).unwrap();
        assert_eq!(bindings.get("app"), Some("cli"));
        assert_eq!(bindings.get("entry"), Some("post"));
    }

    #[test]
    fn malformed_set_is_invalid_input() {
        let err = collect_bindings(&generate_args(&["--set", "novalue"])).unwrap_err();
        assert!(matches!(err, CliError::InvalidInput { .. }));
    }
}
