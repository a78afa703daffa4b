//! Implementation of the `sourcecraft params` command.

use sourcecraft_adapters::LocalFilesystem;
use sourcecraft_core::application::CraftService;

use crate::{
    cli::{ListFormat, ParamsArgs},
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: ParamsArgs, output: OutputManager) -> CliResult<()> {
    let service = CraftService::new(Box::new(LocalFilesystem::new()));
    let params = service.params(&args.generator)?;
    let names: Vec<&str> = params.iter().collect();

    if output.is_json() {
        output.json(&serde_json::json!(names))?;
        return Ok(());
    }

    match args.format {
        ListFormat::Table => {
            output.header(&format!("Parameters of {}:", args.generator.display()))?;
            if names.is_empty() {
                output.print("  (none)")?;
            }
            for (i, name) in names.iter().enumerate() {
                output.print(&format!("  {:>2}. {name}", i + 1))?;
            }
        }
        ListFormat::List => {
            for name in &names {
                output.print(name)?;
            }
        }
        ListFormat::Json => {
            output.json(&serde_json::json!(names))?;
        }
    }

    Ok(())
}
