//! # Validate Subcommand
//!
//! Validates a values file against a built-in chart schema, printing every
//! violation before exiting non-zero.

use std::path::PathBuf;

use anyhow::bail;
use clap::Args;

use chartval_schema::{load_document, validate};

use crate::Chart;

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Values file (YAML or JSON) to validate.
    pub values_file: PathBuf,

    /// Built-in chart schema to validate against.
    #[arg(long, value_enum, default_value_t = Chart::Daemon)]
    pub chart: Chart,
}

/// Run the validate subcommand.
pub fn run(args: &ValidateArgs) -> anyhow::Result<()> {
    let schema = args.chart.schema()?;
    let document = load_document(&args.values_file)?;

    match validate(&schema, &document) {
        Ok(_) => {
            tracing::info!(
                file = %args.values_file.display(),
                schema = schema.name(),
                "document is valid"
            );
            println!("{}: valid against '{}'", args.values_file.display(), schema.name());
            Ok(())
        }
        Err(violations) => {
            eprintln!(
                "{} failed validation against '{}':",
                args.values_file.display(),
                schema.name()
            );
            eprintln!("{violations}");
            bail!("{} violation(s)", violations.len());
        }
    }
}
