//! # Schema Subcommand
//!
//! Exports a built-in chart schema as a standalone JSON Schema document
//! for external tooling.

use std::path::PathBuf;

use clap::Args;

use chartval_schema::{compile, json_schema};

use crate::Chart;

/// Arguments for the schema subcommand.
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Built-in chart schema to export.
    #[arg(long, value_enum, default_value_t = Chart::Daemon)]
    pub chart: Chart,

    /// Write the schema to a file instead of stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Compile the exported schema as a sanity check before emitting it.
    #[arg(long)]
    pub check: bool,
}

/// Run the schema subcommand.
pub fn run(args: &SchemaArgs) -> anyhow::Result<()> {
    let schema = args.chart.schema()?;

    if args.check {
        compile(&schema)?;
        tracing::debug!(schema = schema.name(), "exported schema compiles");
    }

    let exported = json_schema(&schema);
    let rendered = serde_json::to_string_pretty(&exported)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, format!("{rendered}\n"))?;
            tracing::info!(path = %path.display(), "schema written");
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
