//! # chartval CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use clap::Parser;

/// Chart values validation toolchain.
///
/// Validates Helm-style values files against built-in chart schemas and
/// exports those schemas as standalone JSON Schema documents.
#[derive(Parser, Debug)]
#[command(name = "chartval", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Validate a values file against a built-in chart schema.
    Validate(chartval_cli::validate::ValidateArgs),
    /// Export a built-in chart schema as JSON Schema.
    Schema(chartval_cli::schema::SchemaArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate(args) => chartval_cli::validate::run(&args),
        Commands::Schema(args) => chartval_cli::schema::run(&args),
    }
}
