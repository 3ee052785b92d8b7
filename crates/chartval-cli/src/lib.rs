//! # chartval CLI Library
//!
//! Subcommand argument types and handlers for the `chartval` binary.

pub mod schema;
pub mod validate;

use chartval_core::{ObjectSchema, SchemaError};

/// Built-in chart schema targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Chart {
    /// Daemon deployment block.
    Daemon,
    /// Run coordinator block on its own.
    RunCoordinator,
    /// Migration job block.
    Migrate,
}

impl Chart {
    /// Build the schema description for this target.
    pub fn schema(self) -> Result<ObjectSchema, SchemaError> {
        match self {
            Self::Daemon => chartval_charts::daemon_schema(),
            Self::RunCoordinator => chartval_charts::run_coordinator_schema(),
            Self::Migrate => chartval_charts::migrate_schema(),
        }
    }
}
