//! # chartval-charts — Built-in Chart Schemas
//!
//! Schema definitions for the chart values this toolchain ships support
//! for — the daemon deployment block, its run-coordinator policy, and the
//! migration job block — together with the strongly-typed configuration
//! objects a validated document converts into.
//!
//! ## Two Layers
//!
//! 1. **Declaration**: `daemon_schema()` / `run_coordinator_schema()` /
//!    `migrate_schema()` build explicit [`chartval_core::ObjectSchema`]
//!    descriptions once at startup. Kubernetes pod/container wiring
//!    (selectors, affinity, probes, volumes, env plumbing) is declared as
//!    opaque passthrough — those values are copied into the output with no
//!    semantics of their own.
//!
//! 2. **Consumption**: [`RunCoordinator`] exposes the discriminated
//!    coordinator choice as a tagged union
//!    ([`RunCoordinatorSelection`]) — one concrete variant chosen by the
//!    `type` field — rather than a struct of mutually-exclusive optional
//!    fields, so an invalid combination cannot be represented at all.
//!
//! Conversion runs on documents that already passed validation; the
//! [`ChartError`] path exists for defense at the boundary, not as a second
//! validator.

pub mod coordinator;
pub mod daemon;
pub mod migrate;
pub mod source;

pub use coordinator::{
    run_coordinator_schema, BlockOpConcurrencyLimitedRuns, ConfigurableClass,
    QueuedRunCoordinatorConfig, RunCoordinator, RunCoordinatorSelection, RunCoordinatorType,
    TagConcurrencyLimit, TagConcurrencyLimitValue,
};
pub use daemon::{daemon_schema, Daemon, Image, RunRetries, WorkerSettings};
pub use migrate::{migrate_schema, Migrate};
pub use source::IntSource;

use thiserror::Error;

/// Error converting a validated document into a typed configuration object.
#[derive(Error, Debug)]
pub enum ChartError {
    /// The value tree did not map onto the typed model.
    #[error("typed conversion failed: {0}")]
    Conversion(#[from] serde_json::Error),
}
