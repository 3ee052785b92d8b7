//! # chartval-core — Foundational Types for chartval
//!
//! This crate is the leaf of the chartval workspace. It defines the
//! schema-description data model the validator consumes: field types,
//! object schemas, conditional groups, field paths, and the structured
//! violation types every validation failure is reported as.
//!
//! ## Key Design Principles
//!
//! 1. **Schemas are data, built once.** A schema is an explicit
//!    [`ObjectSchema`] value constructed through a builder at process start.
//!    No reflection, no runtime type introspection — the declaration layer
//!    and the typed result layer are separate.
//!
//! 2. **Construction is checked.** [`ObjectSchema::builder`] rejects
//!    malformed schemas (duplicate fields, conditional groups referencing
//!    unknown discriminators or sub-blocks) at build time with a
//!    [`SchemaError`], so the validator can trust every schema it is handed.
//!
//! 3. **Violations are data, never panics.** Every validation failure is a
//!    [`Violation`] carrying a [`FieldPath`], a [`ViolationKind`], and a
//!    human-readable message. The caller decides whether to abort.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `chartval-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug` and `Clone`.

pub mod error;
pub mod path;
pub mod schema;
pub mod violation;

// Re-export primary types for ergonomic imports.
pub use error::SchemaError;
pub use path::FieldPath;
pub use schema::{ConditionalGroup, ExtraFields, FieldDef, FieldType, ObjectSchema};
pub use violation::{Violation, ViolationKind, Violations};
