//! # chartval-schema — Discriminated Configuration Validation
//!
//! Validates nested configuration documents (parsed Helm-style values
//! files) against a [`chartval_core::ObjectSchema`], enforcing field
//! types, required-ness, enum membership, extra-field policies, and
//! "enum selects sub-config" conditionals.
//!
//! ## Validation (`validate`)
//!
//! [`validate::validate`] is a pure function of schema + document. It walks
//! the whole tree, accumulating every violation rather than stopping at the
//! first, and returns either a complete [`validate::ValidatedDocument`]
//! (declared fields, materialized defaults, passthrough extras on
//! permissive nodes) or the complete violation list. Never a partial
//! result.
//!
//! ## Document Loading (`document`)
//!
//! [`document::load_document`] reads a YAML or JSON values file into a
//! `serde_json::Value` tree, with an explicit YAML→JSON conversion that
//! rejects non-scalar mapping keys and unrepresentable floats.
//!
//! ## Schema Export (`export`)
//!
//! [`export::json_schema`] projects a schema description to a standalone
//! JSON Schema (Draft 2020-12) document for external tooling, with
//! conditional groups rendered as `allOf` `if`/`then` composition. The
//! projection carries no validation logic of its own; [`export::compile`]
//! hands back a compiled `jsonschema` validator for callers that want one.
//!
//! ## Crate Policy
//!
//! - Depends only on `chartval-core` internally.
//! - Validation is a trust boundary: invalid documents are rejected with
//!   structured violations including path, kind, and expected vs actual.
//! - No I/O outside `document`; `validate` and `export` are pure.

pub mod document;
pub mod export;
pub mod validate;

pub use document::{load_document, DocumentError};
pub use export::{compile, json_schema, ExportError};
pub use validate::{validate, ValidatedDocument};
