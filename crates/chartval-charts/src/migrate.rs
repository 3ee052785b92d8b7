//! # Migration Job Values
//!
//! The database migration job block. Unlike the daemon, the original chart
//! model leaves this object permissive: undeclared fields pass through.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use chartval_core::{FieldType, ObjectSchema, SchemaError};
use chartval_schema::ValidatedDocument;

use crate::ChartError;

/// Typed migration job block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Migrate {
    /// Whether the migration job runs.
    pub enabled: bool,
    /// Override for the migrate command line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_migrate_command: Option<Vec<String>>,
    /// Extra containers passthrough.
    pub extra_containers: Vec<Value>,
}

impl Migrate {
    /// Convert a validated migrate document.
    ///
    /// # Errors
    ///
    /// Returns [`ChartError::Conversion`] if the tree does not map onto the
    /// typed model — possible only for documents that bypassed validation.
    pub fn from_validated(doc: &ValidatedDocument) -> Result<Self, ChartError> {
        Ok(serde_json::from_value(doc.value().clone())?)
    }
}

/// Schema for the migration job block.
///
/// # Errors
///
/// Returns a [`SchemaError`] only if the static definition is malformed —
/// a bug in this crate, caught by its tests.
pub fn migrate_schema() -> Result<ObjectSchema, SchemaError> {
    ObjectSchema::builder("Migrate")
        .required("enabled", FieldType::Bool)
        .optional("customMigrateCommand", FieldType::List(Box::new(FieldType::String)))
        .required("extraContainers", FieldType::List(Box::new(FieldType::Any)))
        .allow_extra_fields()
        .build()
}
