//! # JSON Schema Export
//!
//! Projects a schema description to a standalone JSON Schema (Draft
//! 2020-12) document for external tooling — editors, linters, chart
//! repositories. Conditional groups are rendered as an `allOf` of
//! `if`/`then` entries keyed on the discriminator's `const` value, the same
//! composition the source charts publish.
//!
//! The projection is advisory where the native validator is strict:
//! `if`/`then` requires the *active* block but cannot reject a populated
//! non-active sibling, so `ConditionalBlockConflict` detection remains
//! native-only.

use jsonschema::Validator;
use serde_json::{json, Map, Value};
use thiserror::Error;

use chartval_core::{ConditionalGroup, ExtraFields, FieldType, ObjectSchema};

/// Dialect the exported schema declares.
pub const SCHEMA_DRAFT: &str = "https://json-schema.org/draft/2020-12/schema";

/// Error compiling an exported schema.
#[derive(Error, Debug)]
pub enum ExportError {
    /// The exported document did not compile as a JSON Schema.
    #[error("exported schema for '{schema_name}' does not compile: {reason}")]
    Compile {
        /// Name of the schema that was exported.
        schema_name: String,
        /// Compiler failure.
        reason: String,
    },
}

/// Project `schema` to a standalone JSON Schema document.
///
/// Pure projection: no validation logic of its own.
pub fn json_schema(schema: &ObjectSchema) -> Value {
    let mut root = object_value(schema);
    if let Some(map) = root.as_object_mut() {
        map.insert("$schema".to_string(), json!(SCHEMA_DRAFT));
        map.insert("title".to_string(), json!(schema.name()));
    }
    root
}

/// Compile the exported projection of `schema` with the `jsonschema` crate.
///
/// Callers get a ready validator for external-tooling workflows; the tests
/// use it to check the projection agrees with the native validator.
///
/// # Errors
///
/// Returns [`ExportError::Compile`] if the projection is not a valid
/// schema — which would be a bug in the export, not in the caller's input.
pub fn compile(schema: &ObjectSchema) -> Result<Validator, ExportError> {
    let exported = json_schema(schema);
    let mut opts = jsonschema::options();
    opts.with_draft(jsonschema::Draft::Draft202012);
    opts.build(&exported).map_err(|e| ExportError::Compile {
        schema_name: schema.name().to_string(),
        reason: e.to_string(),
    })
}

fn object_value(schema: &ObjectSchema) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for field in schema.fields() {
        let mut prop = type_value(&field.ty);
        if let Some(default) = &field.default {
            if let Some(map) = prop.as_object_mut() {
                map.insert("default".to_string(), default.clone());
            }
        }
        properties.insert(field.name.clone(), prop);
        if field.required {
            required.push(json!(field.name));
        }
    }

    let mut out = Map::new();
    out.insert("type".to_string(), json!("object"));
    out.insert("properties".to_string(), Value::Object(properties));
    if !required.is_empty() {
        out.insert("required".to_string(), Value::Array(required));
    }
    out.insert(
        "additionalProperties".to_string(),
        json!(schema.extra_fields() == ExtraFields::Allow),
    );

    let conditionals: Vec<Value> = schema.groups().iter().flat_map(conditional_values).collect();
    if !conditionals.is_empty() {
        out.insert("allOf".to_string(), Value::Array(conditionals));
    }

    Value::Object(out)
}

fn type_value(ty: &FieldType) -> Value {
    match ty {
        FieldType::Bool => json!({"type": "boolean"}),
        FieldType::Int => json!({"type": "integer"}),
        FieldType::Float => json!({"type": "number"}),
        FieldType::String => json!({"type": "string"}),
        FieldType::Enum(variants) => json!({"type": "string", "enum": variants}),
        FieldType::Object(schema) => object_value(schema),
        FieldType::List(item) => json!({"type": "array", "items": type_value(item)}),
        FieldType::Map(value_ty) => json!({
            "type": "object",
            "additionalProperties": type_value(value_ty)
        }),
        FieldType::OneOf(arms) => {
            let arms: Vec<Value> = arms.iter().map(type_value).collect();
            json!({"anyOf": arms})
        }
        FieldType::Any => json!({}),
    }
}

/// One `if`/`then` entry per mapped variant.
///
/// With a container, the `then` branch requires the block *inside* the
/// container property; otherwise it requires the sibling directly.
fn conditional_values(group: &ConditionalGroup) -> Vec<Value> {
    group
        .mapping()
        .iter()
        .map(|(variant, block)| {
            let condition = json!({
                "properties": {group.discriminator(): {"const": variant}},
                "required": [group.discriminator()]
            });
            let consequence = match group.container() {
                None => json!({"required": [block]}),
                Some(container) => json!({
                    "properties": {container: {"required": [block]}}
                }),
            };
            json!({"if": condition, "then": consequence})
        })
        .collect()
}
