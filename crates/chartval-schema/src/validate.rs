//! # Document Validation
//!
//! Walks a configuration document against an [`ObjectSchema`], checking
//! presence, type compatibility, enum membership, extra-field policy, and
//! discriminated conditionals. All violations are accumulated — validation
//! never short-circuits — so a caller can report every problem in one pass.
//!
//! ## Semantics
//!
//! - An explicit JSON `null` is treated as an absent field everywhere: it
//!   satisfies nothing, triggers defaults, and does not count as a present
//!   sub-block. Helm values files null fields out to mean "unset".
//! - Defaults for absent optional fields are materialized into the
//!   validated document, so downstream consumers never re-implement
//!   defaulting.
//! - A non-active sibling sub-block present alongside the active one is a
//!   `ConditionalBlockConflict` unless it is default-shaped (an empty
//!   object, or exactly its declared default). Helm values files routinely
//!   carry empty placeholder blocks for the non-selected backend.
//! - An invalid discriminator value suppresses that group's block checks;
//!   the enum violation already explains the problem.
//!
//! ## Failure Semantics
//!
//! Success returns a complete [`ValidatedDocument`]; failure returns the
//! complete violation list. Never a partial result. Pure function of
//! schema + document: no I/O, no shared mutable state.

use serde_json::{Map, Value};

use chartval_core::{
    ConditionalGroup, ExtraFields, FieldPath, FieldType, ObjectSchema, Violation, ViolationKind,
    Violations,
};

/// A document that passed validation.
///
/// Exposes the declared fields of the input (plus passthrough extras on
/// permissive nodes), with defaults for absent optional fields filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedDocument {
    value: Value,
}

impl ValidatedDocument {
    /// The validated value tree.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Consumes self and returns the value tree.
    pub fn into_value(self) -> Value {
        self.value
    }

    /// Look up a field by JSON Pointer (e.g. `/runCoordinator/type`).
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        self.value.pointer(pointer)
    }
}

/// Validate `document` against `schema`.
///
/// # Errors
///
/// Returns every [`Violation`] found in the document. The list is never
/// empty on the error path.
pub fn validate(schema: &ObjectSchema, document: &Value) -> Result<ValidatedDocument, Violations> {
    tracing::debug!(schema = schema.name(), "validating document");
    let mut violations = Vec::new();
    let value = check_object(schema, document, &FieldPath::root(), &mut violations);
    if violations.is_empty() {
        Ok(ValidatedDocument { value })
    } else {
        tracing::debug!(
            schema = schema.name(),
            count = violations.len(),
            "document rejected"
        );
        Err(violations.into())
    }
}

/// Short shape name for type-mismatch messages.
fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

/// Explicit null counts as absent everywhere.
fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn mismatch(ty: &FieldType, value: &Value, path: &FieldPath, out: &mut Vec<Violation>) -> Value {
    out.push(Violation::new(
        path.clone(),
        ViolationKind::TypeMismatch,
        format!("expected {}, found {}", ty.describe(), kind_of(value)),
    ));
    value.clone()
}

fn check_value(ty: &FieldType, value: &Value, path: &FieldPath, out: &mut Vec<Violation>) -> Value {
    match ty {
        FieldType::Bool if value.is_boolean() => value.clone(),
        FieldType::Int if value.is_i64() || value.is_u64() => value.clone(),
        FieldType::Float if value.is_number() => value.clone(),
        FieldType::String if value.is_string() => value.clone(),
        FieldType::Enum(variants) => match value.as_str() {
            Some(s) if variants.iter().any(|v| v == s) => value.clone(),
            Some(s) => {
                out.push(Violation::new(
                    path.clone(),
                    ViolationKind::InvalidEnumValue,
                    format!("\"{s}\" is not one of [{}]", variants.join(", ")),
                ));
                value.clone()
            }
            None => mismatch(ty, value, path, out),
        },
        FieldType::Object(schema) => check_object(schema, value, path, out),
        FieldType::List(item) => match value.as_array() {
            Some(items) => Value::Array(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, v)| check_value(item, v, &path.index(i), out))
                    .collect(),
            ),
            None => mismatch(ty, value, path, out),
        },
        FieldType::Map(value_ty) => match value.as_object() {
            Some(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), check_value(value_ty, v, &path.child(k), out)))
                    .collect(),
            ),
            None => mismatch(ty, value, path, out),
        },
        FieldType::OneOf(arms) => {
            // First arm that matches cleanly wins; its violations (none)
            // and its normalized value are what we keep.
            for arm in arms {
                let mut scratch = Vec::new();
                let candidate = check_value(arm, value, path, &mut scratch);
                if scratch.is_empty() {
                    return candidate;
                }
            }
            mismatch(ty, value, path, out)
        }
        FieldType::Any => value.clone(),
        // Scalar guards above fell through: wrong shape.
        FieldType::Bool | FieldType::Int | FieldType::Float | FieldType::String => {
            mismatch(ty, value, path, out)
        }
    }
}

fn check_object(
    schema: &ObjectSchema,
    value: &Value,
    path: &FieldPath,
    out: &mut Vec<Violation>,
) -> Value {
    let Some(map) = value.as_object() else {
        out.push(Violation::new(
            path.clone(),
            ViolationKind::TypeMismatch,
            format!(
                "expected object '{}', found {}",
                schema.name(),
                kind_of(value)
            ),
        ));
        return Value::Null;
    };

    let mut result = Map::new();

    for field in schema.fields() {
        let field_path = path.child(&field.name);
        match present(map.get(&field.name)) {
            Some(v) => {
                let checked = check_value(&field.ty, v, &field_path, out);
                result.insert(field.name.clone(), checked);
            }
            None if field.required => {
                out.push(Violation::new(
                    field_path,
                    ViolationKind::MissingRequiredField,
                    format!("required field '{}' is absent", field.name),
                ));
            }
            None => {
                if let Some(default) = &field.default {
                    result.insert(field.name.clone(), default.clone());
                }
            }
        }
    }

    for (key, v) in map {
        if schema.field(key).is_none() {
            match schema.extra_fields() {
                ExtraFields::Forbid => out.push(Violation::new(
                    path.child(key),
                    ViolationKind::UnknownField,
                    format!("unknown field '{key}'"),
                )),
                ExtraFields::Allow => {
                    result.insert(key.clone(), v.clone());
                }
            }
        }
    }

    for group in schema.groups() {
        check_group(schema, group, map, path, out);
    }

    Value::Object(result)
}

/// Enforce one discriminated conditional on an object node.
///
/// The discriminator resolves to the document value when present and valid,
/// falling back to the field's declared default. Unresolvable groups (the
/// discriminator is absent with no default, mis-typed, or not a declared
/// variant) are skipped — the field checks already reported the cause. A
/// group with a `within` container is likewise skipped when the container
/// is absent or mis-shaped; the container's own required flag governs its
/// presence.
fn check_group(
    schema: &ObjectSchema,
    group: &ConditionalGroup,
    map: &Map<String, Value>,
    path: &FieldPath,
    out: &mut Vec<Violation>,
) {
    let Some(discriminator) = schema.field(group.discriminator()) else {
        return;
    };
    let FieldType::Enum(variants) = &discriminator.ty else {
        return;
    };

    let resolved = match present(map.get(group.discriminator())) {
        Some(Value::String(s)) if variants.iter().any(|v| v == s) => s.clone(),
        Some(_) => return,
        None => match &discriminator.default {
            Some(Value::String(s)) if variants.iter().any(|v| v == s) => s.clone(),
            _ => return,
        },
    };

    // Where the governed blocks live: this object, or the container.
    let (block_map, block_schema, block_path) = match group.container() {
        None => (map, schema, path.clone()),
        Some(container) => {
            let Some(inner_schema) = schema.field(container).and_then(|f| match &f.ty {
                FieldType::Object(inner) => Some(inner),
                _ => None,
            }) else {
                return;
            };
            let Some(inner_map) = present(map.get(container)).and_then(Value::as_object) else {
                return;
            };
            (inner_map, inner_schema, path.child(container))
        }
    };

    let active = group.block_for(&resolved);

    if let Some(active) = active {
        if present(block_map.get(active)).is_none() {
            out.push(Violation::new(
                block_path.child(active),
                ViolationKind::ConditionalBlockMissing,
                format!(
                    "discriminator '{}' is '{}' but sub-block '{}' is absent",
                    group.discriminator(),
                    resolved,
                    active
                ),
            ));
        }
    }

    let mut seen: Vec<&str> = Vec::new();
    for block in group.blocks() {
        if Some(block) == active || seen.contains(&block) {
            continue;
        }
        seen.push(block);
        if let Some(v) = present(block_map.get(block)) {
            let default = block_schema.field(block).and_then(|f| f.default.as_ref());
            if !is_default_shaped(v, default) {
                out.push(Violation::new(
                    block_path.child(block),
                    ViolationKind::ConditionalBlockConflict,
                    format!(
                        "sub-block '{}' is populated but discriminator '{}' is '{}'",
                        block,
                        group.discriminator(),
                        resolved
                    ),
                ));
            }
        }
    }
}

/// A present non-active sibling is tolerated when it carries no real
/// content: an empty object, or exactly the field's declared default.
fn is_default_shaped(value: &Value, default: Option<&Value>) -> bool {
    if let Some(map) = value.as_object() {
        if map.is_empty() {
            return true;
        }
    }
    default == Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chartval_core::{schema::enum_of, ObjectSchema};
    use serde_json::json;

    /// The worked example from the chart model: a coordinator whose `type`
    /// selects between a queued and a custom backend config.
    fn coordinator_schema() -> ObjectSchema {
        let queued = ObjectSchema::builder("QueuedConfig")
            .optional("maxConcurrentRuns", FieldType::Int)
            .build()
            .unwrap();
        ObjectSchema::builder("Coordinator")
            .required("type", enum_of(["QUEUED", "CUSTOM"]))
            .optional("queuedConfig", FieldType::Object(queued))
            .optional("customConfig", FieldType::Any)
            .conditional(
                ConditionalGroup::new("type")
                    .map("QUEUED", "queuedConfig")
                    .map("CUSTOM", "customConfig"),
            )
            .build()
            .unwrap()
    }

    fn kinds(violations: &Violations) -> Vec<ViolationKind> {
        violations.violations().iter().map(|v| v.kind).collect()
    }

    #[test]
    fn test_valid_document_round_trips() {
        let schema = coordinator_schema();
        let doc = json!({"type": "QUEUED", "queuedConfig": {"maxConcurrentRuns": 5}});
        let validated = validate(&schema, &doc).unwrap();
        assert_eq!(validated.pointer("/type"), Some(&json!("QUEUED")));
        assert_eq!(
            validated.pointer("/queuedConfig/maxConcurrentRuns"),
            Some(&json!(5))
        );
    }

    #[test]
    fn test_missing_required_field_names_path() {
        let schema = coordinator_schema();
        let err = validate(&schema, &json!({})).unwrap_err();
        let missing: Vec<_> = err
            .violations()
            .iter()
            .filter(|v| v.kind == ViolationKind::MissingRequiredField)
            .collect();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].path.to_string(), "/type");
    }

    #[test]
    fn test_conditional_block_missing() {
        let schema = coordinator_schema();
        let err = validate(&schema, &json!({"type": "QUEUED"})).unwrap_err();
        assert_eq!(
            kinds(&err),
            vec![ViolationKind::ConditionalBlockMissing]
        );
        assert_eq!(err.violations()[0].path.to_string(), "/queuedConfig");
    }

    #[test]
    fn test_conditional_block_conflict() {
        let schema = coordinator_schema();
        let doc = json!({
            "type": "QUEUED",
            "queuedConfig": {"maxConcurrentRuns": 5},
            "customConfig": {"module": "mine"}
        });
        let err = validate(&schema, &doc).unwrap_err();
        assert_eq!(kinds(&err), vec![ViolationKind::ConditionalBlockConflict]);
        assert_eq!(err.violations()[0].path.to_string(), "/customConfig");
    }

    #[test]
    fn test_mismatched_discriminator_never_validates() {
        let schema = coordinator_schema();
        // Populated block belongs to the other variant: missing + conflict.
        let doc = json!({"type": "QUEUED", "customConfig": {"module": "mine"}});
        let err = validate(&schema, &doc).unwrap_err();
        assert!(err.contains_kind(ViolationKind::ConditionalBlockMissing));
        assert!(err.contains_kind(ViolationKind::ConditionalBlockConflict));
    }

    #[test]
    fn test_empty_sibling_block_tolerated() {
        let schema = coordinator_schema();
        let doc = json!({
            "type": "QUEUED",
            "queuedConfig": {"maxConcurrentRuns": 5},
            "customConfig": {}
        });
        validate(&schema, &doc).unwrap();
    }

    #[test]
    fn test_invalid_enum_suppresses_group_checks() {
        let schema = coordinator_schema();
        let err = validate(&schema, &json!({"type": "SPORADIC"})).unwrap_err();
        assert_eq!(kinds(&err), vec![ViolationKind::InvalidEnumValue]);
    }

    #[test]
    fn test_discriminator_default_resolves_group() {
        let queued = ObjectSchema::builder("QueuedConfig")
            .optional("maxConcurrentRuns", FieldType::Int)
            .build()
            .unwrap();
        let schema = ObjectSchema::builder("Coordinator")
            .optional_with_default("type", enum_of(["QUEUED", "CUSTOM"]), json!("QUEUED"))
            .optional("queuedConfig", FieldType::Object(queued))
            .optional("customConfig", FieldType::Any)
            .conditional(
                ConditionalGroup::new("type")
                    .map("QUEUED", "queuedConfig")
                    .map("CUSTOM", "customConfig"),
            )
            .build()
            .unwrap();

        // Omitted discriminator defaults to QUEUED: block required.
        let err = validate(&schema, &json!({})).unwrap_err();
        assert_eq!(kinds(&err), vec![ViolationKind::ConditionalBlockMissing]);

        let validated = validate(&schema, &json!({"queuedConfig": {}})).unwrap();
        // The default is materialized in the output.
        assert_eq!(validated.pointer("/type"), Some(&json!("QUEUED")));
    }

    #[test]
    fn test_unknown_field_forbidden() {
        let schema = coordinator_schema();
        let doc = json!({
            "type": "QUEUED",
            "queuedConfig": {},
            "surprise": true
        });
        let err = validate(&schema, &doc).unwrap_err();
        assert_eq!(kinds(&err), vec![ViolationKind::UnknownField]);
        assert_eq!(err.violations()[0].path.to_string(), "/surprise");
    }

    #[test]
    fn test_permissive_node_passes_extras_through() {
        let schema = ObjectSchema::builder("Permissive")
            .required("enabled", FieldType::Bool)
            .allow_extra_fields()
            .build()
            .unwrap();
        let doc = json!({"enabled": true, "anything": {"goes": [1, 2]}});
        let validated = validate(&schema, &doc).unwrap();
        assert_eq!(
            validated.pointer("/anything/goes"),
            Some(&json!([1, 2]))
        );
    }

    #[test]
    fn test_all_violations_reported_in_one_pass() {
        let schema = coordinator_schema();
        let doc = json!({
            "type": "SPORADIC",
            "queuedConfig": {"maxConcurrentRuns": "lots"},
            "surprise": 1
        });
        let err = validate(&schema, &doc).unwrap_err();
        assert!(err.contains_kind(ViolationKind::InvalidEnumValue));
        assert!(err.contains_kind(ViolationKind::TypeMismatch));
        assert!(err.contains_kind(ViolationKind::UnknownField));
        assert_eq!(err.len(), 3);
    }

    #[test]
    fn test_type_mismatches() {
        let schema = ObjectSchema::builder("Shapes")
            .required("flag", FieldType::Bool)
            .required("count", FieldType::Int)
            .required("ratio", FieldType::Float)
            .required("name", FieldType::String)
            .required("items", FieldType::List(Box::new(FieldType::String)))
            .required("labels", FieldType::Map(Box::new(FieldType::String)))
            .build()
            .unwrap();
        let doc = json!({
            "flag": "yes",
            "count": 5.5,
            "ratio": 2,
            "name": 7,
            "items": {"not": "a list"},
            "labels": ["not", "a", "map"]
        });
        let err = validate(&schema, &doc).unwrap_err();
        // ratio: Float accepts any JSON number, so five mismatches.
        assert_eq!(err.len(), 5);
        assert!(err
            .violations()
            .iter()
            .all(|v| v.kind == ViolationKind::TypeMismatch));
    }

    #[test]
    fn test_integral_float_rejected_for_int() {
        let schema = ObjectSchema::builder("Strict")
            .required("count", FieldType::Int)
            .build()
            .unwrap();
        let err = validate(&schema, &json!({"count": 5.0})).unwrap_err();
        assert_eq!(kinds(&err), vec![ViolationKind::TypeMismatch]);
    }

    #[test]
    fn test_one_of_matches_any_arm() {
        let schema = ObjectSchema::builder("IntSource")
            .required(
                "maxConcurrentRuns",
                FieldType::OneOf(vec![FieldType::Int, FieldType::String]),
            )
            .build()
            .unwrap();
        validate(&schema, &json!({"maxConcurrentRuns": 10})).unwrap();
        validate(&schema, &json!({"maxConcurrentRuns": "MAX_RUNS_ENV"})).unwrap();
        let err = validate(&schema, &json!({"maxConcurrentRuns": true})).unwrap_err();
        assert_eq!(kinds(&err), vec![ViolationKind::TypeMismatch]);
        assert!(err.violations()[0].message.contains("one of integer | string"));
    }

    #[test]
    fn test_list_violation_paths_carry_index() {
        let schema = ObjectSchema::builder("Listy")
            .required("items", FieldType::List(Box::new(FieldType::Int)))
            .build()
            .unwrap();
        let err = validate(&schema, &json!({"items": [1, "two", 3]})).unwrap_err();
        assert_eq!(err.violations()[0].path.to_string(), "/items/1");
    }

    #[test]
    fn test_null_is_absent() {
        let schema = ObjectSchema::builder("Nullable")
            .required("enabled", FieldType::Bool)
            .optional_with_default("replicas", FieldType::Int, json!(1))
            .build()
            .unwrap();
        let err = validate(&schema, &json!({"enabled": null})).unwrap_err();
        assert_eq!(kinds(&err), vec![ViolationKind::MissingRequiredField]);

        let validated = validate(&schema, &json!({"enabled": true, "replicas": null})).unwrap();
        assert_eq!(validated.pointer("/replicas"), Some(&json!(1)));
    }

    #[test]
    fn test_defaults_materialized() {
        let schema = ObjectSchema::builder("Defaults")
            .optional_with_default("heartbeatTolerance", FieldType::Int, json!(300))
            .build()
            .unwrap();
        let validated = validate(&schema, &json!({})).unwrap();
        assert_eq!(validated.pointer("/heartbeatTolerance"), Some(&json!(300)));
    }

    #[test]
    fn test_sibling_equal_to_default_tolerated() {
        let schema = ObjectSchema::builder("Coordinator")
            .required("type", enum_of(["A", "B"]))
            .optional_with_default("alpha", FieldType::Any, json!({"slots": 1}))
            .optional("beta", FieldType::Any)
            .conditional(ConditionalGroup::new("type").map("A", "alpha").map("B", "beta"))
            .build()
            .unwrap();
        // alpha carries exactly its declared default while B is selected.
        let doc = json!({"type": "B", "beta": {"x": 1}, "alpha": {"slots": 1}});
        validate(&schema, &doc).unwrap();

        let doc = json!({"type": "B", "beta": {"x": 1}, "alpha": {"slots": 9}});
        let err = validate(&schema, &doc).unwrap_err();
        assert_eq!(kinds(&err), vec![ViolationKind::ConditionalBlockConflict]);
    }

    /// Blocks inside a sibling `config` container, the run-coordinator
    /// layout.
    fn containered_schema() -> ObjectSchema {
        let config = ObjectSchema::builder("CoordinatorConfig")
            .optional("queuedRunCoordinator", FieldType::Any)
            .optional("customRunCoordinator", FieldType::Any)
            .build()
            .unwrap();
        ObjectSchema::builder("RunCoordinator")
            .required("enabled", FieldType::Bool)
            .optional_with_default(
                "type",
                enum_of(["QueuedRunCoordinator", "CustomRunCoordinator"]),
                json!("QueuedRunCoordinator"),
            )
            .required("config", FieldType::Object(config))
            .conditional(
                ConditionalGroup::new("type")
                    .within("config")
                    .map("QueuedRunCoordinator", "queuedRunCoordinator")
                    .map("CustomRunCoordinator", "customRunCoordinator"),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_within_active_block_required() {
        let schema = containered_schema();
        let doc = json!({
            "enabled": true,
            "type": "CustomRunCoordinator",
            "config": {}
        });
        let err = validate(&schema, &doc).unwrap_err();
        assert_eq!(kinds(&err), vec![ViolationKind::ConditionalBlockMissing]);
        assert_eq!(
            err.violations()[0].path.to_string(),
            "/config/customRunCoordinator"
        );
    }

    #[test]
    fn test_within_conflict_detected() {
        let schema = containered_schema();
        let doc = json!({
            "enabled": true,
            "config": {
                "queuedRunCoordinator": {"dequeueUseThreads": true},
                "customRunCoordinator": {"module": "mine", "class": "Mine"}
            }
        });
        // Discriminator defaults to QueuedRunCoordinator.
        let err = validate(&schema, &doc).unwrap_err();
        assert_eq!(kinds(&err), vec![ViolationKind::ConditionalBlockConflict]);
        assert_eq!(
            err.violations()[0].path.to_string(),
            "/config/customRunCoordinator"
        );
    }

    #[test]
    fn test_within_valid_document() {
        let schema = containered_schema();
        let doc = json!({
            "enabled": true,
            "type": "QueuedRunCoordinator",
            "config": {
                "queuedRunCoordinator": {"maxConcurrentRuns": 5},
                "customRunCoordinator": {}
            }
        });
        validate(&schema, &doc).unwrap();
    }

    #[test]
    fn test_within_absent_container_skips_group() {
        let schema = containered_schema();
        // config absent: its own MissingRequiredField is the only report.
        let err = validate(&schema, &json!({"enabled": true})).unwrap_err();
        assert_eq!(kinds(&err), vec![ViolationKind::MissingRequiredField]);
    }

    #[test]
    fn test_root_must_be_object() {
        let schema = coordinator_schema();
        let err = validate(&schema, &json!(["not", "an", "object"])).unwrap_err();
        assert_eq!(kinds(&err), vec![ViolationKind::TypeMismatch]);
        assert!(err.violations()[0].path.is_root());
    }

    #[test]
    fn test_nested_object_paths() {
        let inner = ObjectSchema::builder("Inner")
            .required("limit", FieldType::Int)
            .build()
            .unwrap();
        let schema = ObjectSchema::builder("Outer")
            .required("config", FieldType::Object(inner))
            .build()
            .unwrap();
        let err = validate(&schema, &json!({"config": {}})).unwrap_err();
        assert_eq!(err.violations()[0].path.to_string(), "/config/limit");
    }
}
