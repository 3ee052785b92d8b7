//! # Run Coordinator Configuration
//!
//! The discriminated heart of the daemon chart: `type` selects between the
//! built-in queued coordinator and a user-supplied custom one, and exactly
//! one of the corresponding blocks inside `config` must be populated.
//!
//! The typed result exposes that choice as [`RunCoordinatorSelection`], a
//! tagged union — the struct-with-two-optionals shape only exists in the
//! raw document.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use chartval_core::{
    schema::enum_of, ConditionalGroup, FieldType, ObjectSchema, SchemaError,
};
use chartval_schema::ValidatedDocument;

use crate::source::{int_source, IntSource};
use crate::ChartError;

/// Which run coordinator implementation the daemon uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RunCoordinatorType {
    /// The built-in queued coordinator.
    #[default]
    #[serde(rename = "QueuedRunCoordinator")]
    Queued,
    /// A user-supplied coordinator class.
    #[serde(rename = "CustomRunCoordinator")]
    Custom,
}

impl RunCoordinatorType {
    /// All coordinator types in declaration order.
    pub fn all_types() -> &'static [RunCoordinatorType] {
        &[Self::Queued, Self::Custom]
    }

    /// The string identifier used in values files.
    ///
    /// Must match the serde serialization format and the variants declared
    /// by [`run_coordinator_schema`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "QueuedRunCoordinator",
            Self::Custom => "CustomRunCoordinator",
        }
    }

    /// The `config` sub-block this type activates.
    pub fn config_block(&self) -> &'static str {
        match self {
            Self::Queued => "queuedRunCoordinator",
            Self::Custom => "customRunCoordinator",
        }
    }
}

impl fmt::Display for RunCoordinatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunCoordinatorType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "QueuedRunCoordinator" => Ok(Self::Queued),
            "CustomRunCoordinator" => Ok(Self::Custom),
            other => Err(format!("unknown run coordinator type: {other}")),
        }
    }
}

/// Per-tag concurrency limit entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TagConcurrencyLimit {
    /// Tag key the limit applies to.
    pub key: String,
    /// Tag value match: a literal, or a unique-value rule.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<TagConcurrencyLimitValue>,
    /// Maximum concurrent runs carrying the tag.
    pub limit: i64,
}

/// Value side of a tag concurrency limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagConcurrencyLimitValue {
    /// Match this literal tag value.
    Literal(String),
    /// Apply the limit per unique tag value.
    PerUnique {
        /// Whether each distinct value gets its own limit.
        #[serde(rename = "applyLimitPerUniqueValue")]
        apply_limit_per_unique_value: bool,
    },
}

/// Blocking behavior for runs limited by op concurrency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BlockOpConcurrencyLimitedRuns {
    /// Whether blocking is enabled.
    pub enabled: bool,
    /// Extra slots held back before blocking.
    pub op_concurrency_slot_buffer: i64,
}

/// Settings for the built-in queued run coordinator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct QueuedRunCoordinatorConfig {
    /// Cap on runs in progress at once.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_concurrent_runs: Option<IntSource>,
    /// Per-tag concurrency limits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_concurrency_limits: Option<Vec<TagConcurrencyLimit>>,
    /// Seconds between dequeue passes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dequeue_interval_seconds: Option<IntSource>,
    /// Worker count for dequeueing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dequeue_num_workers: Option<IntSource>,
    /// Whether dequeueing uses a thread pool.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dequeue_use_threads: Option<bool>,
    /// Blocking policy for op-concurrency-limited runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_op_concurrency_limited_runs: Option<BlockOpConcurrencyLimitedRuns>,
}

/// A user-supplied coordinator implementation: module, class, and free-form
/// config handed to it verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigurableClass {
    /// Python-style module path of the implementation.
    pub module: String,
    /// Class name within the module.
    #[serde(rename = "class")]
    pub class_name: String,
    /// Opaque config mapping passed to the class.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
}

/// The coordinator choice a validated document resolves to.
///
/// Exactly one variant, chosen by the `type` discriminator — mismatched
/// combinations are unrepresentable.
#[derive(Debug, Clone, PartialEq)]
pub enum RunCoordinatorSelection {
    /// Built-in queued coordinator with its settings.
    Queued(QueuedRunCoordinatorConfig),
    /// User-supplied coordinator class.
    Custom(ConfigurableClass),
}

/// Typed run coordinator block.
#[derive(Debug, Clone, PartialEq)]
pub struct RunCoordinator {
    /// Whether the coordinator is enabled.
    pub enabled: bool,
    /// The selected implementation and its settings.
    pub selection: RunCoordinatorSelection,
}

impl RunCoordinator {
    /// The discriminator value this selection corresponds to.
    pub fn coordinator_type(&self) -> RunCoordinatorType {
        match self.selection {
            RunCoordinatorSelection::Queued(_) => RunCoordinatorType::Queued,
            RunCoordinatorSelection::Custom(_) => RunCoordinatorType::Custom,
        }
    }

    /// Convert a validated run-coordinator document.
    ///
    /// # Errors
    ///
    /// Returns [`ChartError::Conversion`] if the tree does not map onto the
    /// typed model — possible only for documents that bypassed validation.
    pub fn from_validated(doc: &ValidatedDocument) -> Result<Self, ChartError> {
        Ok(serde_json::from_value(doc.value().clone())?)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawRunCoordinator {
    enabled: bool,
    #[serde(rename = "type", default)]
    ty: RunCoordinatorType,
    #[serde(default)]
    config: RawCoordinatorConfig,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawCoordinatorConfig {
    queued_run_coordinator: Option<QueuedRunCoordinatorConfig>,
    custom_run_coordinator: Option<ConfigurableClass>,
}

impl<'de> Deserialize<'de> for RunCoordinator {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawRunCoordinator::deserialize(deserializer)?;
        let selection = match raw.ty {
            RunCoordinatorType::Queued => RunCoordinatorSelection::Queued(
                raw.config.queued_run_coordinator.unwrap_or_default(),
            ),
            RunCoordinatorType::Custom => RunCoordinatorSelection::Custom(
                raw.config.custom_run_coordinator.ok_or_else(|| {
                    serde::de::Error::custom(
                        "type is CustomRunCoordinator but config.customRunCoordinator is absent",
                    )
                })?,
            ),
        };
        Ok(RunCoordinator {
            enabled: raw.enabled,
            selection,
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RawCoordinatorConfigOut<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    queued_run_coordinator: Option<&'a QueuedRunCoordinatorConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    custom_run_coordinator: Option<&'a ConfigurableClass>,
}

impl Serialize for RunCoordinator {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let config = match &self.selection {
            RunCoordinatorSelection::Queued(cfg) => RawCoordinatorConfigOut {
                queued_run_coordinator: Some(cfg),
                custom_run_coordinator: None,
            },
            RunCoordinatorSelection::Custom(cfg) => RawCoordinatorConfigOut {
                queued_run_coordinator: None,
                custom_run_coordinator: Some(cfg),
            },
        };
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("enabled", &self.enabled)?;
        map.serialize_entry("type", self.coordinator_type().as_str())?;
        map.serialize_entry("config", &config)?;
        map.end()
    }
}

/// Schema for a [`TagConcurrencyLimit`] entry.
fn tag_concurrency_limit_schema() -> Result<ObjectSchema, SchemaError> {
    let per_unique = ObjectSchema::builder("TagConcurrencyLimitConfig")
        .required("applyLimitPerUniqueValue", FieldType::Bool)
        .build()?;
    ObjectSchema::builder("TagConcurrencyLimit")
        .required("key", FieldType::String)
        .optional(
            "value",
            FieldType::OneOf(vec![FieldType::String, FieldType::Object(per_unique)]),
        )
        .required("limit", FieldType::Int)
        .build()
}

/// Schema for the queued coordinator's settings block.
fn queued_config_schema() -> Result<ObjectSchema, SchemaError> {
    let block_runs = ObjectSchema::builder("BlockOpConcurrencyLimitedRuns")
        .required("enabled", FieldType::Bool)
        .required("opConcurrencySlotBuffer", FieldType::Int)
        .build()?;
    ObjectSchema::builder("QueuedRunCoordinatorConfig")
        .optional("maxConcurrentRuns", int_source())
        .optional(
            "tagConcurrencyLimits",
            FieldType::List(Box::new(FieldType::Object(tag_concurrency_limit_schema()?))),
        )
        .optional("dequeueIntervalSeconds", int_source())
        .optional("dequeueNumWorkers", int_source())
        .optional("dequeueUseThreads", FieldType::Bool)
        .optional("blockOpConcurrencyLimitedRuns", FieldType::Object(block_runs))
        .build()
}

/// Schema for a [`ConfigurableClass`] block.
fn configurable_class_schema() -> Result<ObjectSchema, SchemaError> {
    ObjectSchema::builder("ConfigurableClass")
        .required("module", FieldType::String)
        .required("class", FieldType::String)
        .optional("config", FieldType::Map(Box::new(FieldType::Any)))
        .build()
}

/// Schema for the run coordinator block.
///
/// `type` defaults to the queued coordinator; the conditional group
/// resolves its blocks inside the sibling `config` object.
///
/// # Errors
///
/// Returns a [`SchemaError`] only if the static definition is malformed —
/// a bug in this crate, caught by its tests.
pub fn run_coordinator_schema() -> Result<ObjectSchema, SchemaError> {
    let config = ObjectSchema::builder("RunCoordinatorConfig")
        .optional("queuedRunCoordinator", FieldType::Object(queued_config_schema()?))
        .optional("customRunCoordinator", FieldType::Object(configurable_class_schema()?))
        .build()?;

    ObjectSchema::builder("RunCoordinator")
        .required("enabled", FieldType::Bool)
        .optional_with_default(
            "type",
            enum_of(RunCoordinatorType::all_types().iter().map(|t| t.as_str())),
            json!(RunCoordinatorType::default().as_str()),
        )
        .required("config", FieldType::Object(config))
        .conditional(
            ConditionalGroup::new("type")
                .within("config")
                .map(
                    RunCoordinatorType::Queued.as_str(),
                    RunCoordinatorType::Queued.config_block(),
                )
                .map(
                    RunCoordinatorType::Custom.as_str(),
                    RunCoordinatorType::Custom.config_block(),
                ),
        )
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chartval_schema::validate;
    use serde_json::json;

    #[test]
    fn test_schema_builds() {
        run_coordinator_schema().unwrap();
    }

    #[test]
    fn test_queued_document_converts() {
        let schema = run_coordinator_schema().unwrap();
        let doc = json!({
            "enabled": true,
            "type": "QueuedRunCoordinator",
            "config": {
                "queuedRunCoordinator": {
                    "maxConcurrentRuns": 25,
                    "dequeueUseThreads": true,
                    "tagConcurrencyLimits": [
                        {"key": "database", "value": "redshift", "limit": 4},
                        {"key": "user", "value": {"applyLimitPerUniqueValue": true}, "limit": 1}
                    ]
                }
            }
        });
        let validated = validate(&schema, &doc).unwrap();
        let coordinator = RunCoordinator::from_validated(&validated).unwrap();
        assert_eq!(coordinator.coordinator_type(), RunCoordinatorType::Queued);
        let RunCoordinatorSelection::Queued(cfg) = &coordinator.selection else {
            panic!("expected queued selection");
        };
        assert_eq!(cfg.max_concurrent_runs, Some(IntSource::Int(25)));
        assert_eq!(cfg.dequeue_use_threads, Some(true));
        let limits = cfg.tag_concurrency_limits.as_ref().unwrap();
        assert_eq!(limits.len(), 2);
        assert_eq!(
            limits[1].value,
            Some(TagConcurrencyLimitValue::PerUnique {
                apply_limit_per_unique_value: true
            })
        );
    }

    #[test]
    fn test_custom_document_converts() {
        let schema = run_coordinator_schema().unwrap();
        let doc = json!({
            "enabled": true,
            "type": "CustomRunCoordinator",
            "config": {
                "customRunCoordinator": {
                    "module": "my_module.coordinators",
                    "class": "PriorityCoordinator",
                    "config": {"tier": "gold"}
                }
            }
        });
        let validated = validate(&schema, &doc).unwrap();
        let coordinator = RunCoordinator::from_validated(&validated).unwrap();
        let RunCoordinatorSelection::Custom(cfg) = &coordinator.selection else {
            panic!("expected custom selection");
        };
        assert_eq!(cfg.class_name, "PriorityCoordinator");
        assert_eq!(cfg.config, Some(json!({"tier": "gold"})));
    }

    #[test]
    fn test_omitted_type_defaults_to_queued() {
        let schema = run_coordinator_schema().unwrap();
        let doc = json!({
            "enabled": true,
            "config": {"queuedRunCoordinator": {"maxConcurrentRuns": "MAX_RUNS"}}
        });
        let validated = validate(&schema, &doc).unwrap();
        let coordinator = RunCoordinator::from_validated(&validated).unwrap();
        assert_eq!(coordinator.coordinator_type(), RunCoordinatorType::Queued);
        let RunCoordinatorSelection::Queued(cfg) = &coordinator.selection else {
            panic!("expected queued selection");
        };
        assert_eq!(
            cfg.max_concurrent_runs,
            Some(IntSource::Source("MAX_RUNS".to_string()))
        );
    }

    #[test]
    fn test_wrong_block_rejected() {
        let schema = run_coordinator_schema().unwrap();
        let doc = json!({
            "enabled": true,
            "type": "QueuedRunCoordinator",
            "config": {
                "customRunCoordinator": {"module": "m", "class": "C"}
            }
        });
        let err = validate(&schema, &doc).unwrap_err();
        assert!(err.contains_kind(chartval_core::ViolationKind::ConditionalBlockMissing));
        assert!(err.contains_kind(chartval_core::ViolationKind::ConditionalBlockConflict));
    }

    #[test]
    fn test_unknown_queued_setting_rejected() {
        let schema = run_coordinator_schema().unwrap();
        let doc = json!({
            "enabled": true,
            "config": {"queuedRunCoordinator": {"maxConcurentRuns": 5}}
        });
        let err = validate(&schema, &doc).unwrap_err();
        assert!(err.contains_kind(chartval_core::ViolationKind::UnknownField));
    }

    #[test]
    fn test_round_trip_serialization() {
        let coordinator = RunCoordinator {
            enabled: true,
            selection: RunCoordinatorSelection::Queued(QueuedRunCoordinatorConfig {
                max_concurrent_runs: Some(IntSource::Int(10)),
                ..QueuedRunCoordinatorConfig::default()
            }),
        };
        let value = serde_json::to_value(&coordinator).unwrap();
        assert_eq!(value["type"], "QueuedRunCoordinator");
        assert_eq!(value["config"]["queuedRunCoordinator"]["maxConcurrentRuns"], 10);
        let back: RunCoordinator = serde_json::from_value(value).unwrap();
        assert_eq!(back, coordinator);
    }

    #[test]
    fn test_type_parsing() {
        assert_eq!(
            "QueuedRunCoordinator".parse::<RunCoordinatorType>().unwrap(),
            RunCoordinatorType::Queued
        );
        assert!("Sporadic".parse::<RunCoordinatorType>().is_err());
        assert_eq!(RunCoordinatorType::Custom.to_string(), "CustomRunCoordinator");
    }
}
