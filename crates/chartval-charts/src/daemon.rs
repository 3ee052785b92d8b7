//! # Daemon Chart Values
//!
//! The daemon deployment block: coordinator policy, retry/monitoring
//! knobs, and a long tail of Kubernetes pod/container wiring. The wiring
//! is opaque passthrough — declared so unknown top-level fields are still
//! caught, but with no semantics beyond copying the value into the output.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use chartval_core::{FieldType, ObjectSchema, SchemaError};
use chartval_schema::ValidatedDocument;

use crate::coordinator::{run_coordinator_schema, RunCoordinator};
use crate::ChartError;

/// Container image reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Image {
    /// Image repository.
    pub repository: String,
    /// Image tag; numeric tags in unquoted YAML arrive as integers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<ImageTag>,
    /// Kubernetes pull policy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pull_policy: Option<String>,
}

/// Image tag: a string, or a bare integer from unquoted YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageTag {
    /// String tag.
    Tag(String),
    /// Unquoted numeric tag.
    Numeric(i64),
}

/// Retry policy for failed runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RunRetries {
    /// Whether automatic retries are enabled.
    pub enabled: bool,
    /// Retry cap per run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<i64>,
    /// Whether asset/op failures retry as well.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_on_asset_or_op_failure: Option<bool>,
}

/// Worker settings shared by the sensor and schedule evaluators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WorkerSettings {
    /// Whether evaluation uses a thread pool.
    pub use_threads: bool,
    /// Evaluation worker count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_workers: Option<i64>,
    /// Submission worker count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_submit_workers: Option<i64>,
}

/// Typed daemon deployment block.
///
/// Kubernetes wiring fields are `Value`/`Vec<Value>` passthrough; their
/// contents are consumed verbatim by the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Daemon {
    /// Whether the daemon is deployed at all.
    pub enabled: bool,
    /// Daemon container image.
    pub image: Image,
    /// Run coordinator policy.
    pub run_coordinator: RunCoordinator,
    /// Seconds of missed heartbeats tolerated before unhealthy.
    pub heartbeat_tolerance: i64,
    /// Env as a mapping or an explicit EnvVar list.
    pub env: Value,
    /// ConfigMap env sources.
    pub env_config_maps: Vec<Value>,
    /// Secret env sources.
    pub env_secrets: Vec<Value>,
    /// Labels on the deployment object.
    pub deployment_labels: BTreeMap<String, String>,
    /// Labels on the pod template.
    pub labels: BTreeMap<String, String>,
    /// Node selector passthrough.
    pub node_selector: Value,
    /// Affinity passthrough.
    pub affinity: Value,
    /// Tolerations passthrough.
    pub tolerations: Value,
    /// Pod security context passthrough.
    pub pod_security_context: Value,
    /// Container security context passthrough.
    pub security_context: Value,
    /// Resource requests/limits passthrough.
    pub resources: Value,
    /// Liveness probe passthrough.
    pub liveness_probe: Value,
    /// Readiness probe passthrough.
    pub readiness_probe: Value,
    /// Startup probe passthrough.
    pub startup_probe: Value,
    /// Pod annotations passthrough.
    pub annotations: Value,
    /// Run monitoring settings, free-form.
    pub run_monitoring: Value,
    /// Retry policy for failed runs.
    pub run_retries: RunRetries,
    /// Sensor evaluator workers.
    pub sensors: WorkerSettings,
    /// Schedule evaluator workers.
    pub schedules: WorkerSettings,
    /// Custom scheduler name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduler_name: Option<String>,
    /// Volume mounts passthrough.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_mounts: Option<Vec<Value>>,
    /// Volumes passthrough.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volumes: Option<Vec<Value>>,
    /// Init container resources passthrough.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub init_container_resources: Option<Value>,
    /// Extra containers passthrough.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_containers: Option<Vec<Value>>,
    /// Init containers prepended before the defaults.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_prepended_init_containers: Option<Vec<Value>>,
}

impl Daemon {
    /// Convert a validated daemon document.
    ///
    /// # Errors
    ///
    /// Returns [`ChartError::Conversion`] if the tree does not map onto the
    /// typed model — possible only for documents that bypassed validation.
    pub fn from_validated(doc: &ValidatedDocument) -> Result<Self, ChartError> {
        Ok(serde_json::from_value(doc.value().clone())?)
    }
}

fn image_schema() -> Result<ObjectSchema, SchemaError> {
    ObjectSchema::builder("Image")
        .required("repository", FieldType::String)
        .optional("tag", FieldType::OneOf(vec![FieldType::String, FieldType::Int]))
        .optional("pullPolicy", FieldType::String)
        .build()
}

fn run_retries_schema() -> Result<ObjectSchema, SchemaError> {
    ObjectSchema::builder("RunRetries")
        .required("enabled", FieldType::Bool)
        .optional("maxRetries", FieldType::Int)
        .optional("retryOnAssetOrOpFailure", FieldType::Bool)
        .build()
}

fn worker_settings_schema(name: &str) -> Result<ObjectSchema, SchemaError> {
    ObjectSchema::builder(name)
        .required("useThreads", FieldType::Bool)
        .optional("numWorkers", FieldType::Int)
        .optional("numSubmitWorkers", FieldType::Int)
        .build()
}

/// Schema for the daemon deployment block.
///
/// # Errors
///
/// Returns a [`SchemaError`] only if the static definition is malformed —
/// a bug in this crate, caught by its tests.
pub fn daemon_schema() -> Result<ObjectSchema, SchemaError> {
    let any = || FieldType::Any;
    let any_list = || FieldType::List(Box::new(FieldType::Any));
    let string_map = || FieldType::Map(Box::new(FieldType::String));

    ObjectSchema::builder("Daemon")
        .required("enabled", FieldType::Bool)
        .required("image", FieldType::Object(image_schema()?))
        .required("runCoordinator", FieldType::Object(run_coordinator_schema()?))
        .required("heartbeatTolerance", FieldType::Int)
        .required("env", FieldType::OneOf(vec![string_map(), any_list()]))
        .required("envConfigMaps", any_list())
        .required("envSecrets", any_list())
        .required("deploymentLabels", string_map())
        .required("labels", string_map())
        .required("nodeSelector", any())
        .required("affinity", any())
        .required("tolerations", any())
        .required("podSecurityContext", any())
        .required("securityContext", any())
        .required("resources", any())
        .required("livenessProbe", any())
        .required("readinessProbe", any())
        .required("startupProbe", any())
        .required("annotations", any())
        .required("runMonitoring", FieldType::Map(Box::new(FieldType::Any)))
        .required("runRetries", FieldType::Object(run_retries_schema()?))
        .required("sensors", FieldType::Object(worker_settings_schema("Sensors")?))
        .required("schedules", FieldType::Object(worker_settings_schema("Schedules")?))
        .optional("schedulerName", FieldType::String)
        .optional("volumeMounts", any_list())
        .optional("volumes", any_list())
        .optional("initContainerResources", any())
        .optional("extraContainers", any_list())
        .optional("extraPrependedInitContainers", any_list())
        .build()
}
