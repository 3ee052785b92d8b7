//! End-to-end: YAML values through conversion, validation, typed
//! consumption, and the exported JSON Schema projection.

use chartval_charts::{
    daemon_schema, migrate_schema, run_coordinator_schema, Daemon, Migrate, RunCoordinator,
    RunCoordinatorSelection, RunCoordinatorType,
};
use chartval_core::ViolationKind;
use chartval_schema::document::yaml_to_json;
use chartval_schema::{compile, json_schema, validate};
use serde_json::json;

const DAEMON_VALUES: &str = r#"
enabled: true
image:
  repository: acme/daemon
  tag: "1.8.3"
  pullPolicy: IfNotPresent
runCoordinator:
  enabled: true
  type: QueuedRunCoordinator
  config:
    queuedRunCoordinator:
      maxConcurrentRuns: 25
      dequeueIntervalSeconds: 5
      dequeueUseThreads: true
      tagConcurrencyLimits:
        - key: database
          value: redshift
          limit: 4
heartbeatTolerance: 300
env:
  LOG_LEVEL: info
envConfigMaps: []
envSecrets: []
deploymentLabels:
  team: platform
labels: {}
nodeSelector: {}
affinity: {}
tolerations: []
podSecurityContext: {}
securityContext: {}
resources:
  limits:
    cpu: 500m
livenessProbe: {}
readinessProbe: {}
startupProbe:
  enabled: false
annotations: {}
runMonitoring:
  enabled: true
runRetries:
  enabled: true
  maxRetries: 2
sensors:
  useThreads: true
  numWorkers: 4
schedules:
  useThreads: false
"#;

fn daemon_document() -> serde_json::Value {
    let yaml: serde_yaml::Value = serde_yaml::from_str(DAEMON_VALUES).unwrap();
    yaml_to_json(&yaml).unwrap()
}

#[test]
fn test_daemon_values_yaml_end_to_end() {
    let schema = daemon_schema().unwrap();
    let validated = validate(&schema, &daemon_document()).unwrap();
    let daemon = Daemon::from_validated(&validated).unwrap();
    assert_eq!(
        daemon.run_coordinator.coordinator_type(),
        RunCoordinatorType::Queued
    );
    let RunCoordinatorSelection::Queued(cfg) = &daemon.run_coordinator.selection else {
        panic!("expected queued selection");
    };
    assert_eq!(cfg.tag_concurrency_limits.as_ref().unwrap()[0].limit, 4);
}

#[test]
fn test_switched_discriminator_rejected_end_to_end() {
    let schema = daemon_schema().unwrap();
    let mut doc = daemon_document();
    // Flip the discriminator without touching the populated block.
    doc["runCoordinator"]["type"] = json!("CustomRunCoordinator");
    let err = validate(&schema, &doc).unwrap_err();
    assert!(err.contains_kind(ViolationKind::ConditionalBlockMissing));
    assert!(err.contains_kind(ViolationKind::ConditionalBlockConflict));
    let paths: Vec<String> = err
        .violations()
        .iter()
        .map(|v| v.path.to_string())
        .collect();
    assert!(paths.contains(&"/runCoordinator/config/customRunCoordinator".to_string()));
    assert!(paths.contains(&"/runCoordinator/config/queuedRunCoordinator".to_string()));
}

#[test]
fn test_exported_daemon_schema_compiles_and_agrees() {
    let schema = daemon_schema().unwrap();
    let compiled = compile(&schema).unwrap();
    let doc = daemon_document();
    assert!(compiled.is_valid(&doc));
    assert!(validate(&schema, &doc).is_ok());

    let mut bad = doc.clone();
    bad.as_object_mut().unwrap().remove("heartbeatTolerance");
    assert!(!compiled.is_valid(&bad));
    assert!(validate(&schema, &bad).is_err());
}

#[test]
fn test_exported_coordinator_schema_conditionals() {
    let schema = run_coordinator_schema().unwrap();
    let exported = json_schema(&schema);
    let all_of = exported["allOf"].as_array().unwrap();
    assert_eq!(all_of.len(), 2);
    assert_eq!(
        all_of[0]["if"]["properties"]["type"]["const"],
        json!("QueuedRunCoordinator")
    );
    assert_eq!(
        all_of[0]["then"]["properties"]["config"]["required"],
        json!(["queuedRunCoordinator"])
    );
}

#[test]
fn test_migrate_yaml_end_to_end() {
    let yaml: serde_yaml::Value = serde_yaml::from_str(
        r#"
enabled: true
customMigrateCommand:
  - alembic
  - upgrade
  - head
extraContainers: []
"#,
    )
    .unwrap();
    let doc = yaml_to_json(&yaml).unwrap();
    let schema = migrate_schema().unwrap();
    let validated = validate(&schema, &doc).unwrap();
    let migrate = Migrate::from_validated(&validated).unwrap();
    assert_eq!(migrate.custom_migrate_command.unwrap().len(), 3);
}

#[test]
fn test_coordinator_type_never_mismatches_selection() {
    // Whatever validates, the typed layer exposes the matching variant.
    let schema = run_coordinator_schema().unwrap();
    for (ty, block, body) in [
        (
            "QueuedRunCoordinator",
            "queuedRunCoordinator",
            json!({"maxConcurrentRuns": 1}),
        ),
        (
            "CustomRunCoordinator",
            "customRunCoordinator",
            json!({"module": "m", "class": "C"}),
        ),
    ] {
        let doc = json!({"enabled": true, "type": ty, "config": {block: body}});
        let validated = validate(&schema, &doc).unwrap();
        let coordinator = RunCoordinator::from_validated(&validated).unwrap();
        assert_eq!(coordinator.coordinator_type().as_str(), ty);
    }
}
