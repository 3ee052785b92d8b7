//! # Document Loading
//!
//! Reads values files from disk into the `serde_json::Value` tree the
//! validator consumes. YAML is converted through an explicit step rather
//! than a serde round-trip so that unsupported constructs (non-scalar
//! mapping keys, floats JSON cannot represent) are rejected with a clear
//! reason instead of silently mangled.

use std::path::Path;

use serde_json::Value;
use thiserror::Error;

/// Error loading or parsing a values document.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The file could not be read.
    #[error("cannot read '{path}': {reason}")]
    Unreadable {
        /// Path to the document.
        path: String,
        /// Underlying I/O failure.
        reason: String,
    },

    /// The file is not valid YAML.
    #[error("invalid YAML in '{path}': {reason}")]
    InvalidYaml {
        /// Path to the document.
        path: String,
        /// Parser failure.
        reason: String,
    },

    /// The file is not valid JSON.
    #[error("invalid JSON in '{path}': {reason}")]
    InvalidJson {
        /// Path to the document.
        path: String,
        /// Parser failure.
        reason: String,
    },

    /// The YAML parsed but uses constructs JSON cannot represent.
    #[error("'{path}' is not JSON-representable: {reason}")]
    NotRepresentable {
        /// Path to the document.
        path: String,
        /// What could not be converted.
        reason: String,
    },
}

/// Load a values file as a JSON value tree.
///
/// The format is sniffed from the extension: `.yaml`/`.yml` parse as YAML
/// (then convert), anything else parses as JSON.
///
/// # Errors
///
/// Returns a [`DocumentError`] if the file cannot be read, parsed, or
/// converted.
pub fn load_document(path: &Path) -> Result<Value, DocumentError> {
    let display = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|e| DocumentError::Unreadable {
        path: display.clone(),
        reason: e.to_string(),
    })?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext {
        "yaml" | "yml" => {
            let yaml: serde_yaml::Value =
                serde_yaml::from_str(&content).map_err(|e| DocumentError::InvalidYaml {
                    path: display.clone(),
                    reason: e.to_string(),
                })?;
            yaml_to_json(&yaml).map_err(|reason| DocumentError::NotRepresentable {
                path: display,
                reason,
            })
        }
        _ => serde_json::from_str(&content).map_err(|e| DocumentError::InvalidJson {
            path: display,
            reason: e.to_string(),
        }),
    }
}

/// Convert a `serde_yaml::Value` to a `serde_json::Value`.
///
/// Values files use only the JSON-compatible subset of YAML; anything
/// outside it (non-scalar mapping keys, NaN/infinite floats) is an error.
/// YAML tags are ignored and the inner value converted.
pub fn yaml_to_json(yaml: &serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(serde_json::Number::from(i)))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Number(serde_json::Number::from(u)))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot represent float {f} in JSON"))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => {
            let items: Result<Vec<Value>, String> = seq.iter().map(yaml_to_json).collect();
            Ok(Value::Array(items?))
        }
        serde_yaml::Value::Mapping(map) => {
            let mut json_map = serde_json::Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => return Err(format!("unsupported YAML map key type: {other:?}")),
                };
                json_map.insert(key, yaml_to_json(v)?);
            }
            Ok(Value::Object(json_map))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(&tagged.value),
    }
}
