//! Values that can be given literally or sourced from the environment.

use serde::{Deserialize, Serialize};

use chartval_core::FieldType;

/// An integer setting that may instead name an environment source.
///
/// Chart values like `maxConcurrentRuns` accept either a literal integer
/// or a string resolved by the deployment layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IntSource {
    /// Literal integer.
    Int(i64),
    /// Environment source reference, resolved downstream.
    Source(String),
}

/// Field type for an [`IntSource`]-valued setting.
pub fn int_source() -> FieldType {
    FieldType::OneOf(vec![FieldType::Int, FieldType::String])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_int_source_untagged() {
        let literal: IntSource = serde_json::from_value(json!(25)).unwrap();
        assert_eq!(literal, IntSource::Int(25));
        let sourced: IntSource = serde_json::from_value(json!("MAX_CONCURRENT_RUNS")).unwrap();
        assert_eq!(sourced, IntSource::Source("MAX_CONCURRENT_RUNS".to_string()));
        assert!(serde_json::from_value::<IntSource>(json!(true)).is_err());
    }
}
