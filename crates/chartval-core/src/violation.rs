//! # Validation Violations
//!
//! Structured, machine-readable validation failures. Every violation carries
//! the path to the offending field, a [`ViolationKind`] discriminating the
//! failure class, and a human-readable message. Violations are accumulated —
//! the validator never stops at the first problem — so a caller can report
//! everything wrong with a document in one pass.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::path::FieldPath;

/// Classification of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// A required field is absent from the input document.
    MissingRequiredField,
    /// The input value's shape does not match the declared field type.
    TypeMismatch,
    /// An enum-typed field holds a value outside its declared variants.
    InvalidEnumValue,
    /// The sub-block selected by a discriminator is absent.
    ConditionalBlockMissing,
    /// A non-selected sibling sub-block is present with non-default content.
    ConditionalBlockConflict,
    /// The input contains a field the schema does not declare.
    UnknownField,
}

impl ViolationKind {
    /// Returns the snake_case string identifier for this kind.
    ///
    /// Matches the serde serialization format, for CLI and log output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingRequiredField => "missing_required_field",
            Self::TypeMismatch => "type_mismatch",
            Self::InvalidEnumValue => "invalid_enum_value",
            Self::ConditionalBlockMissing => "conditional_block_missing",
            Self::ConditionalBlockConflict => "conditional_block_conflict",
            Self::UnknownField => "unknown_field",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single validation violation with structured context.
#[derive(Debug, Clone)]
pub struct Violation {
    /// Path to the violating field in the input document.
    pub path: FieldPath,
    /// Failure classification.
    pub kind: ViolationKind,
    /// Human-readable description of the violation.
    pub message: String,
}

impl Violation {
    /// Create a violation at `path`.
    pub fn new(path: FieldPath, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            path,
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "  (root): {}", self.message)
        } else {
            write!(f, "  {}: {}", self.path, self.message)
        }
    }
}

/// Collection of validation violations.
///
/// Guaranteed non-empty when returned from a failed validation — success
/// returns a validated document instead.
#[derive(Debug, Clone, Default)]
pub struct Violations {
    violations: Vec<Violation>,
}

impl Violations {
    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }

    /// Returns true if any violation has the given kind.
    pub fn contains_kind(&self, kind: ViolationKind) -> bool {
        self.violations.iter().any(|v| v.kind == kind)
    }
}

impl From<Vec<Violation>> for Violations {
    fn from(violations: Vec<Violation>) -> Self {
        Self { violations }
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}
