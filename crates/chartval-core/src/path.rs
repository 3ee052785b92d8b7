//! # Field Paths
//!
//! JSON-Pointer-style paths to fields inside a configuration document,
//! e.g. `/runCoordinator/config/queuedRunCoordinator`. Paths are built
//! incrementally while the validator recurses and attached to every
//! violation so callers can point at the exact offending field.

use std::fmt;

/// Path to a field in a configuration document.
///
/// The root path is empty and displays as an empty string; violation
/// formatting substitutes `(root)` for it. Child segments are object keys,
/// index segments are list positions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// The root of the document.
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns true if this is the document root.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Extend the path with an object key, returning the child path.
    pub fn child(&self, key: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(key.to_string());
        Self { segments }
    }

    /// Extend the path with a list index, returning the element path.
    pub fn index(&self, idx: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(idx.to_string());
        Self { segments }
    }

    /// The path segments, outermost first.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}
