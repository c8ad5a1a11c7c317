//! Parsed content documents

use crate::error::{DocumentError, DocumentResult};
use serde_json::Value;

/// A content bundle parsed into a generic tree
///
/// Keeps the raw source text next to the tree so diagnostics can be mapped
/// back to lines.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentDocument {
    name: String,
    root: Value,
    source: String,
}

impl ContentDocument {
    /// Create a document from a parsed tree and its source text
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, root: Value, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            root,
            source: source.into(),
        }
    }

    /// Create a document from a tree alone, rendering pretty JSON as its source
    #[must_use]
    pub fn from_value(name: impl Into<String>, root: Value) -> Self {
        let source = serde_json::to_string_pretty(&root).unwrap_or_default();
        Self::new(name, root, source)
    }

    /// Document name (usually its object path)
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Root of the tree
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Raw source text
    #[inline]
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Check the root is a mapping or sequence
    ///
    /// # Errors
    /// Returns [`DocumentError::ScalarRoot`] for scalar roots.
    pub fn ensure_tree(&self) -> DocumentResult<()> {
        match self.root {
            Value::Object(_) | Value::Array(_) => Ok(()),
            _ => Err(DocumentError::ScalarRoot {
                document: self.name.clone(),
            }),
        }
    }

    /// Check every required top-level field is present
    ///
    /// Only mapping roots can carry fields; a sequence root fails as soon as
    /// any field is required.
    ///
    /// # Errors
    /// Returns [`DocumentError::MissingField`] for the first absent field.
    pub fn require_fields<S: AsRef<str>>(&self, fields: &[S]) -> DocumentResult<()> {
        for field in fields {
            let field = field.as_ref();
            let present = self
                .root
                .as_object()
                .is_some_and(|map| map.contains_key(field));
            if !present {
                return Err(DocumentError::missing_field(&self.name, field));
            }
        }
        Ok(())
    }
}
