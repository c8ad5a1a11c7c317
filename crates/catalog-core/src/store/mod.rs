//! Object store seam
//!
//! The aggregator only ever lists objects under a prefix and fetches an
//! object's bytes. It never writes or deletes.

use crate::error::StoreError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

mod fs;
mod memory;

pub use fs::LocalFsStore;
pub use memory::MemoryStore;

/// One listed object
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectEntry {
    /// Object path as the store names it
    pub path: String,
    /// Size in bytes, when the store reports it
    pub size: Option<u64>,
}

impl ObjectEntry {
    /// Create an entry without size metadata
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            size: None,
        }
    }

    /// Attach a size
    #[inline]
    #[must_use]
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }
}

/// Read-only access to a blob container
#[async_trait]
pub trait ObjectStore: Send + Sync + std::fmt::Debug {
    /// Every object whose path starts with `prefix`
    ///
    /// # Errors
    /// Returns [`StoreError`] when the listing cannot be produced.
    async fn list_objects(&self, prefix: &str) -> Result<Vec<ObjectEntry>, StoreError>;

    /// Raw bytes of one object
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] for absent objects.
    async fn fetch_object(&self, path: &str) -> Result<Vec<u8>, StoreError>;

    /// Backend name for diagnostics
    fn name(&self) -> &'static str;
}

/// Reject paths that could escape a store root
pub(crate) fn validate_object_path(path: &str) -> Result<(), StoreError> {
    if path.starts_with('/') || path.starts_with('\\') {
        return Err(StoreError::invalid_path(path, "object paths must be relative"));
    }
    if path.split(['/', '\\']).any(|segment| segment == "..") {
        return Err(StoreError::invalid_path(path, "object paths must not contain '..'"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_path_validation() {
        assert!(validate_object_path("languages/en/content-bundle.json").is_ok());
        assert!(validate_object_path("").is_ok());
        assert!(validate_object_path("/etc/passwd").is_err());
        assert!(validate_object_path("images/../../secret").is_err());
        assert!(validate_object_path("images\\..\\secret").is_err());
        assert!(validate_object_path("images/..hidden.png").is_ok());
    }

    #[test]
    fn entry_builder() {
        let entry = ObjectEntry::new("images/a.png").with_size(12);
        assert_eq!(entry.size, Some(12));
    }
}
