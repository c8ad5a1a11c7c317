//! In-memory object store

use super::{ObjectEntry, ObjectStore};
use crate::error::StoreError;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// Object store backed by a map, for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Create an empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an object
    pub fn insert(&self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.objects.write().insert(path.into(), bytes.into());
    }

    /// Builder form of [`MemoryStore::insert`]
    #[must_use]
    pub fn with_object(self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(path, bytes);
        self
    }

    /// Number of stored objects
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    /// True when the store holds nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list_objects(&self, prefix: &str) -> Result<Vec<ObjectEntry>, StoreError> {
        let objects = self.objects.read();
        Ok(objects
            .range(prefix.to_string()..)
            .take_while(|(path, _)| path.starts_with(prefix))
            .map(|(path, bytes)| ObjectEntry::new(path.clone()).with_size(bytes.len() as u64))
            .collect())
    }

    async fn fetch_object(&self, path: &str) -> Result<Vec<u8>, StoreError> {
        self.objects
            .read()
            .get(path)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                path: path.to_string(),
            })
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
