//! Local directory mirror of a blob container
//!
//! Object paths are `/`-separated and relative to the root directory.

use super::{validate_object_path, ObjectEntry, ObjectStore};
use crate::error::StoreError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Object store reading a directory tree
#[derive(Debug, Clone)]
pub struct LocalFsStore {
    root: PathBuf,
}

impl LocalFsStore {
    /// Create a store rooted at `root`
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, StoreError> {
        validate_object_path(path)?;
        Ok(path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .fold(self.root.clone(), |acc, segment| acc.join(segment)))
    }
}

#[async_trait]
impl ObjectStore for LocalFsStore {
    async fn list_objects(&self, prefix: &str) -> Result<Vec<ObjectEntry>, StoreError> {
        // Start from the deepest directory the prefix names
        let base = prefix.rfind('/').map_or("", |idx| &prefix[..idx]);
        let start = self.resolve(base)?;

        let mut entries = Vec::new();
        let mut pending = vec![(start, base.to_string())];

        while let Some((dir, relative)) = pending.pop() {
            let mut reader = match tokio::fs::read_dir(&dir).await {
                Ok(reader) => reader,
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => continue,
                Err(err) => return Err(StoreError::from_io(relative, &err)),
            };

            while let Some(entry) = reader
                .next_entry()
                .await
                .map_err(|err| StoreError::from_io(relative.as_str(), &err))?
            {
                let name = entry.file_name().to_string_lossy().into_owned();
                let path = if relative.is_empty() {
                    name
                } else {
                    format!("{relative}/{name}")
                };
                let file_type = entry
                    .file_type()
                    .await
                    .map_err(|err| StoreError::from_io(path.as_str(), &err))?;

                if file_type.is_dir() {
                    pending.push((entry.path(), path));
                } else if file_type.is_file() && path.starts_with(prefix) {
                    let size = entry.metadata().await.ok().map(|m| m.len());
                    entries.push(ObjectEntry { path, size });
                }
            }
        }

        entries.sort();
        tracing::debug!(
            store = "local-fs",
            prefix,
            objects = entries.len(),
            "listed objects"
        );
        Ok(entries)
    }

    async fn fetch_object(&self, path: &str) -> Result<Vec<u8>, StoreError> {
        let full = self.resolve(path)?;
        tokio::fs::read(&full)
            .await
            .map_err(|err| StoreError::from_io(path, &err))
    }

    fn name(&self) -> &'static str {
        "local-fs"
    }
}
