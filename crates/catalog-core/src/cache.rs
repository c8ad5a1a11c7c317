//! Shared listing cache using moka
//!
//! Listings are fetched once per prefix per run. Concurrent requests for the
//! same prefix wait on a single fetch and share its outcome.

use crate::error::StoreError;
use crate::store::{ObjectEntry, ObjectStore};
use moka::future::Cache;
use std::sync::Arc;

/// Per-run cache of prefix listings
#[derive(Debug, Clone)]
pub struct ListingCache {
    store: Arc<dyn ObjectStore>,
    inner: Cache<String, Arc<Vec<ObjectEntry>>>,
}

impl ListingCache {
    /// Create a cache in front of `store`
    #[must_use]
    pub fn new(store: Arc<dyn ObjectStore>, max_capacity: u64) -> Self {
        Self {
            store,
            inner: Cache::new(max_capacity),
        }
    }

    /// Listing for `prefix`, fetching it on first use
    ///
    /// # Errors
    /// Returns the store's error; failed listings are not cached.
    pub async fn list(&self, prefix: &str) -> Result<Arc<Vec<ObjectEntry>>, StoreError> {
        let store = Arc::clone(&self.store);
        let key = prefix.to_string();
        self.inner
            .try_get_with(key.clone(), async move {
                let entries = store.list_objects(&key).await?;
                tracing::debug!(
                    backend = store.name(),
                    prefix = %key,
                    objects = entries.len(),
                    "fetched listing"
                );
                Ok::<_, StoreError>(Arc::new(entries))
            })
            .await
            .map_err(|err| StoreError::clone(&err))
    }

    /// Whether `prefix` has been fetched successfully
    #[must_use]
    pub fn contains(&self, prefix: &str) -> bool {
        self.inner.contains_key(prefix)
    }
}
