//! Asset Catalog Core
//!
//! Runs reconciliation across every locale bundle of a content catalog.
//!
//! # Architecture
//!
//! ```text
//! ObjectStore ──list/fetch──► CatalogAggregator
//!                              ├─ ParserRegistry      (bytes → tree)
//!                              ├─ ReferenceExtractor  (tree → references)
//!                              ├─ ReconciliationEngine (per-locale sets)
//!                              ├─ TaxonomyValidator   (naming findings)
//!                              └─ GlobalUsageSet      (run-wide merge)
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use catalog_core::{CatalogAggregator, CatalogConfig, LocalFsStore};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), catalog_core::CatalogError> {
//! let config = CatalogConfig::load("catalog.toml")?.with_env_overrides()?;
//! let store = Arc::new(LocalFsStore::new("./container"));
//! let report = CatalogAggregator::new(store, config)?.run_configured().await?;
//! println!("{} assets unused by every locale", report.globally_unused.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod aggregator;
pub mod cache;
pub mod config;
pub mod error;
pub mod report;
pub mod store;

pub use aggregator::CatalogAggregator;
pub use cache::ListingCache;
pub use config::{CatalogConfig, DiscoveryConfig, LocaleSource};
pub use error::{CatalogError, CatalogResult, FailureKind, StoreError};
pub use report::{CatalogReport, LocaleFailure, LocaleReport};
pub use store::{LocalFsStore, MemoryStore, ObjectEntry, ObjectStore};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::aggregator::CatalogAggregator;
    pub use crate::config::{CatalogConfig, DiscoveryConfig, LocaleSource};
    pub use crate::error::{CatalogError, CatalogResult, StoreError};
    pub use crate::report::{CatalogReport, LocaleFailure, LocaleReport};
    pub use crate::store::{LocalFsStore, MemoryStore, ObjectEntry, ObjectStore};
    pub use catalog_model::{LocaleId, NormalizedPath};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
