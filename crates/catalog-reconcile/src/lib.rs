//! Asset Catalog Reconciliation
//!
//! Pure set algebra over normalized paths.
//!
//! # Core Concepts
//!
//! - [`ReconciliationEngine`]: common/missing/orphaned sets, raw duplicate
//!   detection and the invariant self-check
//! - [`ReconciliationResult`]: the three sets for one locale
//! - [`GlobalUsageSet`]: paths referenced by any locale in a run
//! - [`InvariantBreach`]: a result that does not account for its inputs
//!
//! # Example
//!
//! ```rust
//! use catalog_model::NormalizedPath;
//! use catalog_reconcile::ReconciliationEngine;
//! use std::collections::BTreeSet;
//!
//! let references: BTreeSet<_> = ["/x.png"].into_iter().map(NormalizedPath::new).collect();
//! let listing: BTreeSet<_> = ["/x.png", "/z.png"].into_iter().map(NormalizedPath::new).collect();
//!
//! let result = ReconciliationEngine::new().reconcile_checked(&references, &listing).unwrap();
//! assert_eq!(result.missing.len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod engine;
mod error;
mod result;
mod usage;

pub use engine::{InvariantCheck, ReconciliationEngine};
pub use error::{Identity, IdentityDiagnostic, InvariantBreach};
pub use result::ReconciliationResult;
pub use usage::GlobalUsageSet;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
