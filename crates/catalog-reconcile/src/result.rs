//! Per-locale reconciliation results

use catalog_model::NormalizedPath;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Outcome of diffing one reference set against one listing
///
/// - `common`: listed and referenced
/// - `missing`: listed but never referenced (unreferenced stored asset)
/// - `orphaned`: referenced but not listed (dangling reference)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationResult {
    /// Listing ∩ references
    pub common: BTreeSet<NormalizedPath>,
    /// Listing − references
    pub missing: BTreeSet<NormalizedPath>,
    /// References − listing
    #[serde(alias = "json_only")]
    pub orphaned: BTreeSet<NormalizedPath>,
}

impl ReconciliationResult {
    /// Number of listed paths this result accounts for
    #[inline]
    #[must_use]
    pub fn listing_len(&self) -> usize {
        self.common.len() + self.missing.len()
    }

    /// Number of referenced paths this result accounts for
    #[inline]
    #[must_use]
    pub fn references_len(&self) -> usize {
        self.common.len() + self.orphaned.len()
    }

    /// True when every reference is backed and every listed asset is used
    #[inline]
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.orphaned.is_empty()
    }

    /// Every referenced path (`common ∪ orphaned`)
    pub fn referenced(&self) -> impl Iterator<Item = &NormalizedPath> {
        self.common.iter().chain(self.orphaned.iter())
    }

    /// Every listed path (`common ∪ missing`)
    pub fn listed(&self) -> impl Iterator<Item = &NormalizedPath> {
        self.common.iter().chain(self.missing.iter())
    }
}
