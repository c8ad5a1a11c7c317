//! Run-wide usage accumulation

use catalog_model::NormalizedPath;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Every path referenced by any locale processed so far
///
/// Grows monotonically; paths are never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlobalUsageSet {
    used: BTreeSet<NormalizedPath>,
}

impl GlobalUsageSet {
    /// Create an empty set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one referenced path; returns whether it was new
    pub fn record(&mut self, path: NormalizedPath) -> bool {
        self.used.insert(path)
    }

    /// Whether any locale referenced `path`
    #[inline]
    #[must_use]
    pub fn contains(&self, path: &NormalizedPath) -> bool {
        self.used.contains(path)
    }

    /// Number of distinct referenced paths
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.used.len()
    }

    /// True when nothing has been recorded
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }

    /// Iterate recorded paths in order
    pub fn iter(&self) -> impl Iterator<Item = &NormalizedPath> {
        self.used.iter()
    }

    /// Listed paths no locale references
    #[must_use]
    pub fn globally_unused(
        &self,
        listing_union: &BTreeSet<NormalizedPath>,
    ) -> BTreeSet<NormalizedPath> {
        listing_union.difference(&self.used).cloned().collect()
    }

    /// Consume into the underlying set
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> BTreeSet<NormalizedPath> {
        self.used
    }
}

impl Extend<NormalizedPath> for GlobalUsageSet {
    fn extend<I: IntoIterator<Item = NormalizedPath>>(&mut self, iter: I) {
        self.used.extend(iter);
    }
}

impl FromIterator<NormalizedPath> for GlobalUsageSet {
    fn from_iter<I: IntoIterator<Item = NormalizedPath>>(iter: I) -> Self {
        Self {
            used: iter.into_iter().collect(),
        }
    }
}
