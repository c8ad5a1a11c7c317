//! Reference/listing set algebra
//!
//! The engine is stateless; every operation is a pure function of its inputs.

use crate::error::{Identity, IdentityDiagnostic, InvariantBreach};
use crate::result::ReconciliationResult;
use catalog_model::NormalizedPath;
use std::collections::{BTreeMap, BTreeSet};

/// Evidence that both set identities held
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvariantCheck {
    /// Listed paths accounted for
    pub listing_total: usize,
    /// Referenced paths accounted for
    pub references_total: usize,
}

/// Computes common, missing and orphaned sets
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconciliationEngine;

impl ReconciliationEngine {
    /// Create an engine
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Diff a reference set against a listing set
    #[must_use]
    pub fn reconcile(
        &self,
        references: &BTreeSet<NormalizedPath>,
        listing: &BTreeSet<NormalizedPath>,
    ) -> ReconciliationResult {
        ReconciliationResult {
            common: listing.intersection(references).cloned().collect(),
            missing: listing.difference(references).cloned().collect(),
            orphaned: references.difference(listing).cloned().collect(),
        }
    }

    /// Reconcile and verify the set identities in one step
    ///
    /// # Errors
    /// Returns [`InvariantBreach`] if the result does not account for every
    /// input path.
    pub fn reconcile_checked(
        &self,
        references: &BTreeSet<NormalizedPath>,
        listing: &BTreeSet<NormalizedPath>,
    ) -> Result<ReconciliationResult, InvariantBreach> {
        let result = self.reconcile(references, listing);
        self.verify_invariants(&result, listing.len(), references.len())?;
        Ok(result)
    }

    /// Values occurring more than once in the raw input
    ///
    /// Compares exact strings, before normalization: `/A/b.png` and
    /// `/a/B.PNG` are distinct here even though they name the same asset.
    #[must_use]
    pub fn find_duplicates<S: AsRef<str>>(&self, raw: &[S]) -> BTreeSet<String> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for value in raw {
            *counts.entry(value.as_ref()).or_default() += 1;
        }
        counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(value, _)| value.to_string())
            .collect()
    }

    /// Re-derive both set identities against caller-supplied totals
    ///
    /// # Errors
    /// Returns [`InvariantBreach`] listing every identity that failed.
    pub fn verify_invariants(
        &self,
        result: &ReconciliationResult,
        listing_total: usize,
        references_total: usize,
    ) -> Result<InvariantCheck, InvariantBreach> {
        let checks = [
            (Identity::ListingCoverage, listing_total, result.listing_len()),
            (Identity::ReferenceCoverage, references_total, result.references_len()),
        ];

        let violations: Vec<IdentityDiagnostic> = checks
            .into_iter()
            .filter(|(_, expected, actual)| expected != actual)
            .map(|(identity, expected, actual)| IdentityDiagnostic {
                identity,
                expected,
                actual,
            })
            .collect();

        if violations.is_empty() {
            Ok(InvariantCheck {
                listing_total,
                references_total,
            })
        } else {
            let breach = InvariantBreach { violations };
            tracing::error!(error = %breach, "reconciliation self-check failed");
            Err(breach)
        }
    }

    /// Merge reference sets from several documents
    #[must_use]
    pub fn union<'a, I>(&self, sets: I) -> BTreeSet<NormalizedPath>
    where
        I: IntoIterator<Item = &'a BTreeSet<NormalizedPath>>,
    {
        sets.into_iter().flatten().cloned().collect()
    }
}
