//! Aggregation output

use crate::error::{CatalogError, FailureKind};
use catalog_model::{LocaleId, NormalizedPath, TaxonomyViolation};
use catalog_reconcile::ReconciliationResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Everything produced for one successfully processed locale
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleReport {
    /// Common, missing and orphaned sets
    pub result: ReconciliationResult,
    /// Distinct normalized paths in the locale's listing
    pub listing_total: usize,
    /// Distinct normalized references in the locale's document
    pub references_total: usize,
    /// Reference values authored more than once (exact strings)
    pub duplicate_references: BTreeSet<String>,
    /// Listed paths reported more than once across the locale's prefixes
    pub duplicate_listing: BTreeSet<String>,
    /// Naming-convention findings in the locale's document
    pub violations: Vec<TaxonomyViolation>,
}

/// Why a locale produced no report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleFailure {
    /// Failure category
    pub kind: FailureKind,
    /// Human-readable cause
    pub message: String,
    /// Whether retrying the run could succeed
    pub retryable: bool,
}

impl LocaleFailure {
    /// Failure for a locale that never completed before cancellation
    #[must_use]
    pub fn cancelled() -> Self {
        Self::from(&CatalogError::Cancelled)
    }
}

impl From<&CatalogError> for LocaleFailure {
    fn from(err: &CatalogError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
            retryable: err.is_retryable(),
        }
    }
}

/// Result of one aggregation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogReport {
    /// When the run finished
    pub generated_at: DateTime<Utc>,
    /// Per-locale results for locales that succeeded
    pub locales: BTreeMap<LocaleId, LocaleReport>,
    /// Per-locale failures; every failed locale appears here
    pub failures: BTreeMap<LocaleId, LocaleFailure>,
    /// Paths referenced by any successful locale
    pub globally_used: BTreeSet<NormalizedPath>,
    /// Listed paths referenced by no successful locale
    pub globally_unused: BTreeSet<NormalizedPath>,
}

impl CatalogReport {
    /// True when every locale succeeded
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Result for one locale
    #[must_use]
    pub fn locale(&self, locale: &LocaleId) -> Option<&LocaleReport> {
        self.locales.get(locale)
    }

    /// Every taxonomy violation with its locale
    pub fn violations(&self) -> impl Iterator<Item = (&LocaleId, &TaxonomyViolation)> {
        self.locales
            .iter()
            .flat_map(|(locale, report)| report.violations.iter().map(move |v| (locale, v)))
    }

    /// Total number of taxonomy violations
    #[must_use]
    pub fn violation_count(&self) -> usize {
        self.locales.values().map(|r| r.violations.len()).sum()
    }

    /// Render as pretty-printed JSON
    ///
    /// # Errors
    /// Returns the serializer error; not expected for well-formed reports.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_from_error() {
        let failure = LocaleFailure::from(&CatalogError::config("no document"));
        assert_eq!(failure.kind, FailureKind::Config);
        assert!(failure.message.contains("no document"));
        assert!(!failure.retryable);

        let cancelled = LocaleFailure::cancelled();
        assert_eq!(cancelled.kind, FailureKind::Cancelled);
        assert!(cancelled.retryable);
    }

    #[test]
    fn report_views() {
        let en = LocaleId::new("en").unwrap();
        let mut report = CatalogReport {
            generated_at: Utc::now(),
            locales: BTreeMap::new(),
            failures: BTreeMap::new(),
            globally_used: BTreeSet::new(),
            globally_unused: BTreeSet::new(),
        };
        report.locales.insert(
            en.clone(),
            LocaleReport {
                violations: vec![TaxonomyViolation::path_prefix(
                    "procedures",
                    "icon",
                    "/icon/x.png",
                    "/icon/procedures",
                )],
                ..LocaleReport::default()
            },
        );

        assert!(report.is_complete());
        assert_eq!(report.violation_count(), 1);
        assert_eq!(report.violations().next().map(|(l, _)| l), Some(&en));
        assert!(report.locale(&en).is_some());

        let json = serde_json::to_value(&report).unwrap();
        assert!(json["locales"]["en"]["result"]["orphaned"].is_array());
    }
}
