//! Multi-locale aggregation
//!
//! Drives fetch, parse, extraction, reconciliation and validation for every
//! locale, then merges per-locale results into run-wide usage:
//! - Locales run concurrently, bounded by `max_concurrent_locales`
//! - A failing locale is isolated and reported, never fatal to the run
//! - Global usage is merged in one single-threaded pass after all locales finish

use crate::cache::ListingCache;
use crate::config::{CatalogConfig, LocaleSource};
use crate::error::{CatalogError, CatalogResult};
use crate::report::{CatalogReport, LocaleFailure, LocaleReport};
use crate::store::ObjectStore;
use catalog_document::{ParserRegistry, ReferenceExtractor, TaxonomyValidator};
use catalog_model::{ListingEntry, LocaleId, MediaExtensions, NormalizedPath};
use catalog_reconcile::{GlobalUsageSet, ReconciliationEngine};
use futures::stream::{self, StreamExt};
use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;
use std::sync::Arc;

/// Aggregates reconciliation across locale bundles
#[derive(Debug)]
pub struct CatalogAggregator {
    store: Arc<dyn ObjectStore>,
    config: CatalogConfig,
    parsers: ParserRegistry,
    extractor: ReferenceExtractor,
    validator: TaxonomyValidator,
    media: MediaExtensions,
    engine: ReconciliationEngine,
}

impl CatalogAggregator {
    /// Create an aggregator over `store`
    ///
    /// # Errors
    /// Returns [`CatalogError::Config`] if the configuration does not validate.
    pub fn new(store: Arc<dyn ObjectStore>, config: CatalogConfig) -> CatalogResult<Self> {
        config.validate()?;
        Ok(Self {
            store,
            parsers: ParserRegistry::default(),
            extractor: config.extractor(),
            validator: config.validator(),
            media: config.media(),
            engine: ReconciliationEngine::new(),
            config,
        })
    }

    /// Replace the document parsers
    #[must_use]
    pub fn with_parsers(mut self, parsers: ParserRegistry) -> Self {
        self.parsers = parsers;
        self
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Find `<locale>/<document_name>` bundles under the discovery prefix
    ///
    /// # Errors
    /// Returns [`CatalogError::Store`] if the prefix cannot be listed.
    pub async fn discover_locales(&self) -> CatalogResult<BTreeMap<LocaleId, LocaleSource>> {
        let Some(discovery) = &self.config.discovery else {
            return Ok(BTreeMap::new());
        };

        let entries = self.store.list_objects(&discovery.prefix).await?;
        let mut found = BTreeMap::new();
        for entry in entries {
            let file_name = entry.path.rsplit(['/', '\\']).next().unwrap_or_default();
            if file_name != discovery.document_name {
                continue;
            }
            match LocaleId::from_document_path(&entry.path) {
                Ok(locale) => {
                    found.insert(
                        locale,
                        LocaleSource::new(entry.path, discovery.listing_prefixes.iter().cloned()),
                    );
                }
                Err(err) => tracing::warn!(path = %entry.path, error = %err, "skipping bundle"),
            }
        }

        tracing::info!(
            prefix = %discovery.prefix,
            locales = found.len(),
            "discovered locale bundles"
        );
        Ok(found)
    }

    /// Discovered plus configured locales; configured entries win
    ///
    /// # Errors
    /// Returns an error if discovery fails or no locale is known.
    pub async fn resolve_locales(&self) -> CatalogResult<BTreeMap<LocaleId, LocaleSource>> {
        let mut locales = self.discover_locales().await?;
        locales.extend(self.config.locales.clone());
        if locales.is_empty() {
            return Err(CatalogError::config("no locales configured or discovered"));
        }
        Ok(locales)
    }

    /// Run over [`Self::resolve_locales`]
    ///
    /// # Errors
    /// Returns an error if discovery fails or no locale is known.
    pub async fn run_configured(&self) -> CatalogResult<CatalogReport> {
        let locales = self.resolve_locales().await?;
        Ok(self.run(locales).await)
    }

    /// Process every locale to completion
    pub async fn run(&self, locales: BTreeMap<LocaleId, LocaleSource>) -> CatalogReport {
        self.run_until(locales, futures::future::pending::<()>()).await
    }

    /// Process locales until `cancel` resolves
    ///
    /// Locales still in flight or never started when `cancel` resolves are
    /// reported as cancelled failures.
    pub async fn run_until<C>(
        &self,
        locales: BTreeMap<LocaleId, LocaleSource>,
        cancel: C,
    ) -> CatalogReport
    where
        C: Future<Output = ()>,
    {
        tracing::info!(
            locales = locales.len(),
            max_concurrent = self.config.max_concurrent_locales,
            backend = self.store.name(),
            "starting catalog run"
        );

        let listings =
            ListingCache::new(Arc::clone(&self.store), self.config.listing_cache_capacity);
        let listings = &listings;

        let outcomes: Vec<(LocaleId, CatalogResult<LocaleReport>)> = stream::iter(&locales)
            .map(|(locale, source)| async move {
                let outcome = self.process_locale(locale, source, listings).await;
                (locale.clone(), outcome)
            })
            .buffer_unordered(self.config.max_concurrent_locales.max(1))
            .take_until(cancel)
            .collect()
            .await;

        // Single merge point for run-wide state
        let mut usage = GlobalUsageSet::new();
        let mut listing_union: BTreeSet<NormalizedPath> = BTreeSet::new();
        let mut reports = BTreeMap::new();
        let mut failures = BTreeMap::new();

        for (locale, outcome) in outcomes {
            match outcome {
                Ok(report) => {
                    usage.extend(report.result.referenced().cloned());
                    listing_union.extend(report.result.listed().cloned());
                    reports.insert(locale, report);
                }
                Err(err) => {
                    match &err {
                        CatalogError::Invariant(_) => {
                            tracing::error!(
                                locale = %locale,
                                error = %err,
                                "locale failed self-check"
                            );
                        }
                        _ => tracing::warn!(locale = %locale, error = %err, "locale failed"),
                    }
                    failures.insert(locale, LocaleFailure::from(&err));
                }
            }
        }

        for locale in locales.keys() {
            if !reports.contains_key(locale) && !failures.contains_key(locale) {
                tracing::warn!(locale = %locale, "locale cancelled");
                failures.insert(locale.clone(), LocaleFailure::cancelled());
            }
        }

        let globally_unused = usage.globally_unused(&listing_union);
        tracing::info!(
            succeeded = reports.len(),
            failed = failures.len(),
            globally_used = usage.len(),
            globally_unused = globally_unused.len(),
            "catalog run finished"
        );

        CatalogReport {
            generated_at: chrono::Utc::now(),
            locales: reports,
            failures,
            globally_used: usage.into_inner(),
            globally_unused,
        }
    }

    /// Fetch, parse, extract, reconcile and validate one locale
    ///
    /// # Errors
    /// Any store, document or invariant failure for this locale.
    #[tracing::instrument(skip(self, locale, source, listings), fields(locale = %locale))]
    pub async fn process_locale(
        &self,
        locale: &LocaleId,
        source: &LocaleSource,
        listings: &ListingCache,
    ) -> CatalogResult<LocaleReport> {
        let bytes = self.store.fetch_object(&source.document).await?;
        let document = self.parsers.parse_bytes(&source.document, &bytes)?;
        document.ensure_tree()?;
        document.require_fields(&self.config.required_keys)?;

        let extracted = self.extractor.extract(&document);
        let raw_references: Vec<&str> = extracted.iter().map(|r| r.value()).collect();
        let duplicate_references = self.engine.find_duplicates(&raw_references);
        let references: BTreeSet<NormalizedPath> =
            extracted.iter().map(|r| r.normalized()).collect();

        let (listing, duplicate_listing) = self.collect_listing(source, listings).await?;

        let result = self.engine.reconcile(&references, &listing);
        self.engine
            .verify_invariants(&result, listing.len(), references.len())?;

        let violations = if self.config.validate_taxonomy {
            self.validator.validate(&document)
        } else {
            Vec::new()
        };

        if !duplicate_references.is_empty() {
            tracing::warn!(count = duplicate_references.len(), "duplicate references in document");
        }
        if !duplicate_listing.is_empty() {
            tracing::warn!(
                count = duplicate_listing.len(),
                "objects listed under several prefixes"
            );
        }
        tracing::info!(
            references = references.len(),
            listing = listing.len(),
            common = result.common.len(),
            missing = result.missing.len(),
            orphaned = result.orphaned.len(),
            violations = violations.len(),
            "locale reconciled"
        );

        Ok(LocaleReport {
            listing_total: listing.len(),
            references_total: references.len(),
            result,
            duplicate_references,
            duplicate_listing,
            violations,
        })
    }

    async fn collect_listing(
        &self,
        source: &LocaleSource,
        listings: &ListingCache,
    ) -> CatalogResult<(BTreeSet<NormalizedPath>, BTreeSet<String>)> {
        if source.listing_prefixes.is_empty() {
            tracing::warn!(document = %source.document, "locale has no listing prefixes");
        }

        let mount = self.config.listing_mount.as_deref();
        let mut raw = Vec::new();
        let mut normalized = BTreeSet::new();

        for prefix in &source.listing_prefixes {
            let objects = listings.list(prefix).await?;
            for object in objects.iter() {
                let mut entry = ListingEntry::new(object.path.as_str());
                if let Some(size) = object.size {
                    entry = entry.with_size(size);
                }
                if !self.media.accepts(&entry) {
                    continue;
                }
                normalized.insert(entry.normalized(mount));
                raw.push(object.path.as_str().to_owned());
            }
        }

        let duplicates = self.engine.find_duplicates(&raw);
        Ok((normalized, duplicates))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use catalog_model::ViolationKind;
    use pretty_assertions::assert_eq;

    fn en() -> LocaleId {
        LocaleId::new("en").unwrap()
    }

    fn store() -> Arc<MemoryStore> {
        Arc::new(
            MemoryStore::new()
                .with_object(
                    "languages/en/content-bundle.json",
                    r#"{"procedures": [{"icon": "/icon/wrong/p.png", "src": "/images/a.png"},
                        {"src": "/images/a.png"}, {"src": "/images/gone.png"}]}"#,
                )
                .with_object("images/a.png", "")
                .with_object("images/b.PNG", "")
                .with_object("images/notes.txt", ""),
        )
    }

    fn locales() -> BTreeMap<LocaleId, LocaleSource> {
        BTreeMap::from([(
            en(),
            LocaleSource::new("languages/en/content-bundle.json", ["images/"]),
        )])
    }

    #[tokio::test]
    async fn processes_single_locale() {
        let aggregator = CatalogAggregator::new(store(), CatalogConfig::default()).unwrap();
        let report = aggregator.run(locales()).await;

        assert!(report.is_complete());
        let en = report.locale(&en()).unwrap();
        assert_eq!(en.result.common.len(), 1);
        let names = |set: &BTreeSet<NormalizedPath>| {
            set.iter().map(NormalizedPath::as_str).map(String::from).collect::<Vec<_>>()
        };
        assert_eq!(names(&en.result.missing), vec!["/images/b.png"]);
        assert_eq!(names(&en.result.orphaned), vec!["/images/gone.png"]);
        assert_eq!(en.listing_total, 2);
        assert_eq!(en.references_total, 2);
        assert!(en.duplicate_references.contains("/images/a.png"));
        assert_eq!(en.violations.len(), 1);
        assert_eq!(en.violations[0].kind, ViolationKind::PathPrefix);
        assert_eq!(report.globally_unused.len(), 1);
    }

    #[tokio::test]
    async fn taxonomy_validation_can_be_disabled() {
        let config = CatalogConfig::default().with_taxonomy_validation(false);
        let report = CatalogAggregator::new(store(), config).unwrap().run(locales()).await;
        assert_eq!(report.violation_count(), 0);
    }

    #[tokio::test]
    async fn required_fields_isolate_locale() {
        let config = CatalogConfig::default().with_required_keys(["procedures", "drugs"]);
        let report = CatalogAggregator::new(store(), config).unwrap().run(locales()).await;

        assert!(report.locales.is_empty());
        let failure = &report.failures[&en()];
        assert_eq!(failure.kind, crate::error::FailureKind::MalformedDocument);
        assert!(failure.message.contains("drugs"));
        assert!(report.globally_unused.is_empty());
    }

    #[tokio::test]
    async fn rejects_invalid_config() {
        let config = CatalogConfig::default().with_max_concurrent_locales(0);
        assert!(CatalogAggregator::new(store(), config).is_err());
    }
}
