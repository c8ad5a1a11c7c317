//! Subcommand implementations

use anyhow::{bail, Context, Result};
use catalog_core::{CatalogAggregator, CatalogConfig, CatalogReport, LocalFsStore};
use catalog_document::{default_parsers, ContentDocument, SegmentPolicy};
use catalog_model::{ListingEntry, NormalizedPath, TaxonomyViolation};
use catalog_reconcile::{ReconciliationEngine, ReconciliationResult};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Configuration from `path` (defaults when absent) with environment overrides
///
/// # Errors
/// Fails if the file cannot be read or an override does not parse.
pub fn load_config(path: Option<&Path>) -> Result<CatalogConfig> {
    let config = match path {
        Some(path) => CatalogConfig::load(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => CatalogConfig::default(),
    };
    config
        .with_env_overrides()
        .context("invalid environment override")
}

/// Parse a document file with the default parsers
///
/// # Errors
/// Fails if the file cannot be read or parsed.
pub fn read_document(path: &Path) -> Result<ContentDocument> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let document = default_parsers()
        .parse_bytes(&path.to_string_lossy(), &bytes)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    document.ensure_tree()?;
    Ok(document)
}

/// Options for [`reconcile`]
#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    /// TOML configuration file
    pub config: Option<PathBuf>,
    /// Directory mirroring the blob container
    pub root: PathBuf,
    /// Listing mount prefix, overriding configuration
    pub mount: Option<String>,
    /// Maximum concurrent locales, overriding configuration
    pub max_concurrent: Option<usize>,
}

/// Reconcile every locale under a local container directory
///
/// An interrupt cancels locales still in flight; they are reported as
/// failures and the rest of the report is kept.
///
/// # Errors
/// Fails on configuration problems or when no locale is known.
pub async fn reconcile(options: &ReconcileOptions) -> Result<CatalogReport> {
    let mut config = load_config(options.config.as_deref())?;
    if let Some(mount) = &options.mount {
        config = config.with_listing_mount(mount.clone());
    }
    if let Some(max) = options.max_concurrent {
        config = config.with_max_concurrent_locales(max);
    }

    if !options.root.is_dir() {
        bail!("container root {} is not a directory", options.root.display());
    }
    let store = Arc::new(LocalFsStore::new(&options.root));
    let aggregator = CatalogAggregator::new(store, config)?;
    let locales = aggregator.resolve_locales().await?;

    let interrupted = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
        tracing::warn!("interrupt received, cancelling remaining locales");
    };
    Ok(aggregator.run_until(locales, interrupted).await)
}

/// Check one document against the naming convention
///
/// # Errors
/// Fails if the document cannot be read or parsed.
pub fn validate(
    document: &Path,
    config: &CatalogConfig,
    policy: Option<SegmentPolicy>,
) -> Result<Vec<TaxonomyViolation>> {
    let document = read_document(document)?;
    let mut config = config.clone();
    if let Some(policy) = policy {
        config.taxonomy = config.taxonomy.with_policy(policy);
    }
    let violations = config.validator().validate(&document);
    tracing::info!(
        document = document.name(),
        violations = violations.len(),
        "validated document"
    );
    Ok(violations)
}

/// Outcome of [`compare`]
#[derive(Debug, Clone)]
pub struct Comparison {
    /// Name used for result files
    pub stem: String,
    /// Reconciled sets
    pub result: ReconciliationResult,
    /// Naming findings in the document
    pub violations: Vec<TaxonomyViolation>,
    /// Reference values authored more than once (exact strings)
    pub duplicate_references: BTreeSet<String>,
    /// Listing lines that appear more than once (exact strings)
    pub duplicate_listing: BTreeSet<String>,
}

/// Reconcile one document against a listing file of one path per line
///
/// # Errors
/// Fails if either file cannot be read, the document cannot be parsed, or
/// the result does not account for every input path.
pub fn compare(references: &Path, listing: &Path, config: &CatalogConfig) -> Result<Comparison> {
    let engine = ReconciliationEngine::new();
    let document = read_document(references)?;
    let extracted = config.extractor().extract(&document);
    let raw_references: Vec<&str> = extracted.iter().map(|r| r.value()).collect();
    let referenced: BTreeSet<NormalizedPath> = extracted.iter().map(|r| r.normalized()).collect();

    let text = fs::read_to_string(listing)
        .with_context(|| format!("failed to read {}", listing.display()))?;
    let raw_listing = media_lines(&text, config);
    let listed = parse_listing(&text, config);

    let duplicate_references = engine.find_duplicates(&raw_references);
    let duplicate_listing = engine.find_duplicates(&raw_listing);
    if !duplicate_references.is_empty() {
        tracing::warn!(count = duplicate_references.len(), "duplicate references in document");
    }
    if !duplicate_listing.is_empty() {
        tracing::warn!(count = duplicate_listing.len(), "duplicate lines in listing");
    }

    let result = engine.reconcile_checked(&referenced, &listed)?;
    let violations = if config.validate_taxonomy {
        config.validator().validate(&document)
    } else {
        Vec::new()
    };

    // `<locale>/content-bundle.json` names its results after the locale
    let stem = references
        .parent()
        .and_then(Path::file_name)
        .map_or_else(
            || "local".to_string(),
            |name| name.to_string_lossy().into_owned(),
        );
    Ok(Comparison {
        stem,
        result,
        violations,
        duplicate_references,
        duplicate_listing,
    })
}

/// Process exit status: 2 when a locale failed or naming violations were found
#[must_use]
pub fn exit_status(failed_locales: usize, violations: usize) -> u8 {
    if failed_locales > 0 || violations > 0 {
        2
    } else {
        0
    }
}

fn media_lines<'a>(text: &'a str, config: &CatalogConfig) -> Vec<&'a str> {
    let media = config.media();
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| media.accepts(&ListingEntry::new(*line)))
        .collect()
}

/// Normalized media paths from listing text, skipping blank lines
#[must_use]
pub fn parse_listing(text: &str, config: &CatalogConfig) -> BTreeSet<NormalizedPath> {
    let mount = config.listing_mount.as_deref();
    media_lines(text, config)
        .into_iter()
        .map(|line| ListingEntry::new(line).normalized(mount))
        .collect()
}
