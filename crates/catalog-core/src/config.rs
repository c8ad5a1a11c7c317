//! Catalog run configuration
//!
//! Loaded from TOML, adjusted by environment overrides and builder methods,
//! then validated before a run starts.

use crate::error::{CatalogError, CatalogResult};
use catalog_document::{ExtractionRules, ReferenceExtractor, Taxonomy, TaxonomyValidator};
use catalog_model::{LocaleId, MediaExtensions};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Environment variable overriding [`CatalogConfig::max_concurrent_locales`]
pub const ENV_MAX_CONCURRENT_LOCALES: &str = "CATALOG_MAX_CONCURRENT_LOCALES";

/// Environment variable overriding [`CatalogConfig::listing_mount`]
pub const ENV_LISTING_MOUNT: &str = "CATALOG_LISTING_MOUNT";

/// Bundle file name looked for during discovery
pub const DEFAULT_DOCUMENT_NAME: &str = "content-bundle.json";

/// Where one locale's document and listing live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleSource {
    /// Object path of the content bundle
    pub document: String,
    /// Prefixes whose listings together form this locale's listing
    #[serde(default)]
    pub listing_prefixes: Vec<String>,
}

impl LocaleSource {
    /// Create a locale source
    #[must_use]
    pub fn new<I, S>(document: impl Into<String>, listing_prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            document: document.into(),
            listing_prefixes: listing_prefixes.into_iter().map(Into::into).collect(),
        }
    }
}

/// Locate bundles by listing a prefix instead of naming each locale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Prefix holding `<locale>/<document_name>` objects
    pub prefix: String,
    /// Bundle file name
    #[serde(default = "default_document_name")]
    pub document_name: String,
    /// Listing prefixes shared by every discovered locale
    #[serde(default)]
    pub listing_prefixes: Vec<String>,
}

impl DiscoveryConfig {
    /// Discover `content-bundle.json` objects under `prefix`
    #[must_use]
    pub fn new<I, S>(prefix: impl Into<String>, listing_prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefix: prefix.into(),
            document_name: default_document_name(),
            listing_prefixes: listing_prefixes.into_iter().map(Into::into).collect(),
        }
    }
}

fn default_document_name() -> String {
    DEFAULT_DOCUMENT_NAME.to_string()
}

/// Catalog configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Maximum locales processed concurrently
    pub max_concurrent_locales: usize,
    /// Keys whose string values are asset references
    pub reference_keys: BTreeSet<String>,
    /// Keys that open a section
    pub section_keys: BTreeSet<String>,
    /// Extensions that participate in reconciliation
    pub media_extensions: MediaExtensions,
    /// Top-level keys every bundle must carry
    pub required_keys: Vec<String>,
    /// Prefix rule table for naming checks
    pub taxonomy: Taxonomy,
    /// Whether to run taxonomy validation at all
    pub validate_taxonomy: bool,
    /// Prefix prepended to listed object paths before normalization
    pub listing_mount: Option<String>,
    /// Explicitly configured locales
    pub locales: BTreeMap<LocaleId, LocaleSource>,
    /// Bundle discovery
    pub discovery: Option<DiscoveryConfig>,
    /// Listings kept in the shared cache during a run
    pub listing_cache_capacity: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        let rules = ExtractionRules::default();
        Self {
            max_concurrent_locales: 4,
            reference_keys: rules.reference_keys,
            section_keys: rules.section_keys,
            media_extensions: MediaExtensions::default(),
            required_keys: Vec::new(),
            taxonomy: Taxonomy::default(),
            validate_taxonomy: true,
            listing_mount: None,
            locales: BTreeMap::new(),
            discovery: None,
            listing_cache_capacity: 256,
        }
    }
}

impl CatalogConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse TOML text
    ///
    /// # Errors
    /// Returns [`CatalogError::Config`] on invalid TOML or unknown shapes.
    pub fn from_toml_str(text: &str) -> CatalogResult<Self> {
        toml::from_str(text).map_err(|e| CatalogError::config(format!("invalid TOML: {e}")))
    }

    /// Read and parse a TOML file
    ///
    /// # Errors
    /// Returns [`CatalogError::Config`] if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::config(format!("cannot read {}: {e}", path.display())))?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(
            path = %path.display(),
            locales = config.locales.len(),
            "loaded configuration"
        );
        Ok(config)
    }

    /// Apply `CATALOG_*` environment overrides
    ///
    /// # Errors
    /// Returns [`CatalogError::Config`] when an override does not parse.
    pub fn with_env_overrides(self) -> CatalogResult<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup
    ///
    /// # Errors
    /// Returns [`CatalogError::Config`] when an override does not parse.
    pub fn with_overrides_from(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> CatalogResult<Self> {
        if let Some(raw) = lookup(ENV_MAX_CONCURRENT_LOCALES) {
            self.max_concurrent_locales = raw.trim().parse().map_err(|_| {
                CatalogError::config(format!(
                    "{ENV_MAX_CONCURRENT_LOCALES} must be a positive integer, got '{raw}'"
                ))
            })?;
        }
        if let Some(raw) = lookup(ENV_LISTING_MOUNT) {
            let raw = raw.trim();
            self.listing_mount = (!raw.is_empty()).then(|| raw.to_string());
        }
        Ok(self)
    }

    /// With max concurrent locales
    #[inline]
    #[must_use]
    pub fn with_max_concurrent_locales(mut self, max: usize) -> Self {
        self.max_concurrent_locales = max;
        self
    }

    /// With reference keys
    #[must_use]
    pub fn with_reference_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reference_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// With additional video extensions
    #[must_use]
    pub fn with_video_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.media_extensions = self.media_extensions.with_extensions(extensions);
        self
    }

    /// With required top-level keys
    #[must_use]
    pub fn with_required_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// With taxonomy
    #[inline]
    #[must_use]
    pub fn with_taxonomy(mut self, taxonomy: Taxonomy) -> Self {
        self.taxonomy = taxonomy;
        self
    }

    /// Enable or disable taxonomy validation
    #[inline]
    #[must_use]
    pub fn with_taxonomy_validation(mut self, enabled: bool) -> Self {
        self.validate_taxonomy = enabled;
        self
    }

    /// With listing mount prefix
    #[inline]
    #[must_use]
    pub fn with_listing_mount(mut self, mount: impl Into<String>) -> Self {
        self.listing_mount = Some(mount.into());
        self
    }

    /// With one configured locale
    #[must_use]
    pub fn with_locale(mut self, locale: LocaleId, source: LocaleSource) -> Self {
        self.locales.insert(locale, source);
        self
    }

    /// With bundle discovery
    #[inline]
    #[must_use]
    pub fn with_discovery(mut self, discovery: DiscoveryConfig) -> Self {
        self.discovery = Some(discovery);
        self
    }

    /// Check the configuration is usable
    ///
    /// # Errors
    /// Returns [`CatalogError::Config`] describing the first problem found.
    pub fn validate(&self) -> CatalogResult<()> {
        if self.max_concurrent_locales == 0 {
            return Err(CatalogError::config("max_concurrent_locales must be at least 1"));
        }
        if self.reference_keys.is_empty() {
            return Err(CatalogError::config("reference_keys must not be empty"));
        }
        if self.media_extensions.is_empty() {
            return Err(CatalogError::config("media_extensions must not be empty"));
        }
        if self.listing_cache_capacity == 0 {
            return Err(CatalogError::config("listing_cache_capacity must be at least 1"));
        }
        for (locale, source) in &self.locales {
            if source.document.trim().is_empty() {
                return Err(CatalogError::config(format!(
                    "locale {locale} has an empty document path"
                )));
            }
        }
        if let Some(discovery) = &self.discovery {
            if discovery.document_name.trim().is_empty() {
                return Err(CatalogError::config("discovery.document_name must not be empty"));
            }
        }
        Ok(())
    }

    /// Extraction rules derived from the configured keys
    #[must_use]
    pub fn extraction_rules(&self) -> ExtractionRules {
        ExtractionRules::new(self.reference_keys.iter().cloned(), self.section_keys.iter().cloned())
    }

    /// Reference extractor for this configuration
    #[must_use]
    pub fn extractor(&self) -> ReferenceExtractor {
        ReferenceExtractor::new(self.extraction_rules())
    }

    /// Taxonomy validator sharing the extractor's section keys
    #[must_use]
    pub fn validator(&self) -> TaxonomyValidator {
        TaxonomyValidator::with_section_keys(
            self.taxonomy.clone(),
            self.section_keys.iter().cloned(),
        )
    }

    /// Recognized media set, with configured values canonicalized
    #[must_use]
    pub fn media(&self) -> MediaExtensions {
        MediaExtensions::new(self.media_extensions.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"
max_concurrent_locales = 2
media_extensions = ["png", "mp4", ".MOV"]
required_keys = ["procedures"]
listing_mount = "/content"

[taxonomy]
policy = "depluralize"

[taxonomy.categories]
icon = "icon"

[taxonomy.sections]
procedures = ["icon"]

[locales.en]
document = "languages/en/content-bundle.json"
listing_prefixes = ["images/", "videos/"]

[locales.fr]
document = "languages/fr/content-bundle.json"

[discovery]
prefix = "languages/"
listing_prefixes = ["images/"]
"#;

    #[test]
    fn defaults() {
        let config = CatalogConfig::default();
        assert_eq!(config.max_concurrent_locales, 4);
        assert!(config.reference_keys.contains("src"));
        assert!(config.section_keys.contains("actionCards"));
        assert!(config.validate_taxonomy);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parses_toml() {
        let config = CatalogConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.max_concurrent_locales, 2);
        assert_eq!(config.required_keys, vec!["procedures"]);
        assert_eq!(config.listing_mount.as_deref(), Some("/content"));
        assert_eq!(config.locales.len(), 2);

        let en = &config.locales[&LocaleId::new("en").unwrap()];
        assert_eq!(en.listing_prefixes, vec!["images/", "videos/"]);
        let fr = &config.locales[&LocaleId::new("fr").unwrap()];
        assert!(fr.listing_prefixes.is_empty());

        let discovery = config.discovery.as_ref().unwrap();
        assert_eq!(discovery.document_name, DEFAULT_DOCUMENT_NAME);

        assert!(config.media().contains("mov"));
        assert_eq!(
            config.taxonomy.expected_prefix("procedures", "icon").as_deref(),
            Some("/icon/procedure")
        );
        // unspecified fields keep their defaults
        assert!(config.reference_keys.contains("src"));
    }

    #[test]
    fn rejects_bad_toml() {
        let err = CatalogConfig::from_toml_str("max_concurrent_locales = \"many\"").unwrap_err();
        assert!(matches!(err, CatalogError::Config(_)));
    }

    #[test]
    fn overrides() {
        let config = CatalogConfig::default()
            .with_overrides_from(|key| match key {
                ENV_MAX_CONCURRENT_LOCALES => Some(" 8 ".to_string()),
                ENV_LISTING_MOUNT => Some("/content".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.max_concurrent_locales, 8);
        assert_eq!(config.listing_mount.as_deref(), Some("/content"));

        let err = CatalogConfig::default()
            .with_overrides_from(|key| (key == ENV_MAX_CONCURRENT_LOCALES).then(|| "x".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_MAX_CONCURRENT_LOCALES));
    }

    #[test]
    fn validation_failures() {
        assert!(CatalogConfig::default()
            .with_max_concurrent_locales(0)
            .validate()
            .is_err());
        assert!(CatalogConfig::default()
            .with_reference_keys(Vec::<String>::new())
            .validate()
            .is_err());
        assert!(CatalogConfig::default()
            .with_locale(LocaleId::new("en").unwrap(), LocaleSource::new(" ", ["images/"]))
            .validate()
            .is_err());
    }

    #[test]
    fn builders_feed_collaborators() {
        let config = CatalogConfig::default()
            .with_reference_keys(["src", "icon"])
            .with_video_extensions(["webm"]);
        assert!(config.extractor().rules().is_reference_key("icon"));
        assert!(config.media().contains("webm"));
        assert_eq!(
            config.validator().taxonomy().expected_prefix("actionCards", "icon").as_deref(),
            Some("/icon/actioncards")
        );
    }
}
