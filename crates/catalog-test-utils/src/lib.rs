//! Testing utilities for the asset catalog workspace
//!
//! Shared fixtures: sample bundles, pre-populated stores and configurations.

#![allow(missing_docs)]

use catalog_core::{CatalogConfig, LocaleSource, MemoryStore};
use catalog_model::{LocaleId, NormalizedPath};
use serde_json::{json, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

pub const LANGUAGES_PREFIX: &str = "languages/";
pub const IMAGES_PREFIX: &str = "images/";
pub const VIDEOS_PREFIX: &str = "videos/";

pub fn locale(id: &str) -> LocaleId {
    LocaleId::new(id).unwrap()
}

pub fn document_path(locale: &str) -> String {
    format!("{LANGUAGES_PREFIX}{locale}/content-bundle.json")
}

pub fn locale_source(locale: &str) -> LocaleSource {
    LocaleSource::new(document_path(locale), [IMAGES_PREFIX, VIDEOS_PREFIX])
}

pub fn locales(ids: &[&str]) -> BTreeMap<LocaleId, LocaleSource> {
    ids.iter().map(|id| (locale(id), locale_source(id))).collect()
}

pub fn paths(raw: &[&str]) -> BTreeSet<NormalizedPath> {
    raw.iter().map(|p| NormalizedPath::new(p)).collect()
}

/// Bundle referencing each path under `modules[*].src`
pub fn bundle_with_sources(sources: &[&str]) -> Value {
    let modules: Vec<Value> = sources.iter().map(|src| json!({ "src": src })).collect();
    json!({ "modules": modules })
}

/// Procedures bundle with one function entity
pub fn function_bundle(icon: &str, chapter_id: &str) -> Value {
    json!({
        "procedures": [{
            "id": "p1",
            "version": 1,
            "icon": icon,
            "description": "d",
            "chapters": [{ "id": chapter_id, "description": "d" }]
        }]
    })
}

pub fn test_config() -> CatalogConfig {
    CatalogConfig::default().with_max_concurrent_locales(2)
}

/// Builds a [`MemoryStore`] laid out like a content container
#[derive(Debug, Default)]
pub struct StoreBuilder {
    store: MemoryStore,
}

impl StoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bundle(self, locale: &str, document: &Value) -> Self {
        self.raw(&document_path(locale), document.to_string())
    }

    pub fn assets(self, paths: &[&str]) -> Self {
        for path in paths {
            self.store.insert(*path, Vec::<u8>::new());
        }
        self
    }

    pub fn raw(self, path: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.store.insert(path, bytes);
        self
    }

    pub fn build(self) -> Arc<MemoryStore> {
        Arc::new(self.store)
    }
}
