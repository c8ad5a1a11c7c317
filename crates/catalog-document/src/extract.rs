//! Reference extraction from generic document trees
//!
//! Walks mappings and sequences depth-first, emitting every string value found
//! under a recognized key. The ancestor section is threaded through the walk
//! as a parameter.

use crate::document::ContentDocument;
use catalog_model::{NormalizedPath, Reference};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// Keys that hold asset references and keys that open a new section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionRules {
    /// Keys whose string values are asset references
    pub reference_keys: BTreeSet<String>,
    /// Keys that set the ancestor-section context for everything beneath them
    pub section_keys: BTreeSet<String>,
}

impl ExtractionRules {
    /// Section keys used by content bundles out of the box
    pub const DEFAULT_SECTIONS: [&'static str; 7] = [
        "procedures",
        "actionCards",
        "keyLearningPoints",
        "modules",
        "drugs",
        "onboarding",
        "certificates",
    ];

    /// Create rules from explicit key sets
    #[must_use]
    pub fn new<R, S>(reference_keys: R, section_keys: S) -> Self
    where
        R: IntoIterator,
        R::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Self {
            reference_keys: reference_keys.into_iter().map(Into::into).collect(),
            section_keys: section_keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Replace the recognized reference keys
    #[must_use]
    pub fn with_reference_keys<I>(mut self, keys: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.reference_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Check whether a key holds references
    #[inline]
    #[must_use]
    pub fn is_reference_key(&self, key: &str) -> bool {
        self.reference_keys.contains(key)
    }

    /// Check whether a key opens a section
    #[inline]
    #[must_use]
    pub fn is_section_key(&self, key: &str) -> bool {
        self.section_keys.contains(key)
    }
}

impl Default for ExtractionRules {
    fn default() -> Self {
        Self::new(["src"], Self::DEFAULT_SECTIONS)
    }
}

/// Extracts asset references from content documents
#[derive(Debug, Clone, Default)]
pub struct ReferenceExtractor {
    rules: ExtractionRules,
}

impl ReferenceExtractor {
    /// Create an extractor with the given rules
    #[inline]
    #[must_use]
    pub fn new(rules: ExtractionRules) -> Self {
        Self { rules }
    }

    /// Rules in use
    #[inline]
    #[must_use]
    pub fn rules(&self) -> &ExtractionRules {
        &self.rules
    }

    /// Extract every reference in the document
    ///
    /// A recognized key whose value is not a string is not emitted; if that
    /// value is a container the walk still descends into it.
    #[must_use]
    pub fn extract(&self, document: &ContentDocument) -> Vec<Reference> {
        self.extract_tree(document.name(), document.root())
    }

    /// Extract every reference under `root`, attributing them to `document`
    #[must_use]
    pub fn extract_tree(&self, document: &str, root: &Value) -> Vec<Reference> {
        let mut out = Vec::new();
        self.walk(document, root, None, &mut out);
        out
    }

    /// Extract and normalize in one step
    #[must_use]
    pub fn extract_normalized(&self, document: &ContentDocument) -> BTreeSet<NormalizedPath> {
        self.extract(document)
            .iter()
            .map(Reference::normalized)
            .collect()
    }

    fn walk(&self, document: &str, node: &Value, section: Option<&str>, out: &mut Vec<Reference>) {
        match node {
            Value::Object(map) => {
                for (key, value) in map {
                    match value {
                        Value::String(text) if self.rules.is_reference_key(key) => {
                            out.push(Reference::new(
                                document,
                                key.as_str(),
                                section.map(str::to_string),
                                text.as_str(),
                            ));
                        }
                        Value::Object(_) | Value::Array(_) => {
                            let child_section = if self.rules.is_section_key(key) {
                                Some(key.as_str())
                            } else {
                                section
                            };
                            self.walk(document, value, child_section, out);
                        }
                        _ => {}
                    }
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.walk(document, item, section, out);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn values(refs: &[Reference]) -> Vec<&str> {
        let mut out: Vec<_> = refs.iter().map(Reference::value).collect();
        out.sort_unstable();
        out
    }

    #[test]
    fn extracts_nested_src_values() {
        let doc = ContentDocument::from_value(
            "en",
            json!({
                "src": "/root.png",
                "modules": [
                    {"title": "m1", "media": {"src": "/m1.mp4"}},
                    {"title": "m2", "gallery": [{"src": "/m2a.png"}, {"src": "/m2b.png"}]}
                ]
            }),
        );

        let refs = ReferenceExtractor::default().extract(&doc);
        assert_eq!(values(&refs), vec!["/m1.mp4", "/m2a.png", "/m2b.png", "/root.png"]);
        assert!(refs.iter().all(|r| r.document() == "en" && r.key() == "src"));
    }

    #[test]
    fn threads_section_context() {
        let doc = ContentDocument::from_value(
            "en",
            json!({
                "src": "/top.png",
                "procedures": [
                    {"src": "/p.png", "steps": [{"src": "/p-step.png"}]}
                ],
                "drugs": {"items": [{"src": "/d.png", "procedures": {"src": "/nested.png"}}]}
            }),
        );

        let refs = ReferenceExtractor::default().extract(&doc);
        let section_of = |value: &str| {
            refs.iter()
                .find(|r| r.value() == value)
                .and_then(|r| r.section().map(str::to_string))
        };

        assert_eq!(section_of("/top.png"), None);
        assert_eq!(section_of("/p.png"), Some("procedures".to_string()));
        assert_eq!(section_of("/p-step.png"), Some("procedures".to_string()));
        assert_eq!(section_of("/d.png"), Some("drugs".to_string()));
        assert_eq!(section_of("/nested.png"), Some("procedures".to_string()));
    }

    #[test]
    fn skips_non_string_values_under_recognized_keys() {
        let doc = ContentDocument::from_value(
            "en",
            json!({
                "a": {"src": 42},
                "b": {"src": null},
                "c": {"src": {"src": "/inside.png"}},
                "d": {"src": ["/not-emitted.png"]}
            }),
        );

        let refs = ReferenceExtractor::default().extract(&doc);
        assert_eq!(values(&refs), vec!["/inside.png"]);
    }

    #[test]
    fn visits_every_occurrence_once() {
        let doc = ContentDocument::from_value(
            "en",
            json!([
                {"src": "/same.png"},
                {"src": "/same.png"},
                {"src": "/SAME.png"}
            ]),
        );

        let extractor = ReferenceExtractor::default();
        assert_eq!(extractor.extract(&doc).len(), 3);
        assert_eq!(extractor.extract_normalized(&doc).len(), 1);
    }

    #[test]
    fn custom_reference_keys() {
        let doc = ContentDocument::from_value(
            "en",
            json!({"actionCards": [{
                "icon": "/icon/actioncards/a.png",
                "image": "/image/a.png",
                "src": "/a.mp4"
            }]}),
        );

        let rules = ExtractionRules::default().with_reference_keys(["icon", "image"]);
        let refs = ReferenceExtractor::new(rules).extract(&doc);
        assert_eq!(values(&refs), vec!["/icon/actioncards/a.png", "/image/a.png"]);
        assert!(refs.iter().all(|r| r.section() == Some("actionCards")));
    }

    #[test]
    fn scalar_root_yields_nothing() {
        let refs = ReferenceExtractor::default().extract_tree("en", &json!("/a.png"));
        assert!(refs.is_empty());
    }

    #[test]
    fn rules_defaults() {
        let rules = ExtractionRules::default();
        assert!(rules.is_reference_key("src"));
        assert!(rules.is_section_key("keyLearningPoints"));
        assert!(!rules.is_section_key("chapters"));
    }
}
