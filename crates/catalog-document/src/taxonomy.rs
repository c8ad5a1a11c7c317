//! Taxonomy-aware path validation
//!
//! A reference found under a checked key (`icon`, `image`) inside a known
//! section must live under `/<category>/<segment>`, where the category follows
//! the key and the segment is derived from the section name. Function entities
//! additionally have their chapters checked for consistency with the entity.

use crate::document::ContentDocument;
use crate::extract::ExtractionRules;
use crate::locate::LineLocator;
use catalog_model::{LineNumber, TaxonomyViolation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// Keys that mark a mapping as a function entity
pub const FUNCTION_ENTITY_KEYS: [&str; 5] = ["id", "version", "icon", "description", "chapters"];

/// Section reported for findings outside any section
const ROOT_SECTION: &str = "(root)";

/// How a section name becomes a path segment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentPolicy {
    /// Lower-cased section name (`actionCards` -> `actioncards`)
    #[default]
    Verbatim,
    /// Lower-cased section name with one trailing `s` stripped (`procedures` -> `procedure`)
    Depluralize,
}

impl SegmentPolicy {
    /// Derive the path segment for a section
    #[must_use]
    pub fn segment(self, section: &str) -> String {
        let lowered = section.to_lowercase();
        match self {
            Self::Verbatim => lowered,
            Self::Depluralize => match lowered.strip_suffix('s') {
                Some(stem) if !stem.is_empty() => stem.to_string(),
                _ => lowered,
            },
        }
    }
}

/// Prefix rule table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Taxonomy {
    /// Checked key -> category directory (`icon` -> `icon`)
    pub categories: BTreeMap<String, String>,
    /// Section -> keys checked inside it
    pub sections: BTreeMap<String, BTreeSet<String>>,
    /// Segment derivation policy
    pub policy: SegmentPolicy,
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::empty()
            .with_category("icon", "icon")
            .with_category("image", "image")
            .with_section("procedures", ["icon"])
            .with_section("actionCards", ["icon"])
            .with_section("keyLearningPoints", ["image"])
    }
}

impl Taxonomy {
    /// Taxonomy with no rules
    #[must_use]
    pub fn empty() -> Self {
        Self {
            categories: BTreeMap::new(),
            sections: BTreeMap::new(),
            policy: SegmentPolicy::default(),
        }
    }

    /// Map a checked key to its category directory
    #[must_use]
    pub fn with_category(mut self, key: impl Into<String>, category: impl Into<String>) -> Self {
        self.categories.insert(key.into(), category.into());
        self
    }

    /// Check the given keys inside a section
    #[must_use]
    pub fn with_section<I>(mut self, section: impl Into<String>, keys: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.sections
            .entry(section.into())
            .or_default()
            .extend(keys.into_iter().map(Into::into));
        self
    }

    /// Set the segment policy
    #[must_use]
    pub fn with_policy(mut self, policy: SegmentPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Expected prefix for `key` inside `section`, if that pair is checked
    #[must_use]
    pub fn expected_prefix(&self, section: &str, key: &str) -> Option<String> {
        let checked = self.sections.get(section)?;
        if !checked.contains(key) {
            return None;
        }
        let category = self.categories.get(key).map_or(key, String::as_str);
        Some(format!("/{}/{}", category, self.policy.segment(section)))
    }

    /// Whether `value` lives under `prefix`
    ///
    /// Matches whole segments only: `/icon/procedures/a.png` conforms to
    /// `/icon/procedures`, `/icon/proceduresx/a.png` does not.
    #[must_use]
    pub fn conforms(prefix: &str, value: &str) -> bool {
        value
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    }
}

/// Validates content documents against a [`Taxonomy`]
#[derive(Debug, Clone)]
pub struct TaxonomyValidator {
    taxonomy: Taxonomy,
    section_keys: BTreeSet<String>,
}

impl Default for TaxonomyValidator {
    fn default() -> Self {
        Self::new(Taxonomy::default())
    }
}

impl TaxonomyValidator {
    /// Create a validator; section context follows the default extraction sections
    /// plus every section named by the taxonomy
    #[must_use]
    pub fn new(taxonomy: Taxonomy) -> Self {
        let section_keys = ExtractionRules::default().section_keys;
        Self::with_section_keys(taxonomy, section_keys)
    }

    /// Create a validator with explicit section keys
    #[must_use]
    pub fn with_section_keys<I>(taxonomy: Taxonomy, section_keys: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut section_keys: BTreeSet<String> =
            section_keys.into_iter().map(Into::into).collect();
        section_keys.extend(taxonomy.sections.keys().cloned());
        Self {
            taxonomy,
            section_keys,
        }
    }

    /// Rule table in use
    #[inline]
    #[must_use]
    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Collect every violation in the document; empty means compliant
    #[must_use]
    pub fn validate(&self, document: &ContentDocument) -> Vec<TaxonomyViolation> {
        let locator = LineLocator::new(document.source());
        let mut out = Vec::new();
        self.walk(document.root(), None, None, &locator, &mut out);
        tracing::debug!(
            document = document.name(),
            violations = out.len(),
            "validated document taxonomy"
        );
        out
    }

    fn walk(
        &self,
        node: &Value,
        section: Option<&str>,
        entity: Option<&str>,
        locator: &LineLocator<'_>,
        out: &mut Vec<TaxonomyViolation>,
    ) {
        match node {
            Value::Object(map) => {
                if is_function_entity(map) {
                    check_chapters(map, section.unwrap_or(ROOT_SECTION), locator, out);
                }
                let entity = map.get("id").and_then(Value::as_str).or(entity);

                for (key, value) in map {
                    match value {
                        Value::String(text) => {
                            let Some(section) = section else { continue };
                            let Some(prefix) = self.taxonomy.expected_prefix(section, key) else {
                                continue;
                            };
                            if !Taxonomy::conforms(&prefix, text) {
                                let mut violation = TaxonomyViolation::path_prefix(
                                    section,
                                    key.as_str(),
                                    text.as_str(),
                                    prefix,
                                )
                                .at_line(locator.locate_pair(key, text));
                                if let Some(id) = entity {
                                    violation = violation.with_entity(id);
                                }
                                out.push(violation);
                            }
                        }
                        Value::Object(_) | Value::Array(_) => {
                            let child = if self.section_keys.contains(key.as_str()) {
                                Some(key.as_str())
                            } else {
                                section
                            };
                            self.walk(value, child, entity, locator, out);
                        }
                        _ => {}
                    }
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.walk(item, section, entity, locator, out);
                }
            }
            _ => {}
        }
    }
}

fn is_function_entity(map: &Map<String, Value>) -> bool {
    FUNCTION_ENTITY_KEYS.iter().all(|key| map.contains_key(*key))
}

fn check_chapters(
    entity: &Map<String, Value>,
    section: &str,
    locator: &LineLocator<'_>,
    out: &mut Vec<TaxonomyViolation>,
) {
    let id = entity.get("id");
    let description = entity.get("description");
    let entity_id = render(id);
    let expected = describe(id, description);

    let chapters = match entity.get("chapters") {
        Some(Value::Array(items)) => items.as_slice(),
        None | Some(Value::Null) => &[],
        Some(other) => std::slice::from_ref(other),
    };

    for chapter in chapters {
        let consistent = chapter
            .as_object()
            .is_some_and(|c| c.get("id") == id && c.get("description") == description);
        if consistent {
            continue;
        }

        let (actual, line) = match chapter.as_object() {
            Some(c) => {
                let line = match c.get("id").and_then(Value::as_str) {
                    Some(chapter_id) => locator.locate_pair("id", chapter_id),
                    None => LineNumber::Unknown,
                };
                (describe(c.get("id"), c.get("description")), line)
            }
            None => (chapter.to_string(), LineNumber::Unknown),
        };
        let line = match line {
            LineNumber::Unknown => locator.locate_pair("id", &entity_id),
            found => found,
        };

        out.push(
            TaxonomyViolation::chapter_inconsistency(
                section,
                entity_id.as_str(),
                actual,
                expected.as_str(),
            )
            .at_line(line),
        );
    }
}

fn render(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => "<missing>".to_string(),
    }
}

fn describe(id: Option<&Value>, description: Option<&Value>) -> String {
    format!("id={}, description={}", render(id), render(description))
}
