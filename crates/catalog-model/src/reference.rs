//! Asset references extracted from content documents

use crate::path::NormalizedPath;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// A path-like string value found inside a content document
///
/// Carries the document it came from, the key it was found under and the
/// ancestor section in scope at that point. Immutable once extracted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    document: String,
    key: String,
    section: Option<String>,
    value: String,
}

impl Reference {
    /// Create a new reference
    #[inline]
    #[must_use]
    pub fn new(
        document: impl Into<String>,
        key: impl Into<String>,
        section: Option<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            document: document.into(),
            key: key.into(),
            section,
            value: value.into(),
        }
    }

    /// Name of the document the reference was extracted from
    #[inline]
    #[must_use]
    pub fn document(&self) -> &str {
        &self.document
    }

    /// Key the value was found under (`src`, `icon`, `image`, ...)
    #[inline]
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Ancestor section in scope, if any
    #[inline]
    #[must_use]
    pub fn section(&self) -> Option<&str> {
        self.section.as_deref()
    }

    /// Raw value as authored
    #[inline]
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Normalized comparison form of the value
    #[inline]
    #[must_use]
    pub fn normalized(&self) -> NormalizedPath {
        NormalizedPath::new(&self.value)
    }
}

impl Display for Reference {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.section {
            Some(section) => write!(
                f,
                "{}:{}.{} = {}",
                self.document, section, self.key, self.value
            ),
            None => write!(f, "{}:{} = {}", self.document, self.key, self.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_accessors() {
        let reference = Reference::new(
            "en/content-bundle.json",
            "src",
            Some("procedures".to_string()),
            "/Images/A.png",
        );

        assert_eq!(reference.document(), "en/content-bundle.json");
        assert_eq!(reference.key(), "src");
        assert_eq!(reference.section(), Some("procedures"));
        assert_eq!(reference.value(), "/Images/A.png");
        assert_eq!(reference.normalized().as_str(), "/images/a.png");
    }

    #[test]
    fn reference_display() {
        let scoped = Reference::new("doc", "icon", Some("drugs".into()), "/icon/drugs/a.png");
        assert_eq!(scoped.to_string(), "doc:drugs.icon = /icon/drugs/a.png");

        let root = Reference::new("doc", "src", None, "/a.png");
        assert_eq!(root.to_string(), "doc:src = /a.png");
    }
}
