//! Locale identifiers

use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Identifier of a locale bundle (`en`, `fr-ca`, ...)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocaleId(String);

impl LocaleId {
    /// Create a locale id
    ///
    /// # Errors
    /// Returns [`ModelError::EmptyLocale`] if the id is empty after trimming.
    pub fn new(id: impl AsRef<str>) -> Result<Self, ModelError> {
        let id = id.as_ref().trim();
        if id.is_empty() {
            return Err(ModelError::EmptyLocale);
        }
        Ok(Self(id.to_string()))
    }

    /// Derive the locale from a bundle path laid out as `.../<locale>/<document>`
    ///
    /// # Errors
    /// Returns [`ModelError::NoLocaleInPath`] when the document has no parent directory.
    pub fn from_document_path(path: &str) -> Result<Self, ModelError> {
        let mut segments = path
            .split(['/', '\\'])
            .filter(|segment| !segment.trim().is_empty())
            .rev();
        let _document = segments.next();
        segments
            .next()
            .ok_or_else(|| ModelError::NoLocaleInPath(path.to_string()))
            .and_then(Self::new)
    }

    /// Get the id as a string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for LocaleId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LocaleId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for LocaleId {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LocaleId> for String {
    fn from(id: LocaleId) -> Self {
        id.0
    }
}

impl AsRef<str> for LocaleId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
