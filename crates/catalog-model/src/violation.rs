//! Taxonomy violations reported by document validation

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Best-effort source line of a finding
///
/// Line attribution is heuristic: it never affects correctness, only helps a
/// human find the offending entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LineNumber {
    /// 1-based line number
    Line(usize),
    /// No plausible line was found
    Unknown,
}

impl LineNumber {
    /// Get the line number, if known
    #[inline]
    #[must_use]
    pub fn get(self) -> Option<usize> {
        match self {
            Self::Line(line) => Some(line),
            Self::Unknown => None,
        }
    }
}

impl From<Option<usize>> for LineNumber {
    fn from(line: Option<usize>) -> Self {
        line.map_or(Self::Unknown, Self::Line)
    }
}

impl Display for LineNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Line(line) => write!(f, "{line}"),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

/// Kind of taxonomy finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// A reference value does not start with the prefix its section requires
    PathPrefix,
    /// A function entity's chapter disagrees with the entity's id or description
    ChapterInconsistency,
}

impl Display for ViolationKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::PathPrefix => f.write_str("path prefix"),
            Self::ChapterInconsistency => f.write_str("chapter inconsistency"),
        }
    }
}

/// A reference or entity that disagrees with the naming convention
///
/// For [`ViolationKind::PathPrefix`], `actual` is the raw path and `expected`
/// the required prefix. For [`ViolationKind::ChapterInconsistency`], both
/// hold an `id=..., description=...` rendering of the chapter and its parent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaxonomyViolation {
    /// Kind of finding
    pub kind: ViolationKind,
    /// Ancestor section in scope
    pub section: String,
    /// Key that was checked
    pub key: String,
    /// Value as found in the document
    pub actual: String,
    /// What the convention requires
    pub expected: String,
    /// Id of the enclosing function entity, when known
    pub entity_id: Option<String>,
    /// Best-effort source line
    pub line: LineNumber,
}

impl TaxonomyViolation {
    /// Create a path-prefix violation
    #[must_use]
    pub fn path_prefix(
        section: impl Into<String>,
        key: impl Into<String>,
        actual: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self {
            kind: ViolationKind::PathPrefix,
            section: section.into(),
            key: key.into(),
            actual: actual.into(),
            expected: expected.into(),
            entity_id: None,
            line: LineNumber::Unknown,
        }
    }

    /// Create a chapter-inconsistency violation
    #[must_use]
    pub fn chapter_inconsistency(
        section: impl Into<String>,
        entity_id: impl Into<String>,
        actual: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self {
            kind: ViolationKind::ChapterInconsistency,
            section: section.into(),
            key: "chapters".to_string(),
            actual: actual.into(),
            expected: expected.into(),
            entity_id: Some(entity_id.into()),
            line: LineNumber::Unknown,
        }
    }

    /// Attach the enclosing entity id
    #[inline]
    #[must_use]
    pub fn with_entity(mut self, entity_id: impl Into<String>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }

    /// Attach a line number
    #[inline]
    #[must_use]
    pub fn at_line(mut self, line: LineNumber) -> Self {
        self.line = line;
        self
    }
}

impl Display for TaxonomyViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] section: {}, key: {}, actual: {}, expected: {}",
            self.kind, self.section, self.key, self.actual, self.expected
        )?;
        if let Some(entity) = &self.entity_id {
            write!(f, ", entity: {entity}")?;
        }
        write!(f, ", line: {}", self.line)
    }
}
