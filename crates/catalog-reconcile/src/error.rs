//! Invariant self-check failures

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Which set identity was checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Identity {
    /// `|common| + |missing| = |listing|`
    ListingCoverage,
    /// `|common| + |orphaned| = |references|`
    ReferenceCoverage,
}

impl Display for Identity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::ListingCoverage => f.write_str("|common| + |missing| = |listing|"),
            Self::ReferenceCoverage => f.write_str("|common| + |orphaned| = |references|"),
        }
    }
}

/// A single identity that did not hold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityDiagnostic {
    /// Identity that was violated
    pub identity: Identity,
    /// Right-hand side: the total supplied by the caller
    pub expected: usize,
    /// Left-hand side: the count derived from the result
    pub actual: usize,
}

impl IdentityDiagnostic {
    /// Absolute difference between both sides
    #[inline]
    #[must_use]
    pub fn discrepancy(&self) -> usize {
        self.expected.abs_diff(self.actual)
    }
}

impl Display for IdentityDiagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: expected {}, got {} (off by {})",
            self.identity,
            self.expected,
            self.actual,
            self.discrepancy()
        )
    }
}

/// Reconciliation result disagrees with the totals it was derived from
///
/// Never legitimate for correct set arithmetic; indicates an engine defect.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("reconciliation invariant breached: {}", render(.violations))]
pub struct InvariantBreach {
    /// Every identity that failed
    pub violations: Vec<IdentityDiagnostic>,
}

impl InvariantBreach {
    /// Sum of discrepancies across violated identities
    #[must_use]
    pub fn total_discrepancy(&self) -> usize {
        self.violations.iter().map(IdentityDiagnostic::discrepancy).sum()
    }
}

fn render(violations: &[IdentityDiagnostic]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
