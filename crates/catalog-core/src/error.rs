//! Error types for catalog aggregation
//!
//! Provides error handling for:
//! - Object store failures (listing, fetching)
//! - Malformed content documents
//! - Reconciliation self-check breaches
//! - Configuration problems and cancellation

use catalog_document::DocumentError;
use catalog_model::ModelError;
use catalog_reconcile::InvariantBreach;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Object store errors
///
/// Cloneable so one failed listing can be shared by every locale waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Object does not exist
    #[error("object not found: {path}")]
    NotFound {
        /// Requested object path
        path: String,
    },

    /// Object path is not acceptable for this store
    #[error("invalid object path '{path}': {reason}")]
    InvalidPath {
        /// Offending path
        path: String,
        /// Why it was rejected
        reason: String,
    },

    /// I/O failure reading the store
    #[error("i/o error at {path}: {message}")]
    Io {
        /// Path being accessed
        path: String,
        /// Underlying error message
        message: String,
    },

    /// Backend-specific failure
    #[error("store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Create invalid-path error
    #[inline]
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Map an I/O error, turning `NotFound` into [`StoreError::NotFound`]
    pub fn from_io(path: impl Into<String>, err: &std::io::Error) -> Self {
        let path = path.into();
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Io {
                path,
                message: err.to_string(),
            }
        }
    }
}

/// Main catalog error type
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Object store failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Content document is malformed
    #[error("malformed document: {0}")]
    Document(#[from] DocumentError),

    /// Reconciliation self-check failed
    #[error("{0}")]
    Invariant(#[from] InvariantBreach),

    /// Invalid identifier or value
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Run was cancelled before this work completed
    #[error("operation cancelled")]
    Cancelled,
}

impl CatalogError {
    /// Check if error is retryable
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Store(StoreError::Io { .. } | StoreError::Backend(_)) | Self::Cancelled
        )
    }

    /// Classify for reporting
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Store(_) => FailureKind::Store,
            Self::Document(_) | Self::Model(_) => FailureKind::MalformedDocument,
            Self::Invariant(_) => FailureKind::InvariantBreach,
            Self::Config(_) => FailureKind::Config,
            Self::Cancelled => FailureKind::Cancelled,
        }
    }

    /// Create configuration error
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

/// Category of a per-locale failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Listing or fetching failed
    Store,
    /// Document did not parse or lacked required structure
    MalformedDocument,
    /// Reconciliation self-check failed
    InvariantBreach,
    /// Locale configuration was unusable
    Config,
    /// Run was cancelled first
    Cancelled,
}

impl Display for FailureKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Store => "store",
            Self::MalformedDocument => "malformed document",
            Self::InvariantBreach => "invariant breach",
            Self::Config => "config",
            Self::Cancelled => "cancelled",
        };
        f.write_str(label)
    }
}

/// Result type alias for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;
