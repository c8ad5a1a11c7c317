//! Error types for catalog value construction

/// Errors constructing catalog values
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Locale id is empty
    #[error("locale id must not be empty")]
    EmptyLocale,

    /// Bundle path has no directory to derive a locale from
    #[error("cannot derive a locale from document path '{0}'")]
    NoLocaleInPath(String),
}
