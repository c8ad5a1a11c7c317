//! Error types for document ingress
//!
//! Every variant describes a malformed document: the aggregator isolates it to
//! the locale that produced it.

/// Errors turning raw bytes into a content document
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// No parser registered for the document name
    #[error("no parser registered for document: '{0}'")]
    NoParserForDocument(String),

    /// Syntax error in the document
    #[error("syntax error in {document}: {message}")]
    SyntaxError { document: String, message: String },

    /// Document bytes are not valid UTF-8
    #[error("document {document} is not valid utf-8: {source}")]
    Encoding {
        document: String,
        #[source]
        source: std::str::Utf8Error,
    },

    /// Document root is a scalar instead of a mapping or sequence
    #[error("document {document} has a scalar root, expected a mapping or sequence")]
    ScalarRoot { document: String },

    /// A required top-level field is absent
    #[error("document {document} is missing required field '{field}'")]
    MissingField { document: String, field: String },
}

impl DocumentError {
    /// Create syntax error for a document
    pub fn syntax_error(document: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SyntaxError {
            document: document.into(),
            message: message.into(),
        }
    }

    /// Create missing-field error for a document
    pub fn missing_field(document: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            document: document.into(),
            field: field.into(),
        }
    }
}

/// Result type alias for document operations
pub type DocumentResult<T> = Result<T, DocumentError>;
