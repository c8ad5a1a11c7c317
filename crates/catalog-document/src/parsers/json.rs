//! JSON bundle parser
//!
//! Uses serde_json for robust JSON parsing into a generic tree.

use crate::document::ContentDocument;
use crate::error::{DocumentError, DocumentResult};
use crate::parsers::DocumentParser;
use serde_json::Value;

/// JSON parser
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParser;

impl JsonParser {
    /// Create new JSON parser
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DocumentParser for JsonParser {
    fn parse(&self, name: &str, source: &str) -> DocumentResult<ContentDocument> {
        let root: Value = serde_json::from_str(source).map_err(|e| {
            DocumentError::syntax_error(name, format!("JSON parse error: {e}"))
        })?;
        Ok(ContentDocument::new(name, root, source))
    }

    fn extensions(&self) -> &[&str] {
        &["json"]
    }
}
