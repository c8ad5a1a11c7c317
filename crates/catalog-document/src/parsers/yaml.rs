//! YAML bundle parser
//!
//! Deserializes YAML straight into the same generic tree used for JSON bundles,
//! so extraction and validation never see the source format.

use crate::document::ContentDocument;
use crate::error::{DocumentError, DocumentResult};
use crate::parsers::DocumentParser;
use serde_json::Value;

/// YAML parser
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlParser;

impl DocumentParser for YamlParser {
    fn parse(&self, name: &str, source: &str) -> DocumentResult<ContentDocument> {
        let root: Value = serde_yaml::from_str(source).map_err(|e| {
            DocumentError::syntax_error(name, format!("YAML parse error: {e}"))
        })?;
        Ok(ContentDocument::new(name, root, source))
    }

    fn extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }
}
