//! Document parsers for content bundle formats
//!
//! Provides parsing from raw document text into a generic [`ContentDocument`] tree:
//! - JSON bundles via serde_json
//! - YAML bundles via serde_yaml

use crate::document::ContentDocument;
use crate::error::{DocumentError, DocumentResult};
use std::path::Path;

mod json;
mod yaml;

pub use json::JsonParser;
pub use yaml::YamlParser;

/// Parser trait for converting document text into a generic tree
///
/// Implement this trait to add support for new bundle formats.
pub trait DocumentParser: Send + Sync + 'static {
    /// Parse document text
    ///
    /// # Errors
    /// Returns [`DocumentError::SyntaxError`] when the text is not valid for the format.
    fn parse(&self, name: &str, source: &str) -> DocumentResult<ContentDocument>;

    /// Supported file extensions (without dot)
    fn extensions(&self) -> &[&str];

    /// Check if this parser can handle the given document name
    fn can_parse(&self, name: &str) -> bool {
        Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|ext| {
                self.extensions()
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }

    /// Parser priority (higher = tried first when multiple parsers match)
    fn priority(&self) -> i32 {
        0
    }
}

/// Parser registration keyed by document extension
pub struct ParserRegistry {
    parsers: Vec<Box<dyn DocumentParser>>,
}

impl Default for ParserRegistry {
    fn default() -> Self {
        default_parsers()
    }
}

impl Clone for ParserRegistry {
    fn clone(&self) -> Self {
        // Parsers are stateless
        default_parsers()
    }
}

impl std::fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParserRegistry")
            .field("parser_count", &self.parsers.len())
            .field("extensions", &self.all_extensions())
            .finish()
    }
}

impl ParserRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            parsers: Vec::new(),
        }
    }

    /// Register a parser
    pub fn register<P: DocumentParser>(&mut self, parser: P) {
        self.parsers.push(Box::new(parser));
        // Sort by priority (higher first)
        self.parsers
            .sort_by_key(|p| std::cmp::Reverse(p.priority()));
    }

    /// Find parser for a document name
    #[must_use]
    pub fn find_for_name(&self, name: &str) -> Option<&dyn DocumentParser> {
        self.parsers
            .iter()
            .find(|p| p.can_parse(name))
            .map(|p| &**p)
    }

    /// Get all registered extensions
    #[must_use]
    pub fn all_extensions(&self) -> Vec<&str> {
        self.parsers
            .iter()
            .flat_map(|p| p.extensions())
            .copied()
            .collect()
    }

    /// Decode raw object bytes and parse them with the matching parser
    ///
    /// A leading UTF-8 byte-order mark is ignored.
    ///
    /// # Errors
    /// - [`DocumentError::NoParserForDocument`] if no parser matches the name
    /// - [`DocumentError::Encoding`] if the bytes are not UTF-8
    /// - any error of the selected parser
    pub fn parse_bytes(&self, name: &str, bytes: &[u8]) -> DocumentResult<ContentDocument> {
        let parser = self
            .find_for_name(name)
            .ok_or_else(|| DocumentError::NoParserForDocument(name.to_string()))?;

        let text = std::str::from_utf8(bytes).map_err(|source| DocumentError::Encoding {
            document: name.to_string(),
            source,
        })?;
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        let document = parser.parse(name, text)?;
        tracing::debug!(
            document = name,
            bytes = bytes.len(),
            lines = document.source().lines().count(),
            "parsed content document"
        );
        Ok(document)
    }
}

/// Create default parser registry with built-in parsers
#[inline]
#[must_use]
pub fn default_parsers() -> ParserRegistry {
    let mut registry = ParserRegistry::new();
    registry.register(JsonParser);
    registry.register(YamlParser);
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    struct TestParser;

    impl DocumentParser for TestParser {
        fn parse(&self, name: &str, source: &str) -> DocumentResult<ContentDocument> {
            Ok(ContentDocument::new(name, Value::String(source.to_string()), source))
        }

        fn extensions(&self) -> &[&str] {
            &["test"]
        }

        fn priority(&self) -> i32 {
            10
        }
    }

    #[test]
    fn parser_can_parse_by_extension() {
        let parser = TestParser;

        assert!(parser.can_parse("file.test"));
        assert!(parser.can_parse("languages/en/file.TEST"));
        assert!(!parser.can_parse("file.txt"));
        assert!(!parser.can_parse("file"));
    }

    #[test]
    fn registry_find_parser() {
        let mut registry = ParserRegistry::new();
        registry.register(TestParser);

        assert!(registry.find_for_name("file.test").is_some());
        assert!(registry.find_for_name("file.txt").is_none());
    }

    #[test]
    fn registry_orders_by_priority() {
        let mut registry = default_parsers();
        registry.register(TestParser);
        assert_eq!(registry.all_extensions().first(), Some(&"test"));
    }

    #[test]
    fn default_registry_extensions() {
        let registry = default_parsers();
        let extensions = registry.all_extensions();
        assert!(extensions.contains(&"json"));
        assert!(extensions.contains(&"yaml"));
        assert!(extensions.contains(&"yml"));
    }

    #[test]
    fn parse_bytes_dispatches_by_name() {
        let registry = default_parsers();
        let doc = registry
            .parse_bytes("en/content-bundle.json", br#"{"src": "/a.png"}"#)
            .unwrap();
        assert_eq!(doc.root()["src"], "/a.png");

        let doc = registry
            .parse_bytes("en/content-bundle.yaml", b"src: /b.png\n")
            .unwrap();
        assert_eq!(doc.root()["src"], "/b.png");
    }

    #[test]
    fn parse_bytes_strips_bom() {
        let registry = default_parsers();
        let mut bytes = "\u{feff}".as_bytes().to_vec();
        bytes.extend_from_slice(br#"{"a": 1}"#);
        assert!(registry.parse_bytes("bundle.json", &bytes).is_ok());
    }

    #[test]
    fn parse_bytes_errors() {
        let registry = default_parsers();
        assert!(matches!(
            registry.parse_bytes("bundle.xml", b"<a/>"),
            Err(DocumentError::NoParserForDocument(_))
        ));
        assert!(matches!(
            registry.parse_bytes("bundle.json", &[0xff, 0xfe, 0x00]),
            Err(DocumentError::Encoding { .. })
        ));
        assert!(matches!(
            registry.parse_bytes("bundle.json", b"{\"a\":"),
            Err(DocumentError::SyntaxError { .. })
        ));
    }

    #[test]
    fn registry_debug() {
        let debug_str = format!("{:?}", default_parsers());
        assert!(debug_str.contains("ParserRegistry"));
    }
}
