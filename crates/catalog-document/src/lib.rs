//! Content Bundle Ingress
//!
//! Turns raw content bundles into generic trees and inspects them:
//!
//! - [`ParserRegistry`]: JSON and YAML parsing into [`ContentDocument`]
//! - [`ReferenceExtractor`]: every path-like value under recognized keys
//! - [`LineLocator`]: best-effort mapping from keys and values to source lines
//! - [`TaxonomyValidator`]: naming-convention checks with line attribution
//!
//! # Example
//!
//! ```rust
//! use catalog_document::{default_parsers, ReferenceExtractor, TaxonomyValidator};
//!
//! let source = br#"{"procedures": [{"icon": "/icon/wrong/p1.png", "src": "/video/p1.mp4"}]}"#;
//! let document = default_parsers().parse_bytes("en/content-bundle.json", source).unwrap();
//!
//! let references = ReferenceExtractor::default().extract(&document);
//! assert_eq!(references.len(), 1);
//!
//! let violations = TaxonomyValidator::default().validate(&document);
//! assert_eq!(violations[0].expected, "/icon/procedures");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod document;
pub mod error;
pub mod extract;
pub mod locate;
pub mod parsers;
pub mod taxonomy;

pub use document::ContentDocument;
pub use error::{DocumentError, DocumentResult};
pub use extract::{ExtractionRules, ReferenceExtractor};
pub use locate::LineLocator;
pub use parsers::{default_parsers, DocumentParser, JsonParser, ParserRegistry, YamlParser};
pub use taxonomy::{SegmentPolicy, Taxonomy, TaxonomyValidator, FUNCTION_ENTITY_KEYS};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::document::ContentDocument;
    pub use crate::error::{DocumentError, DocumentResult};
    pub use crate::extract::{ExtractionRules, ReferenceExtractor};
    pub use crate::locate::LineLocator;
    pub use crate::parsers::{default_parsers, DocumentParser, ParserRegistry};
    pub use crate::taxonomy::{SegmentPolicy, Taxonomy, TaxonomyValidator};
}
