//! Asset Catalog Model
//!
//! Value types shared by every stage of asset reconciliation.
//!
//! # Core Concepts
//!
//! - [`NormalizedPath`]: canonical comparison key for an asset path
//! - [`Reference`]: a path-like value extracted from a content document
//! - [`ListingEntry`]: an object path reported by storage
//! - [`MediaExtensions`]: extensions that participate in reconciliation
//! - [`LocaleId`]: identifier of a locale bundle
//! - [`TaxonomyViolation`]: a reference that breaks the naming convention
//!
//! # Example
//!
//! ```rust
//! use catalog_model::NormalizedPath;
//!
//! let a = NormalizedPath::new("Content\\Icons\\My%20Icon.PNG");
//! let b = NormalizedPath::new("/content/icons/my icon.png");
//! assert_eq!(a, b);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
mod error;
mod listing;
mod locale;
mod path;
mod reference;
mod violation;

// Re-exports
pub use error::ModelError;
pub use listing::{ListingEntry, MediaExtensions};
pub use locale::LocaleId;
pub use path::{normalize, percent_decode, NormalizedPath};
pub use reference::Reference;
pub use violation::{LineNumber, TaxonomyViolation, ViolationKind};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn reference_and_listing_agree_on_identity() {
        let reference = Reference::new("en", "src", None, "/Content/Images/Logo%20Dark.png");
        let entry = ListingEntry::new("images/logo dark.PNG");

        assert!(MediaExtensions::default().accepts(&entry));
        assert_eq!(reference.normalized(), entry.normalized(Some("/content")));
    }
}
