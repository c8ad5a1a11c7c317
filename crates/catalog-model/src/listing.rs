//! Storage listing entries and the recognized media set

use crate::path::NormalizedPath;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A path reported by the storage collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingEntry {
    path: String,
    extension: Option<String>,
    size: Option<u64>,
}

impl ListingEntry {
    /// Create an entry, deriving the lower-cased extension from the last segment
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let extension = extension_of(&path);
        Self {
            path,
            extension,
            size: None,
        }
    }

    /// Attach the object size reported by the store
    #[inline]
    #[must_use]
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Raw listed path
    #[inline]
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Lower-cased extension without the dot
    #[inline]
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    /// Object size, when the store reports one
    #[inline]
    #[must_use]
    pub fn size(&self) -> Option<u64> {
        self.size
    }

    /// Normalized comparison form, with an optional mount prefix prepended
    ///
    /// Stores often list object names relative to their container while
    /// documents reference them through a public mount (`/content/...`).
    #[must_use]
    pub fn normalized(&self, mount: Option<&str>) -> NormalizedPath {
        match mount {
            Some(mount) if !mount.trim().is_empty() => {
                let mount = mount.trim().trim_end_matches(['/', '\\']);
                let name = self.path.trim_start_matches(['/', '\\']);
                NormalizedPath::new(&format!("{mount}/{name}"))
            }
            _ => NormalizedPath::new(&self.path),
        }
    }
}

fn extension_of(path: &str) -> Option<String> {
    let name = path.rsplit(['/', '\\']).next().unwrap_or_default();
    match name.rfind('.') {
        Some(idx) if idx + 1 < name.len() => Some(name[idx + 1..].trim().to_ascii_lowercase()),
        _ => None,
    }
}

/// The set of media extensions that participate in reconciliation
///
/// Defaults to `png` and `mp4`. Matching is case-insensitive and ignores a
/// leading dot in configured values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaExtensions(BTreeSet<String>);

impl MediaExtensions {
    /// Default image extension
    pub const IMAGE: &'static str = "png";
    /// Default video extension
    pub const VIDEO: &'static str = "mp4";

    /// Create from explicit extensions
    #[must_use]
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(extensions.into_iter().map(|e| canonical(e.as_ref())).collect())
    }

    /// Add further (video) extensions
    #[must_use]
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.0
            .extend(extensions.into_iter().map(|e| canonical(e.as_ref())));
        self
    }

    /// Check whether an extension is recognized
    #[inline]
    #[must_use]
    pub fn contains(&self, extension: &str) -> bool {
        self.0.contains(&canonical(extension))
    }

    /// Check whether a listing entry participates in reconciliation
    #[inline]
    #[must_use]
    pub fn accepts(&self, entry: &ListingEntry) -> bool {
        entry.extension().is_some_and(|ext| self.0.contains(ext))
    }

    /// Iterate recognized extensions
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of recognized extensions
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check whether no extension is recognized
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for MediaExtensions {
    fn default() -> Self {
        Self::new([Self::IMAGE, Self::VIDEO])
    }
}

fn canonical(extension: &str) -> String {
    extension.trim().trim_start_matches('.').to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_extension_is_lowercased() {
        let entry = ListingEntry::new("content/assets/Intro.MP4");
        assert_eq!(entry.extension(), Some("mp4"));
        assert_eq!(entry.path(), "content/assets/Intro.MP4");
    }

    #[test]
    fn entry_without_extension() {
        assert_eq!(ListingEntry::new("content/assets/README").extension(), None);
        assert_eq!(ListingEntry::new("content/assets.d/file").extension(), None);
        assert_eq!(ListingEntry::new("content/assets/").extension(), None);
    }

    #[test]
    fn entry_size() {
        let entry = ListingEntry::new("a.png").with_size(42);
        assert_eq!(entry.size(), Some(42));
    }

    #[test]
    fn entry_normalized_with_mount() {
        let entry = ListingEntry::new("images/My Icon.png");
        assert_eq!(entry.normalized(None).as_str(), "/images/my icon.png");
        assert_eq!(
            entry.normalized(Some("/content/")).as_str(),
            "/content/images/my icon.png"
        );
        assert_eq!(entry.normalized(Some("  ")).as_str(), "/images/my icon.png");
    }

    #[test]
    fn default_media_set() {
        let media = MediaExtensions::default();
        assert!(media.accepts(&ListingEntry::new("a.png")));
        assert!(media.accepts(&ListingEntry::new("b.MP4")));
        assert!(!media.accepts(&ListingEntry::new("c.json")));
        assert!(!media.accepts(&ListingEntry::new("noext")));
        assert_eq!(media.len(), 2);
    }

    #[test]
    fn configurable_video_extensions() {
        let media = MediaExtensions::default().with_extensions([".MOV", "webm"]);
        assert!(media.contains("mov"));
        assert!(media.contains(".webm"));
        assert!(media.accepts(&ListingEntry::new("clip.mov")));
        assert_eq!(media.iter().collect::<Vec<_>>(), vec!["mov", "mp4", "png", "webm"]);
    }
}
