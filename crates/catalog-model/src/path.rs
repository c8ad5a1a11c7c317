//! Normalized asset paths
//!
//! Provides [`NormalizedPath`], the canonical comparison key for both content
//! references and storage listing entries.

use serde::{Deserialize, Serialize};
use std::borrow::{Borrow, Cow};
use std::convert::Infallible;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Canonical form of an asset path
///
/// Two paths name the same asset iff their normalized forms are equal.
///
/// Normalization rules, applied in order:
/// 1. trim surrounding whitespace
/// 2. replace `\` with `/`
/// 3. percent-decode `%HH` octets
/// 4. lower-case
/// 5. exactly one leading `/`
///
/// The rules are re-applied until the value stops changing, so normalizing an
/// already-normalized path is always a no-op (even when decoding exposes a new
/// escape, a backslash or edge whitespace).
///
/// # Examples
/// - `" Content\\Assets\\My%20Icon.PNG "` → `/content/assets/my icon.png`
/// - `"//images/a.png"` → `/images/a.png`
/// - `""` → `/`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct NormalizedPath(String);

impl NormalizedPath {
    /// Normalize a raw path
    #[inline]
    #[must_use]
    pub fn new(raw: &str) -> Self {
        normalize(raw)
    }

    /// Get the normalized path as a string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the inner string
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Final path segment (empty for the root path)
    #[inline]
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or_default()
    }

    /// Extension of the final segment, without the dot
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name();
        match name.rfind('.') {
            Some(idx) if idx + 1 < name.len() => Some(&name[idx + 1..]),
            _ => None,
        }
    }

    /// Check whether this path lies under `prefix` (compared in normalized form)
    #[must_use]
    pub fn starts_with(&self, prefix: &NormalizedPath) -> bool {
        if prefix.is_root() {
            return true;
        }
        self.0 == prefix.0
            || (self.0.starts_with(prefix.as_str())
                && self.0.as_bytes().get(prefix.0.len()) == Some(&b'/'))
    }

    /// Check whether this is the root path `/`
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }
}

/// Normalize a raw path into its canonical comparison form
#[must_use]
pub fn normalize(raw: &str) -> NormalizedPath {
    let mut current = normalize_pass(raw);
    loop {
        let next = normalize_pass(&current);
        if next == current {
            return NormalizedPath(current);
        }
        current = next;
    }
}

fn normalize_pass(raw: &str) -> String {
    let slashed = raw.trim().replace('\\', "/");
    let lowered = percent_decode(&slashed).to_lowercase();
    let rest = lowered.trim_start_matches('/');

    let mut out = String::with_capacity(rest.len() + 1);
    out.push('/');
    out.push_str(rest);
    out
}

/// Decode every valid `%HH` octet once
///
/// Invalid escapes (`%zz`, a trailing `%`) are kept literally. Decoded bytes
/// that do not form valid UTF-8 are replaced with U+FFFD.
#[must_use]
pub fn percent_decode(input: &str) -> Cow<'_, str> {
    if !input.contains('%') {
        return Cow::Borrowed(input);
    }

    let bytes = input.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hi = (bytes[i + 1] as char).to_digit(16);
            let lo = (bytes[i + 2] as char).to_digit(16);
            if let (Some(hi), Some(lo)) = (hi, lo) {
                // Two hex digits always fit in a byte
                out.push(((hi << 4) | lo) as u8);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    Cow::Owned(String::from_utf8_lossy(&out).into_owned())
}

impl Display for NormalizedPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for NormalizedPath {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NormalizedPath {
    fn from(raw: &str) -> Self {
        normalize(raw)
    }
}

impl From<String> for NormalizedPath {
    fn from(raw: String) -> Self {
        normalize(&raw)
    }
}

impl From<NormalizedPath> for String {
    fn from(path: NormalizedPath) -> Self {
        path.0
    }
}

impl FromStr for NormalizedPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(normalize(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_applies_all_rules() {
        let path = normalize("  Content\\Assets\\My%20Icon.PNG  ");
        assert_eq!(path.as_str(), "/content/assets/my icon.png");
    }

    #[test]
    fn normalize_inserts_leading_slash() {
        assert_eq!(normalize("images/a.png").as_str(), "/images/a.png");
    }

    #[test]
    fn normalize_collapses_leading_slashes() {
        assert_eq!(normalize("///images/a.png").as_str(), "/images/a.png");
        assert_eq!(normalize("\\\\images\\a.png").as_str(), "/images/a.png");
    }

    #[test]
    fn normalize_empty_is_root() {
        assert_eq!(normalize("").as_str(), "/");
        assert_eq!(normalize("   ").as_str(), "/");
        assert!(normalize("").is_root());
    }

    #[test]
    fn normalize_decodes_until_stable() {
        // "%2520" decodes to "%20" which decodes to a space
        let once = normalize("/a%2520b.png");
        assert_eq!(once.as_str(), "/a b.png");
        assert_eq!(normalize(once.as_str()), once);
    }

    #[test]
    fn normalize_handles_escaped_edge_whitespace() {
        let path = normalize("/icon/a.png%20");
        assert_eq!(path.as_str(), "/icon/a.png");
        assert_eq!(normalize(path.as_str()), path);
    }

    #[test]
    fn normalize_handles_escaped_backslash() {
        let path = normalize("icon%5Ca.png");
        assert_eq!(path.as_str(), "/icon/a.png");
    }

    #[test]
    fn percent_decode_keeps_invalid_escapes() {
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("%zz%4"), "%zz%4");
        assert_eq!(percent_decode("a%2Fb"), "a/b");
    }

    #[test]
    fn percent_decode_borrows_without_escapes() {
        assert!(matches!(percent_decode("/plain/path.png"), Cow::Borrowed(_)));
    }

    #[test]
    fn percent_decode_multibyte() {
        assert_eq!(percent_decode("caf%C3%A9"), "café");
    }

    #[test]
    fn extension_and_file_name() {
        let path = normalize("/videos/Intro.MP4");
        assert_eq!(path.file_name(), "intro.mp4");
        assert_eq!(path.extension(), Some("mp4"));

        assert_eq!(normalize("/videos/noext").extension(), None);
        assert_eq!(normalize("/videos/trailing.").extension(), None);
        assert_eq!(normalize("/").extension(), None);
    }

    #[test]
    fn starts_with_respects_segment_boundary() {
        let path = normalize("/icon/procedures/p1.png");
        assert!(path.starts_with(&normalize("/icon/procedures")));
        assert!(path.starts_with(&normalize("/icon")));
        assert!(path.starts_with(&normalize("/")));
        assert!(!path.starts_with(&normalize("/icon/proc")));
    }

    #[test]
    fn serde_normalizes_on_deserialize() {
        let path: NormalizedPath = serde_json::from_str(r#""Images\\A.png""#).unwrap();
        assert_eq!(path.as_str(), "/images/a.png");
        assert_eq!(serde_json::to_string(&path).unwrap(), r#""/images/a.png""#);
    }

    #[test]
    fn conversions() {
        let from_str: NormalizedPath = "A.png".parse().unwrap();
        let from_string = NormalizedPath::from(String::from("/a.png"));
        assert_eq!(from_str, from_string);
        assert_eq!(from_str.to_string(), "/a.png");
        assert_eq!(String::from(from_str), "/a.png");
    }
}
