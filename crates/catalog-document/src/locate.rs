//! Best-effort line attribution
//!
//! Maps a key (optionally with a value) back to the 1-based line of the raw
//! document text where it most plausibly appears. Every lookup scans from the
//! top of the file, so duplicates resolve to their first occurrence.

use catalog_model::LineNumber;
use std::collections::HashMap;

/// Line index over raw document text
#[derive(Debug, Clone)]
pub struct LineLocator<'a> {
    lines: Vec<&'a str>,
    keys: HashMap<&'a str, Vec<usize>>,
}

impl<'a> LineLocator<'a> {
    /// Index the given text
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        let lines: Vec<&str> = source.lines().collect();
        let mut keys: HashMap<&str, Vec<usize>> = HashMap::new();

        for (idx, line) in lines.iter().copied().enumerate() {
            if let Some(key) = key_of(line) {
                keys.entry(key).or_default().push(idx + 1);
            }
        }

        Self { lines, keys }
    }

    /// Number of lines in the source
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Line of the `index`-th (0-based) occurrence of `key`
    #[must_use]
    pub fn line_of(&self, key: &str, index: usize) -> LineNumber {
        self.keys
            .get(key)
            .and_then(|lines| lines.get(index))
            .copied()
            .into()
    }

    /// Number of lines declaring `key`
    #[must_use]
    pub fn occurrences(&self, key: &str) -> usize {
        self.keys.get(key).map_or(0, Vec::len)
    }

    /// First line containing `text`
    #[must_use]
    pub fn locate(&self, text: &str) -> LineNumber {
        if text.is_empty() {
            return LineNumber::Unknown;
        }
        self.first_line(|line| line.contains(text))
    }

    /// First line mentioning both the quoted key and the value
    ///
    /// Falls back to the first line containing the value alone, which covers
    /// YAML and other sources where keys are unquoted.
    #[must_use]
    pub fn locate_pair(&self, key: &str, value: &str) -> LineNumber {
        if value.is_empty() {
            return self.line_of(key, 0);
        }
        let quoted = format!("\"{key}\"");
        match self.first_line(|line| line.contains(&quoted) && line.contains(value)) {
            LineNumber::Unknown => self.locate(value),
            found => found,
        }
    }

    fn first_line(&self, mut matches: impl FnMut(&str) -> bool) -> LineNumber {
        self.lines
            .iter()
            .position(|line| matches(*line))
            .map(|idx| idx + 1)
            .into()
    }
}

/// Key declared on a line: text before the first `:`, without quotes or list markers
fn key_of(line: &str) -> Option<&str> {
    let (head, _) = line.split_once(':')?;
    let key = head
        .trim()
        .trim_start_matches("- ")
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '{' || c == ',')
        .trim();
    (!key.is_empty()).then_some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"{
  "procedures": [
    {
      "id": "p1",
      "icon": "/icon/procedures/p1.png",
      "chapters": [
        {"id": "p1", "description": "d"}
      ]
    },
    {
      "id": "p2",
      "icon": "/icon/wrong/p2.png"
    }
  ]
}"#;

    #[test]
    fn indexes_keys_in_file_order() {
        let locator = LineLocator::new(SOURCE);
        assert_eq!(locator.line_count(), 15);
        assert_eq!(locator.line_of("procedures", 0), LineNumber::Line(2));
        assert_eq!(locator.line_of("icon", 0), LineNumber::Line(5));
        assert_eq!(locator.line_of("icon", 1), LineNumber::Line(12));
        assert_eq!(locator.line_of("icon", 2), LineNumber::Unknown);
        assert_eq!(locator.occurrences("id"), 3);
    }

    #[test]
    fn inline_objects_index_their_first_key() {
        let locator = LineLocator::new(SOURCE);
        assert_eq!(locator.line_of("id", 1), LineNumber::Line(7));
    }

    #[test]
    fn locate_substring() {
        let locator = LineLocator::new(SOURCE);
        assert_eq!(locator.locate("/icon/wrong/p2.png"), LineNumber::Line(12));
        assert_eq!(locator.locate("absent"), LineNumber::Unknown);
        assert_eq!(locator.locate(""), LineNumber::Unknown);
    }

    #[test]
    fn locate_pair_prefers_key_and_value() {
        let locator = LineLocator::new(SOURCE);
        assert_eq!(locator.locate_pair("id", "p2"), LineNumber::Line(11));
        assert_eq!(locator.locate_pair("icon", "p1.png"), LineNumber::Line(5));
    }

    #[test]
    fn locate_pair_falls_back_to_value() {
        let yaml = "procedures:\n  - id: p1\n    icon: /icon/wrong/p1.png\n";
        let locator = LineLocator::new(yaml);
        assert_eq!(locator.locate_pair("icon", "/icon/wrong/p1.png"), LineNumber::Line(3));
        assert_eq!(locator.line_of("id", 0), LineNumber::Line(2));
    }

    #[test]
    fn duplicates_resolve_to_first_occurrence() {
        let text = "\"src\": \"/a.png\"\n\"src\": \"/a.png\"\n";
        let locator = LineLocator::new(text);
        assert_eq!(locator.locate_pair("src", "/a.png"), LineNumber::Line(1));
        assert_eq!(locator.occurrences("src"), 2);
    }

    #[test]
    fn empty_source() {
        let locator = LineLocator::new("");
        assert_eq!(locator.line_count(), 0);
        assert_eq!(locator.locate("x"), LineNumber::Unknown);
        assert_eq!(locator.locate_pair("k", ""), LineNumber::Unknown);
    }
}
