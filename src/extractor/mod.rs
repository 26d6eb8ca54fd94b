//! Text extraction from HTML
//!
//! This module turns raw HTML into the two structured outputs used by the
//! rest of the crate: a [`TagMap`] (tag name to ordered text snippets) and a
//! [`FormattedText`] document whose lines carry semantic labels.
//!
//! Two strategies produce a tag map. The tree-based extractor parses the page
//! with `scraper` and is the one used in production; the manual scanner walks
//! the raw markup with a tag stack and is kept for differential testing.

mod config;
mod error;
pub mod rules;
mod scanner;
mod stack;
mod tree;

pub use config::{ExtractionStrategy, ExtractorConfig, ExtractorConfigBuilder, TextScope};
pub use error::ExtractError;
pub use rules::{FormatRule, Label};
pub use scanner::scan_tag_map;
pub use stack::TagStack;
pub use tree::{extract_formatted_text, extract_text_by_tag};

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// One extracted snippet, keyed by its position among snippets of the same tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEntry {
    /// `tag` for the first occurrence, `tag_N` for the Nth
    pub key: String,

    /// The extracted text
    pub text: String,
}

impl Serialize for TagEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.key, &self.text)?;
        map.end()
    }
}

/// Ordered mapping from tag name to the snippets found under that tag
///
/// Tags keep the order in which they were first seen; snippets keep document
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagMap {
    tags: Vec<(String, Vec<TagEntry>)>,
}

impl TagMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a snippet under `tag`, deriving its positional key
    pub fn push(&mut self, tag: &str, text: impl Into<String>) {
        let index = match self.tags.iter().position(|(name, _)| name == tag) {
            Some(index) => index,
            None => {
                self.tags.push((tag.to_string(), Vec::new()));
                self.tags.len() - 1
            }
        };

        let entries = &mut self.tags[index].1;
        let position = entries.len() + 1;
        let key = if position == 1 {
            tag.to_string()
        } else {
            format!("{}_{}", tag, position)
        };
        entries.push(TagEntry {
            key,
            text: text.into(),
        });
    }

    /// Snippets recorded under `tag`
    pub fn get(&self, tag: &str) -> Option<&[TagEntry]> {
        self.tags
            .iter()
            .find(|(name, _)| name == tag)
            .map(|(_, entries)| entries.as_slice())
    }

    /// Texts recorded under `tag`, in document order
    pub fn texts(&self, tag: &str) -> Vec<&str> {
        self.get(tag)
            .map(|entries| entries.iter().map(|e| e.text.as_str()).collect())
            .unwrap_or_default()
    }

    /// Tag names in first-seen order
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(|(name, _)| name.as_str())
    }

    /// Iterate over `(tag, snippets)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[TagEntry])> {
        self.tags
            .iter()
            .map(|(name, entries)| (name.as_str(), entries.as_slice()))
    }

    /// Number of distinct tags
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl Serialize for TagMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.tags.len()))?;
        for (tag, entries) in &self.tags {
            map.serialize_entry(tag, entries)?;
        }
        map.end()
    }
}

/// Linear, label-prefixed rendering of a page's text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormattedText(String);

impl FormattedText {
    pub(crate) fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The document with every label stripped, one non-empty line per snippet
    pub fn simplified(&self) -> String {
        self.0
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| Label::parse_line(line).1)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for FormattedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for FormattedText {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// A strategy that reconstructs a [`TagMap`] from raw HTML
pub trait TagMapExtractor {
    fn extract_tag_map(&self, html: &str) -> Result<TagMap, ExtractError>;
}

/// Tree-based extraction over a parsed document
#[derive(Debug, Clone, Default)]
pub struct TreeExtractor {
    config: ExtractorConfig,
}

impl TreeExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }
}

impl TagMapExtractor for TreeExtractor {
    fn extract_tag_map(&self, html: &str) -> Result<TagMap, ExtractError> {
        extract_text_by_tag(html, &self.config)
    }
}

/// Character scanner over raw markup, no tree is built
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanningExtractor;

impl TagMapExtractor for ScanningExtractor {
    fn extract_tag_map(&self, html: &str) -> Result<TagMap, ExtractError> {
        scan_tag_map(html)
    }
}

/// Collapse whitespace runs into single spaces and trim the ends
pub(crate) fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_map_keys_are_positional() {
        let mut map = TagMap::new();
        map.push("p", "first");
        map.push("h1", "title");
        map.push("p", "second");
        map.push("p", "third");

        let keys: Vec<&str> = map
            .get("p")
            .unwrap()
            .iter()
            .map(|e| e.key.as_str())
            .collect();
        assert_eq!(keys, vec!["p", "p_2", "p_3"]);
        assert_eq!(map.tags().collect::<Vec<_>>(), vec!["p", "h1"]);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_tag_map_serializes_as_single_entry_records() {
        let mut map = TagMap::new();
        map.push("h1", "Welcome");
        map.push("p", "one");
        map.push("p", "two");

        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(
            json,
            r#"{"h1":[{"h1":"Welcome"}],"p":[{"p":"one"},{"p_2":"two"}]}"#
        );
    }

    #[test]
    fn test_simplified_strips_labels() {
        let text = FormattedText::new(
            "meta_description: Demo\n\nh1: Welcome\n\np: Hello\n\n- item\nlink: docs (https://x.test)\nplain",
        );
        assert_eq!(
            text.simplified(),
            "Demo\nWelcome\nHello\nitem\ndocs (https://x.test)\nplain"
        );
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  a \n\t b  "), "a b");
        assert_eq!(normalize_whitespace(" \n "), "");
    }
}
