//! # Extractor Configuration Module
//!
//! Options controlling how text is pulled out of a page. The defaults match
//! the behaviour of the HTTP endpoint: tree-based extraction, direct text only.
//!
//! - `TextScope`: whether an element owns only its direct text or all text
//!   underneath it
//! - `ExtractionStrategy`: tree-based extractor or manual scanner for the tag map
//! - `ExtractorConfigBuilder`: builder for `ExtractorConfig`

use std::fmt;
use std::str::FromStr;

use super::error::ExtractError;
use super::{ScanningExtractor, TagMap, TagMapExtractor, TreeExtractor};

/// Which text an element is credited with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextScope {
    /// Only the element's immediate text nodes. Nested elements report
    /// their own text, so nothing is counted twice.
    #[default]
    Direct,

    /// All text below the element. Inline children (`<b>`, `<span>`) are
    /// merged into the parent and also reported on their own.
    Full,
}

impl FromStr for TextScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "direct" => Ok(Self::Direct),
            "full" => Ok(Self::Full),
            other => Err(format!(
                "unknown text scope '{}', expected 'direct' or 'full'",
                other
            )),
        }
    }
}

impl fmt::Display for TextScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => f.write_str("direct"),
            Self::Full => f.write_str("full"),
        }
    }
}

/// How the tag map is built
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExtractionStrategy {
    /// Parse into a document tree and walk it
    #[default]
    Tree,

    /// Scan the raw markup with a tag stack
    Scan,
}

impl ExtractionStrategy {
    /// Build a tag map from `html` with this strategy
    pub fn extract_tag_map(
        self,
        html: &str,
        config: &ExtractorConfig,
    ) -> Result<TagMap, ExtractError> {
        match self {
            Self::Tree => TreeExtractor::new(config.clone()).extract_tag_map(html),
            Self::Scan => ScanningExtractor.extract_tag_map(html),
        }
    }
}

impl FromStr for ExtractionStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tree" => Ok(Self::Tree),
            "scan" => Ok(Self::Scan),
            other => Err(format!(
                "unknown strategy '{}', expected 'tree' or 'scan'",
                other
            )),
        }
    }
}

impl fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tree => f.write_str("tree"),
            Self::Scan => f.write_str("scan"),
        }
    }
}

/// Configuration for text extraction
#[derive(Debug, Clone, Default)]
pub struct ExtractorConfig {
    /// Which text each element is credited with
    pub text_scope: TextScope,

    /// Strategy used to build the tag map
    pub strategy: ExtractionStrategy,
}

impl ExtractorConfig {
    /// Create a new builder
    pub fn builder() -> ExtractorConfigBuilder {
        ExtractorConfigBuilder::new()
    }
}

/// Builder for ExtractorConfig
#[derive(Debug, Default)]
pub struct ExtractorConfigBuilder {
    config: ExtractorConfig,
}

impl ExtractorConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set which text each element is credited with
    pub fn text_scope(mut self, text_scope: TextScope) -> Self {
        self.config.text_scope = text_scope;
        self
    }

    /// Set the tag map strategy
    pub fn strategy(mut self, strategy: ExtractionStrategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    /// Build the configuration
    pub fn build(self) -> ExtractorConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options() {
        assert_eq!("Direct".parse::<TextScope>(), Ok(TextScope::Direct));
        assert_eq!("full".parse::<TextScope>(), Ok(TextScope::Full));
        assert!("partial".parse::<TextScope>().is_err());
        assert_eq!("scan".parse::<ExtractionStrategy>(), Ok(ExtractionStrategy::Scan));
        assert!("dom".parse::<ExtractionStrategy>().is_err());
    }

    #[test]
    fn test_builder() {
        let config = ExtractorConfig::builder()
            .text_scope(TextScope::Full)
            .strategy(ExtractionStrategy::Scan)
            .build();
        assert_eq!(config.text_scope, TextScope::Full);
        assert_eq!(config.strategy, ExtractionStrategy::Scan);

        let default = ExtractorConfig::default();
        assert_eq!(default.text_scope, TextScope::Direct);
        assert_eq!(default.strategy, ExtractionStrategy::Tree);
    }
}
