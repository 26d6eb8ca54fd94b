//! SEO statistics derived from a formatted text document
//!
//! Counts are read purely from the line labels written by the extractor.

use serde::{Deserialize, Serialize};

use crate::extractor::Label;

/// Heading counts by level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingCount {
    pub h1: usize,
    pub h2: usize,
    pub h3: usize,
}

/// Summary counts for one page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoStats {
    /// Whitespace-separated words across all lines, labels excluded
    pub word_count: usize,
    pub heading_count: HeadingCount,
    pub paragraph_count: usize,
    pub link_count: usize,
    pub image_count: usize,
    pub has_meta_description: bool,
}

/// Tally words and labelled lines in a formatted text document
pub fn generate_seo_stats(document: &str) -> SeoStats {
    let mut stats = SeoStats::default();

    for line in document.lines() {
        let (label, payload) = Label::parse_line(line);
        stats.word_count += payload.split_whitespace().count();

        match label {
            Some(Label::H1) => stats.heading_count.h1 += 1,
            Some(Label::H2) => stats.heading_count.h2 += 1,
            Some(Label::H3) => stats.heading_count.h3 += 1,
            Some(Label::Paragraph) => stats.paragraph_count += 1,
            Some(Label::Link) => stats.link_count += 1,
            Some(Label::Image) => stats.image_count += 1,
            Some(Label::MetaDescription) => stats.has_meta_description = true,
            Some(Label::ListItem) | None => {}
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::{ExtractorConfig, extract_formatted_text};

    #[test]
    fn test_empty_document() {
        assert_eq!(generate_seo_stats(""), SeoStats::default());
    }

    #[test]
    fn test_one_heading_per_level() {
        let html = "<body><h1>Main title here</h1><h2>Second</h2><h3>Third level heading</h3></body>";
        let text = extract_formatted_text(html, &ExtractorConfig::default()).unwrap();
        let stats = generate_seo_stats(text.as_str());

        assert_eq!(stats.heading_count, HeadingCount { h1: 1, h2: 1, h3: 1 });
        assert_eq!(stats.word_count, 3 + 1 + 3);
        assert_eq!(stats.paragraph_count, 0);
        assert!(!stats.has_meta_description);
    }

    #[test]
    fn test_demo_page_stats() {
        let html = r#"<html><head><meta name="description" content="Demo page"></head><body><h1>Welcome</h1><p>Hello <b>world</b></p><a href="https://x.test">link</a></body></html>"#;
        let text = extract_formatted_text(html, &ExtractorConfig::default()).unwrap();
        let stats = generate_seo_stats(text.as_str());

        assert_eq!(stats.heading_count.h1, 1);
        assert_eq!(stats.paragraph_count, 1);
        assert_eq!(stats.link_count, 1);
        assert_eq!(stats.image_count, 0);
        assert!(stats.has_meta_description);
    }

    #[test]
    fn test_counts_by_label() {
        let document = "p: one two\n\np: three\n\nimage: Logo (a.png)\n- item words\nlink: go (/x)\nfree text";
        let stats = generate_seo_stats(document);

        assert_eq!(stats.paragraph_count, 2);
        assert_eq!(stats.image_count, 1);
        assert_eq!(stats.link_count, 1);
        // 2 + 1 + 2 + 2 + 2 + 2
        assert_eq!(stats.word_count, 11);
    }

    #[test]
    fn test_text_that_looks_like_a_label_is_not_counted() {
        let html = "<body><div>p: draft note</div><span>link: see below</span><p>Real</p></body>";
        let text = extract_formatted_text(html, &ExtractorConfig::default()).unwrap();
        let stats = generate_seo_stats(text.as_str());

        assert_eq!(stats.paragraph_count, 1);
        assert_eq!(stats.link_count, 0);
        // 3 + 3 + 1, the look-alike labels are ordinary words
        assert_eq!(stats.word_count, 7);
        assert_eq!(text.simplified(), "p: draft note\nlink: see below\nReal");
    }

    #[test]
    fn test_serializes_camel_case() {
        let stats = SeoStats {
            word_count: 4,
            has_meta_description: true,
            ..Default::default()
        };
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["wordCount"], 4);
        assert_eq!(json["headingCount"]["h1"], 0);
        assert_eq!(json["hasMetaDescription"], true);
        assert!(json.get("paragraphCount").is_some());
    }
}
