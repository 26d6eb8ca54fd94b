//! Request pipeline: fetch, extract, summarize, optionally analyze
//!
//! Each call works on fresh values; nothing is kept between requests. Any
//! failure before the analysis step aborts the whole request, while analysis
//! failures are folded into the report as text.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::analysis::{ContentAnalyzer, analyze_content};
use crate::error::Result;
use crate::extractor::{ExtractorConfig, FormattedText, TagMap, extract_formatted_text};
use crate::http::PageFetcher;
use crate::seo::{SeoStats, generate_seo_stats};

/// Everything extracted from one page
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageReport {
    /// Document text with labels removed
    pub simplified_text: String,

    /// Labelled document text
    pub detailed_text: FormattedText,

    /// Text snippets grouped by tag
    pub json_data: TagMap,

    pub seo_stats: SeoStats,

    /// Analysis prose, or a description of why it failed; absent when the
    /// analysis did not run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claude_analysis: Option<String>,

    /// The page URL (or file path) the report was built from
    pub url: String,

    /// RFC 3339 UTC timestamp of the extraction
    pub extraction_date: String,
}

/// Per-request switches
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Run the content analysis when an analyzer is configured
    pub analyze: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self { analyze: true }
    }
}

/// Orchestrates one page from URL to report
#[derive(Clone)]
pub struct PageProcessor {
    fetcher: PageFetcher,
    extractor: ExtractorConfig,
    analyzer: Option<Arc<dyn ContentAnalyzer>>,
}

impl PageProcessor {
    pub fn new(fetcher: PageFetcher, extractor: ExtractorConfig) -> Self {
        Self {
            fetcher,
            extractor,
            analyzer: None,
        }
    }

    /// Attach the analyzer used for the optional analysis step
    pub fn with_analyzer(mut self, analyzer: Arc<dyn ContentAnalyzer>) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    pub fn has_analyzer(&self) -> bool {
        self.analyzer.is_some()
    }

    pub fn extractor_config(&self) -> &ExtractorConfig {
        &self.extractor
    }

    /// Fetch `url` and build its report
    #[instrument(skip(self, options, cancel))]
    pub async fn process(
        &self,
        url: &str,
        options: &ProcessOptions,
        cancel: &CancellationToken,
    ) -> Result<PageReport> {
        let html = self.fetcher.fetch(url, cancel).await?;
        self.process_html(url, &html, options, cancel).await
    }

    /// Build the report for `source`: fetched when it is an http(s) URL,
    /// otherwise read from the local file system
    pub async fn process_source(
        &self,
        source: &str,
        options: &ProcessOptions,
        cancel: &CancellationToken,
    ) -> Result<PageReport> {
        if source.starts_with("http://") || source.starts_with("https://") {
            return self.process(source, options, cancel).await;
        }

        debug!("Reading HTML from file {}", source);
        let html = tokio::fs::read_to_string(source).await?;
        self.process_html(source, &html, options, cancel).await
    }

    /// Build the report for HTML that is already in hand
    #[instrument(skip(self, html, options, cancel), fields(bytes = html.len()))]
    pub async fn process_html(
        &self,
        source: &str,
        html: &str,
        options: &ProcessOptions,
        cancel: &CancellationToken,
    ) -> Result<PageReport> {
        let detailed_text = extract_formatted_text(html, &self.extractor)?;
        let json_data = self
            .extractor
            .strategy
            .extract_tag_map(html, &self.extractor)?;
        let simplified_text = detailed_text.simplified();
        let seo_stats = generate_seo_stats(detailed_text.as_str());
        debug!("SEO stats for {}: {:?}", source, seo_stats);

        let claude_analysis = match &self.analyzer {
            Some(analyzer) if options.analyze => {
                Some(analyze_content(analyzer.as_ref(), &simplified_text, cancel).await)
            }
            _ => None,
        };

        info!(
            "Extracted {} words and {} tags from {}",
            seo_stats.word_count,
            json_data.len(),
            source
        );

        Ok(PageReport {
            simplified_text,
            detailed_text,
            json_data,
            seo_stats,
            claude_analysis,
            url: source.to_string(),
            extraction_date: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        })
    }
}
