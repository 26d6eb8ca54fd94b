//! # pagetext - Web Page Text Extraction for Rust
//!
//! This crate fetches a web page and reshapes its visible text into three
//! complementary views, plus an optional language-model analysis:
//!
//! ## Features
//!
//! - A tag map grouping every element's text under its tag name
//! - A labelled plain-text document (`h1: ...`, `p: ...`, `- ...`)
//! - SEO statistics computed from the labelled document
//! - Two extraction strategies: a parsed DOM tree, or a strict tag scanner
//! - Optional content analysis through the Anthropic messages API
//! - An HTTP API (`GET /api/getJSON?url=...`) built on axum
//!
//! ## Example
//!
//! ```rust,no_run
//! use pagetext::extractor::{ExtractorConfig, extract_formatted_text};
//! use pagetext::http::{FetchConfig, PageFetcher};
//! use pagetext::pipeline::{PageProcessor, ProcessOptions};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Offline: label the text of a snippet
//!     let doc = extract_formatted_text("<h1>Hi</h1><p>There</p>", &ExtractorConfig::default())?;
//!     println!("{}", doc);
//!
//!     // Online: fetch a page and build the full report
//!     let fetcher = PageFetcher::new(FetchConfig::default())?;
//!     let processor = PageProcessor::new(fetcher, ExtractorConfig::default());
//!     let report = processor
//!         .process("https://example.com", &ProcessOptions::default(), &CancellationToken::new())
//!         .await?;
//!
//!     println!("{}", serde_json::to_string_pretty(&report)?);
//!     Ok(())
//! }
//! ```

mod error;
mod markdown;

pub mod analysis;
pub mod extractor;
pub mod http;
pub mod pipeline;
pub mod seo;
pub mod server;

pub use error::{Error, Result};
pub use markdown::{format_markdown, render_markdown};

/// Re-export of the types most callers need
pub mod prelude {
    pub use crate::error::Error;
    pub use crate::error::Result;
    pub use crate::extractor::{
        ExtractionStrategy, ExtractorConfig, FormattedText, TagMap, TextScope,
    };
    pub use crate::pipeline::{PageProcessor, PageReport, ProcessOptions};
    pub use crate::seo::SeoStats;
}
