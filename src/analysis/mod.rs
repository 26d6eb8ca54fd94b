//! # Content Analysis Module
//!
//! Sends the simplified page text to a remote language model and returns its
//! prose verbatim. The rest of the pipeline only sees a string: every failure,
//! including deadline and cancellation, is turned into a descriptive message
//! by [`analyze_content`].
//!
//! ## Key Components
//!
//! - `ContentAnalyzer`: the seam the pipeline depends on
//! - `ClaudeClient`: production implementation over the messages API
//! - `AnalysisConfig`: explicit configuration, including the API key

mod claude;
mod config;
mod error;
#[cfg(test)]
pub(crate) mod mock;

pub use claude::ClaudeClient;
pub use config::{API_KEY_ENV, AnalysisConfig, AnalysisConfigBuilder, MODEL_ENV};
pub use error::AnalysisError;

use async_trait::async_trait;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

/// Something that can turn page text into an analysis
#[async_trait]
pub trait ContentAnalyzer: Send + Sync {
    /// Analyze `text` and return the response prose
    async fn analyze(&self, text: &str) -> Result<String, AnalysisError>;

    /// Deadline applied around [`ContentAnalyzer::analyze`], if any
    fn deadline(&self) -> Option<Duration> {
        None
    }
}

/// Run one analysis and always come back with a string
///
/// Errors, timeouts and cancellation are reported as
/// `"Error analyzing content: ..."` instead of failing the caller.
#[instrument(skip(analyzer, text, cancel), fields(chars = text.len()))]
pub async fn analyze_content(
    analyzer: &dyn ContentAnalyzer,
    text: &str,
    cancel: &CancellationToken,
) -> String {
    let call = async {
        match analyzer.deadline() {
            Some(deadline) => tokio::time::timeout(deadline, analyzer.analyze(text))
                .await
                .unwrap_or(Err(AnalysisError::Timeout(deadline))),
            None => analyzer.analyze(text).await,
        }
    };

    let result = tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(AnalysisError::Cancelled),
        result = call => result,
    };

    match result {
        Ok(analysis) => {
            info!("Content analysis returned {} chars", analysis.len());
            analysis
        }
        Err(e) => {
            warn!("Content analysis failed: {}", e);
            format!("Error analyzing content: {}", e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockAnalyzer;
    use super::*;

    #[tokio::test]
    async fn test_success_is_returned_verbatim() {
        let analyzer = MockAnalyzer::new();
        analyzer.set_text_response("Looks fine.").await;

        let out = analyze_content(&analyzer, "text", &CancellationToken::new()).await;
        assert_eq!(out, "Looks fine.");
        assert_eq!(analyzer.call_count(), 1);
    }

    #[tokio::test]
    async fn test_failure_becomes_message() {
        let analyzer = MockAnalyzer::failing();

        let out = analyze_content(&analyzer, "text", &CancellationToken::new()).await;
        assert!(out.starts_with("Error analyzing content:"));
        assert!(out.contains("Rate limit"));
    }

    #[tokio::test]
    async fn test_deadline_becomes_message() {
        let analyzer = MockAnalyzer::new()
            .with_delay(Duration::from_secs(5))
            .with_deadline(Duration::from_millis(20));

        let out = analyze_content(&analyzer, "text", &CancellationToken::new()).await;
        assert!(out.contains("timed out"), "{}", out);
    }

    #[tokio::test]
    async fn test_cancellation_becomes_message() {
        let analyzer = MockAnalyzer::new().with_delay(Duration::from_secs(5));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let out = analyze_content(&analyzer, "text", &cancel).await;
        assert_eq!(out, "Error analyzing content: Analysis cancelled");
    }
}
