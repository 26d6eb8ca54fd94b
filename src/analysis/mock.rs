//! # Mock Analyzer for Testing
//!
//! Provides a `MockAnalyzer` that implements `ContentAnalyzer` without any
//! network access. It returns a predefined response or error, optionally after
//! a delay, and counts how often it was called.

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

use super::{AnalysisError, ContentAnalyzer};

#[derive(Debug, Clone, Default)]
pub struct MockAnalyzer {
    /// Response returned by `analyze`; `None` returns an empty string
    response: Arc<Mutex<Option<String>>>,
    fail: bool,
    delay: Option<Duration>,
    deadline: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl MockAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock whose every call fails with a rate limit error
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub async fn set_text_response(&self, text: &str) {
        let mut guard = self.response.lock().await;
        *guard = Some(text.to_string());
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentAnalyzer for MockAnalyzer {
    async fn analyze(&self, _text: &str) -> Result<String, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(AnalysisError::RateLimit);
        }
        let guard = self.response.lock().await;
        Ok(guard.clone().unwrap_or_default())
    }

    fn deadline(&self) -> Option<Duration> {
        self.deadline
    }
}
