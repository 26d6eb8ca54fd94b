//! # Analysis Configuration Module
//!
//! Settings for the remote content analysis service. The API key is passed in
//! explicitly; `AnalysisConfig::from_env` is the only place that reads the
//! process environment and is meant for binaries.

use std::fmt;
use std::time::Duration;

/// Environment variable holding the analysis API key
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Environment variable overriding the model name
pub const MODEL_ENV: &str = "ANTHROPIC_MODEL";

/// Configuration for the analysis client
#[derive(Clone)]
pub struct AnalysisConfig {
    /// API key sent with every request
    pub api_key: String,

    /// Model used for the analysis
    pub model: String,

    /// Upper bound on generated tokens
    pub max_tokens: u32,

    /// Base URL of the messages API
    pub base_url: String,

    /// Value of the `anthropic-version` header
    pub api_version: String,

    /// Deadline for one analysis call
    pub timeout: Duration,

    /// Page text beyond this many characters is cut before sending
    pub max_input_chars: usize,
}

impl AnalysisConfig {
    /// Configuration with default settings and the given key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: "claude-3-5-sonnet-latest".to_string(),
            max_tokens: 1024,
            base_url: "https://api.anthropic.com".to_string(),
            api_version: "2023-06-01".to_string(),
            timeout: Duration::from_secs(60),
            max_input_chars: 100_000,
        }
    }

    /// Create a new builder
    pub fn builder(api_key: impl Into<String>) -> AnalysisConfigBuilder {
        AnalysisConfigBuilder {
            config: Self::new(api_key),
        }
    }

    /// Read the key (and optional model) from the environment
    ///
    /// Returns `None` when no non-empty key is set.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())?;
        let mut config = Self::new(api_key);
        if let Some(model) = std::env::var(MODEL_ENV).ok().filter(|m| !m.is_empty()) {
            config.model = model;
        }
        Some(config)
    }
}

impl fmt::Debug for AnalysisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("timeout", &self.timeout)
            .field("max_input_chars", &self.max_input_chars)
            .finish()
    }
}

/// Builder for AnalysisConfig
#[derive(Debug)]
pub struct AnalysisConfigBuilder {
    config: AnalysisConfig,
}

impl AnalysisConfigBuilder {
    /// Set the model name
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the token limit of the response
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.config.max_tokens = max_tokens;
        self
    }

    /// Set the API base URL
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Set the deadline for one call
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the input character budget
    pub fn max_input_chars(mut self, max_input_chars: usize) -> Self {
        self.config.max_input_chars = max_input_chars;
        self
    }

    /// Build the configuration
    pub fn build(self) -> AnalysisConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides_defaults() {
        let config = AnalysisConfig::builder("key")
            .model("claude-test")
            .max_tokens(256)
            .base_url("http://localhost:1234")
            .timeout(Duration::from_secs(5))
            .build();

        assert_eq!(config.api_key, "key");
        assert_eq!(config.model, "claude-test");
        assert_eq!(config.max_tokens, 256);
        assert_eq!(config.base_url, "http://localhost:1234");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.api_version, "2023-06-01");
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = AnalysisConfig::new("sk-secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
