//! Error types for the analysis module

use std::time::Duration;
use thiserror::Error;

/// Error type for content analysis
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with an error status
    #[error("API error: {status_code} - {message}")]
    Api {
        /// HTTP status code
        status_code: u16,
        /// Response body
        message: String,
    },

    /// The API key was rejected
    #[error("Authentication error: {0}")]
    Auth(String),

    /// The service is rate limiting this key
    #[error("Rate limit exceeded")]
    RateLimit,

    /// The response did not have the expected shape
    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),

    /// There was no text to analyze
    #[error("No text to analyze")]
    EmptyInput,

    /// The call ran past its deadline
    #[error("Analysis timed out after {0:?}")]
    Timeout(Duration),

    /// The call was cancelled
    #[error("Analysis cancelled")]
    Cancelled,
}
