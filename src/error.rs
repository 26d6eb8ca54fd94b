//! Error types for the pagetext crate

use thiserror::Error;

/// Result type for pagetext operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for pagetext operations
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The target URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The target page answered with a non-success status
    #[error("Fetch failed: {status_code} from {url}")]
    Fetch {
        /// HTTP status code
        status_code: u16,
        /// URL that was requested
        url: String,
    },

    /// An outbound call exceeded its deadline
    #[error("Timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// The request was cancelled before it completed
    #[error("Operation cancelled")]
    Cancelled,

    /// Text extraction error
    #[error("Extraction error: {0}")]
    Extract(String),

    /// File or terminal IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
