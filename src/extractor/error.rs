//! Error types for the extractor module

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for extraction operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    /// A CSS selector used internally failed to parse
    #[error("Selector error: {0}")]
    Selector(String),

    /// A tag opened with `<` never reached its closing `>`
    #[error("Unterminated tag at byte {offset}")]
    UnterminatedTag {
        /// Byte offset of the opening `<`
        offset: usize,
    },

    /// A closing tag appeared with no open tag to close
    #[error("Closing tag without a matching open tag at byte {offset}")]
    UnbalancedClose {
        /// Byte offset of the closing tag
        offset: usize,
    },
}

impl From<ExtractError> for CrateError {
    fn from(err: ExtractError) -> Self {
        CrateError::Extract(err.to_string())
    }
}
