//! Error types for the source adapters

use thiserror::Error;

/// Errors that can occur while talking to a news source
#[derive(Debug, Error)]
pub enum SourceError {
    /// HTTP request failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Provider returned an error response
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the provider
        message: String,
    },

    /// Failed to parse the provider response
    #[error("Parse error: {0}")]
    ParseError(String),
}
