//! Error types for the Gemini client.
//!
//! Routine request failures never surface as `GeminiError` from
//! [`Client::ask`](crate::Client::ask); they are folded into
//! [`ApiResult::Failure`](crate::ApiResult::Failure). This type covers
//! construction-time failures and the internal plumbing of a request.

use thiserror::Error;

/// Result type alias using GeminiError.
pub type Result<T> = std::result::Result<T, GeminiError>;

/// Errors that can occur when building or driving the client.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// The API key does not have the required shape.
    #[error("Invalid API key: {0}")]
    InvalidCredential(String),

    /// Invalid client configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Network or HTTP transport error.
    #[error(transparent)]
    Network(#[from] reqwest::Error),

    /// Response body was not valid JSON.
    #[error(transparent)]
    Parse(#[from] serde_json::Error),
}

impl GeminiError {
    /// Whether this error is fatal to client construction.
    pub fn is_credential_error(&self) -> bool {
        matches!(self, GeminiError::InvalidCredential(_))
    }
}

#[cfg(test)]
#[path = "error.test.rs"]
mod tests;
