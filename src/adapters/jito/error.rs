//! Jito Error Types

use thiserror::Error;

/// Errors from bundle submission and confirmation.
#[derive(Error, Debug)]
pub enum JitoError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("block engine error: {message} (code: {code})")]
    Api { code: i32, message: String },

    #[error("invalid bundle: {0}")]
    InvalidBundle(String),

    #[error("rate limit exceeded")]
    RateLimited,

    #[error("response parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("transaction encoding failed: {0}")]
    Encode(String),
}

impl JitoError {
    /// Transient failures worth retrying on another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, JitoError::Http(_) | JitoError::RateLimited)
    }
}
