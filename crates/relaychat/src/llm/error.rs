//! LLM error types.

use thiserror::Error;

/// Errors that can occur when making LLM API calls.
#[derive(Debug, Error)]
pub enum LLMError {
    /// HTTP request failed (connect, timeout, body read)
    #[error("http request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// API returned a non-success status; `message` is the raw body
    #[error("api error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// API answered with a content type other than JSON
    #[error("upstream returned non-JSON")]
    NonJson { raw: String },

    /// Body claimed to be JSON but did not parse
    #[error("invalid upstream response: {0}")]
    Parse(#[from] serde_json::Error),
}
