//! Chat backend error types.

use thiserror::Error;

/// Errors that can occur while producing an NPC reply.
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP request failed.
    #[error("LLM request failed: {0}")]
    RequestFailed(String),

    /// The response body could not be read.
    #[error("Failed to parse LLM response: {0}")]
    ParseError(String),

    /// Request timed out. Carries the timeout in milliseconds, or 0 when
    /// converted from a bare transport error.
    #[error("LLM request timed out after {0}ms")]
    Timeout(u64),

    /// No provider is configured or reachable.
    #[error("LLM provider unavailable: {0}")]
    Unavailable(String),

    /// The provider answered with nothing to say.
    #[error("LLM returned an empty reply")]
    EmptyReply,

    /// All retry attempts exhausted.
    #[error("All LLM retry attempts exhausted after {attempts} tries: {last_error}")]
    RetriesExhausted {
        /// Attempts made, first try included.
        attempts: u32,
        /// Description of the final failure.
        last_error: String,
    },

    /// Configuration error.
    #[error("LLM configuration error: {0}")]
    ConfigError(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout(0)
        } else if err.is_decode() {
            LlmError::ParseError(err.to_string())
        } else if err.is_connect() {
            LlmError::Unavailable(err.to_string())
        } else {
            LlmError::RequestFailed(err.to_string())
        }
    }
}
