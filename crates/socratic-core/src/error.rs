//! Provider error types.
//!
//! Defined in `socratic-core` so the relay can classify upstream failures
//! without depending on a concrete provider crate.

use thiserror::Error;

/// Errors that can occur when interacting with an LLM provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication failed (invalid API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The requested model was not found.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The response carried no text segment.
    #[error("response contained no text content")]
    EmptyResponse,
}

impl ProviderError {
    /// Returns `true` if the failure happened on the wire rather than at the provider.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            ProviderError::Timeout(_) | ProviderError::NetworkError(_)
        )
    }
}
