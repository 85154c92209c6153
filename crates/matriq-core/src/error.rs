//! Session and provider error types.
//!
//! `ProviderError` is defined in `matriq-core` so the session can classify
//! fetch failures for fallback decisions without string matching.

use thiserror::Error;

/// Errors surfaced by the test session state machine.
#[derive(Debug, Error)]
pub enum SessionError {
    /// An answer index outside the current puzzle's option range.
    /// The session is unchanged; the caller should re-prompt.
    #[error("option index {index} out of range for {options} options")]
    InvalidInput { index: usize, options: usize },

    /// A session operation was called in the wrong state. This indicates a
    /// wiring bug in the caller, not a user mistake.
    #[error("{operation} called while session is {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },

    /// The session construction parameters were unusable.
    #[error("invalid session config: {0}")]
    InvalidConfig(String),

    /// A puzzle fetch failed and the configured fallback puzzle does not
    /// validate either. Unreachable with the built-in fallback; only a
    /// caller-supplied broken fallback can get here.
    #[error("puzzle provider unavailable and no usable fallback puzzle")]
    ProviderUnavailable,
}

/// Errors that can occur when fetching a puzzle from a provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication failed (invalid or missing API key).
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

    /// The provider returned a response that does not satisfy the puzzle
    /// schema (grid length, option count, answer index range).
    #[error("invalid puzzle from provider: {0}")]
    InvalidPuzzle(String),
}

impl ProviderError {
    /// Returns `true` if this error is permanent and should not be retried.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            ProviderError::AuthenticationFailed(_) | ProviderError::ModelNotFound(_)
        )
    }

    /// Returns the retry-after delay in milliseconds, if applicable.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            ProviderError::RateLimited { retry_after_ms } => Some(*retry_after_ms),
            _ => None,
        }
    }
}
