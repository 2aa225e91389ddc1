//! Error taxonomy for the evaluation pipeline.
//!
//! `EvalError` covers the two request-level failures that surface to the
//! caller (bad input, rate limit). `JudgeError` covers external-judge
//! failures; these never escape the semantic tier, which converts them
//! into the safe-default verdict.

use thiserror::Error;

/// Request-level failures the evaluate endpoint reports to its caller.
#[derive(Debug, Error)]
pub enum EvalError {
    /// A required field was missing or empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The caller exceeded the sliding-window rate limit.
    #[error("rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },
}

impl EvalError {
    /// The HTTP status code the transport layer should map this to.
    pub fn status_code(&self) -> u16 {
        match self {
            EvalError::MissingField(_) => 400,
            EvalError::RateLimited { .. } => 429,
        }
    }

    /// Retry-After value in seconds, for rate-limit rejections.
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            EvalError::RateLimited { retry_after_secs } => Some(*retry_after_secs),
            _ => None,
        }
    }
}

/// Errors that can occur when invoking the external semantic judge.
#[derive(Debug, Error)]
pub enum JudgeError {
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

    /// The reply could not be parsed into the expected judgment shape.
    #[error("malformed judgment reply: {0}")]
    MalformedReply(String),
}
