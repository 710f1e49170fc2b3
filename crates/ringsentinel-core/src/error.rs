//! Error types for RingSentinel.
//!
//! The detection pipeline itself never fails: empty or degenerate input
//! produces an empty result. These errors cover the surfaces around it
//! (configuration, input validation hooks, deadlines, blocking tasks).

use thiserror::Error;

/// Result type alias using `SentinelError`.
pub type Result<T> = std::result::Result<T, SentinelError>;

/// Errors that can occur around an analysis run.
#[derive(Debug, Error)]
pub enum SentinelError {
    /// Input validation failed.
    #[error("Input validation failed: {0}")]
    ValidationError(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Timeout waiting for an analysis to finish.
    #[error("Timeout waiting for analysis after {0:?}")]
    Timeout(std::time::Duration),

    /// Internal error.
    #[error("Internal error: {0}")]
    InternalError(String),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl SentinelError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        SentinelError::ValidationError(msg.into())
    }

    /// Create a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        SentinelError::ConfigError(msg.into())
    }

    /// Create an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        SentinelError::InternalError(msg.into())
    }

    /// Returns true if retrying the same call may succeed.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SentinelError::Timeout(_))
    }
}
