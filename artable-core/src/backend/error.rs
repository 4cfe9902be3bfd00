//! Backend Errors
//!
//! `TigerStyle`: Explicit error types with context. Cancellation is its own
//! outcome, distinct from both success and failure.

use thiserror::Error;

/// Errors from backend operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The operation ran and failed
    #[error("backend operation failed: {message}")]
    Failed {
        /// Human-readable failure message
        message: String,
    },

    /// The operation was interrupted before it took effect
    #[error("backend operation cancelled")]
    Cancelled,
}

impl BackendError {
    /// Create a failure error.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    /// Check if this is a cancellation.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Check if this is an ordinary failure.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Result type for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;
