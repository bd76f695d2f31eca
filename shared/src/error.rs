//! Unified error taxonomy for the storefront engine
//!
//! Three recoverable kinds cover every failure the engine can produce:
//!
//! - [`StoreError::Validation`]: missing or malformed authoring input.
//!   Blocks the action locally with a user-visible message.
//! - [`StoreError::Persistence`]: a storage or network write failed.
//!   Recovered via optimistic rollback where applicable, otherwise
//!   surfaced as a non-fatal notice.
//! - [`StoreError::CorruptState`]: persisted local state could not be
//!   parsed. Recovered by resetting to an empty collection.
//!
//! No kind is process-fatal. Low-level storage errors are converted to one
//! of these at the operation boundary; raw transport errors never reach
//! the interface layer.

use thiserror::Error;

/// Unified error type for cart, bundle and order operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Missing required authoring field or invalid input
    #[error("{message}")]
    Validation { message: String },

    /// Storage or network write failed
    #[error("persistence failure: {message}")]
    Persistence { message: String },

    /// Unparsable persisted state
    #[error("corrupt local state: {message}")]
    CorruptState { message: String },
}

impl StoreError {
    // ========== Convenient constructors ==========

    /// Create a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a Persistence error
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }

    /// Create a CorruptState error
    pub fn corrupt_state(message: impl Into<String>) -> Self {
        Self::CorruptState {
            message: message.into(),
        }
    }

    // ========== Error inspection methods ==========

    /// Whether this error blocks the action (vs. degrading to a notice)
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Get the user-visible message
    pub fn message(&self) -> &str {
        match self {
            Self::Validation { message }
            | Self::Persistence { message }
            | Self::CorruptState { message } => message,
        }
    }
}

/// Result type for engine operations
pub type StoreResult<T> = Result<T, StoreError>;
