//! Error types for myqb

use thiserror::Error;

/// Result type alias for builder operations
pub type QbResult<T> = Result<T, QbError>;

/// Error types raised while building a statement.
///
/// Every variant is raised synchronously by the call that caused it, so a
/// malformed statement never reaches an executor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QbError {
    /// Malformed or missing input (empty table/column name, ragged insert rows,
    /// empty update payload at render time)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Illegal state transition (statement kind set twice, `set()` outside
    /// UPDATE, rendering before a statement kind was chosen)
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// `exec()` called on a builder without an executor
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Statement kind name not recognized
    #[error("Unsupported statement kind: {0}")]
    UnsupportedKind(String),
}

impl QbError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an invalid state error
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create an unsupported kind error
    pub fn unsupported_kind(kind: impl Into<String>) -> Self {
        Self::UnsupportedKind(kind.into())
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is an invalid state error
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState(_))
    }

    /// Check if this is a configuration error
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// The message carried by the error, without the category prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(m)
            | Self::InvalidState(m)
            | Self::Configuration(m)
            | Self::UnsupportedKind(m) => m,
        }
    }
}
