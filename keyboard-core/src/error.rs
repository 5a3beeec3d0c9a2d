//! Error types for keyboard operations.

use thiserror::Error;

use crate::NormalizeError;

/// Result type for keyboard operations.
pub type KeyboardResult<T> = Result<T, KeyboardError>;

/// Errors that can occur in keyboard operations.
///
/// None of these is fatal to the host: the store logs and drops the offending
/// input and keeps its last known state.
#[derive(Debug, Error)]
pub enum KeyboardError {
    /// A native notification could not be normalized.
    #[error("Malformed keyboard notification: {0}")]
    Normalize(#[from] NormalizeError),

    /// Notification or configuration serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid controller configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}
