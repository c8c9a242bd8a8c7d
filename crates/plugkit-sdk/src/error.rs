//! Plugin-side construction errors.

use thiserror::Error;

/// Error returned by a registered constructor.
#[derive(Debug, Error)]
pub enum ConstructError {
    /// An argument had the wrong type or was missing.
    #[error("invalid constructor argument at index {index}: expected {expected}")]
    InvalidArgument {
        /// Zero-based argument position.
        index: usize,
        /// Expected argument shape, e.g. `integer`.
        expected: &'static str,
    },

    /// Construction failed for a type-specific reason.
    #[error("construction failed: {0}")]
    Failed(String),
}

/// Result alias for constructor functions.
pub type ConstructResult<T> = Result<T, ConstructError>;
