//! Sanitizer error types

use thiserror::Error;

/// Sanitizer result type
pub type SanitizeResult<T> = Result<T, SanitizeError>;

/// Errors from building a removal policy out of a configuration.
///
/// Sanitizing itself never fails.
#[derive(Debug, Error)]
pub enum SanitizeError {
    #[error("Invalid removal config: {0}")]
    InvalidConfig(#[from] serde_json::Error),

    #[error("Invalid {kind} name in removal config: {name:?}")]
    InvalidName { kind: &'static str, name: String },
}
