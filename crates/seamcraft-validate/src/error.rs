//! Error types for pattern validation.

use thiserror::Error;

/// Errors raised before any piece is checked.
///
/// Problems with the pieces themselves are reported as issues in the
/// validation results, never as errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidateError {
    /// Invalid validation thresholds.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

/// Result type for validation setup.
pub type Result<T> = std::result::Result<T, ValidateError>;
