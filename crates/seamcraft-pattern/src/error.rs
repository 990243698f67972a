//! Error types for pattern pieces.

use thiserror::Error;

/// A flattened panel that breaks its structural invariants.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PatternError {
    /// Fewer than three outline points.
    #[error("pattern piece needs at least 3 points, got {0}")]
    TooFewPoints(usize),

    /// An edge references a point that does not exist.
    #[error("edge {edge} references point {index} but piece has {point_count} points")]
    EdgeOutOfRange {
        /// Offending edge.
        edge: usize,
        /// Offending point index.
        index: usize,
        /// Number of points in the piece.
        point_count: usize,
    },

    /// Scale factor is not a positive finite number.
    #[error("invalid scale factor: {0}")]
    InvalidScale(f64),

    /// A coordinate is NaN or infinite.
    #[error("point {0} has a non-finite coordinate")]
    NonFinitePoint(usize),
}

/// Result type for pattern operations.
pub type Result<T> = std::result::Result<T, PatternError>;
