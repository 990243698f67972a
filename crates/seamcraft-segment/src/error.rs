//! Error types for panel segmentation.

use seamcraft_mesh::MeshError;
use thiserror::Error;

/// Errors that can occur during segmentation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SegmentError {
    /// Input mesh is empty or breaks the mesh invariant.
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// Requested panel count is outside the supported range.
    #[error("panel count {requested} is outside [{min}, {max}]")]
    InvalidPanelCount {
        /// Requested count.
        requested: usize,
        /// Smallest accepted count.
        min: usize,
        /// Largest accepted count.
        max: usize,
    },

    /// Invalid segmentation settings.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// The caller cancelled the operation.
    #[error("segmentation cancelled")]
    Cancelled,
}

/// Result type for segmentation operations.
pub type Result<T> = std::result::Result<T, SegmentError>;
