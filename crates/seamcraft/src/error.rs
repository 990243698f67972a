//! Errors surfaced by the end-to-end pipeline.

use seamcraft_flatten::FlattenError;
use seamcraft_mesh::MeshError;
use seamcraft_segment::SegmentError;
use seamcraft_validate::ValidateError;
use thiserror::Error;

/// Any stage failure, or a configuration problem.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// Calibration or repair rejected the mesh.
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// Segmentation failed.
    #[error(transparent)]
    Segment(#[from] SegmentError),

    /// Flattening or layout failed.
    #[error(transparent)]
    Flatten(#[from] FlattenError),

    /// Validation thresholds are out of range.
    #[error(transparent)]
    Validate(#[from] ValidateError),

    /// Configuration could not be parsed or is out of range.
    #[error("configuration error: {0}")]
    Config(String),

    /// Cancelled between stages.
    #[error("pipeline cancelled")]
    Cancelled,
}

impl PipelineError {
    /// Did the caller cancel, as opposed to a stage failing?
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            Self::Cancelled
                | Self::Segment(SegmentError::Cancelled)
                | Self::Flatten(FlattenError::Cancelled)
        )
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
