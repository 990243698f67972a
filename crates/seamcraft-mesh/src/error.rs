//! Error types for the mesh model.

use thiserror::Error;

/// Errors raised when a mesh fails its validity invariant.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    /// Mesh has no vertices or no triangles.
    #[error("mesh is empty")]
    Empty,

    /// Triangle index list is not a multiple of three.
    #[error("triangle index list has length {len}, which is not a multiple of 3")]
    MisalignedTriangles {
        /// Length of the index list.
        len: usize,
    },

    /// A triangle references a vertex that does not exist.
    #[error("triangle {triangle} references vertex {index} but mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        /// Offending triangle.
        triangle: usize,
        /// Offending vertex index.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },

    /// A vertex coordinate is NaN or infinite.
    #[error("vertex {index} has a non-finite coordinate")]
    NonFiniteVertex {
        /// Offending vertex.
        index: usize,
    },

    /// Calibration scale factor is unusable.
    #[error("invalid calibration scale factor: {0}")]
    InvalidScale(f64),
}

/// Result type for mesh operations.
pub type Result<T> = std::result::Result<T, MeshError>;
