#![warn(missing_docs)]

//! Panel segmentation: partition a mesh into regions that flatten well.
//!
//! Triangles are clustered by centroid position and normal direction, and
//! each cluster is split into its edge-connected regions, so every panel is
//! a spatially contiguous, roughly planar patch. Clustering is
//! seeded deterministically; the same mesh and settings always produce the
//! same partition.
//!
//! # Example
//!
//! ```
//! use seamcraft_mesh::primitives::unit_cube;
//! use seamcraft_segment::segment_mesh;
//!
//! let panels = segment_mesh(&unit_cube(), 6).unwrap();
//! let total: usize = panels.iter().map(|p| p.triangle_count()).sum();
//! assert_eq!(total, 12);
//! ```

pub mod error;
mod kmeans;
mod regions;
pub mod segmenter;
pub mod settings;

pub use error::{Result, SegmentError};
pub use segmenter::{preview_segmentation, segment_mesh, PanelSegmenter, Segmenter};
pub use settings::{PreviewResolution, SegmentationSettings};
