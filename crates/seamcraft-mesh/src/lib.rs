#![warn(missing_docs)]

//! Triangle mesh model for the seamcraft pattern pipeline.
//!
//! This is the leaf crate every stage builds on: the indexed [`Mesh`],
//! canonical [`Edge`] keys, the [`Calibration`] that converts capture units
//! to meters, and the [`CancelSignal`] polled by iterative stages.
//!
//! # Example
//!
//! ```
//! use seamcraft_mesh::{primitives, Mesh};
//!
//! let cube: Mesh = primitives::unit_cube();
//! assert!(cube.is_valid());
//! assert_eq!(cube.triangle_count(), 12);
//! ```

pub mod calibration;
pub mod cancel;
pub mod edge;
pub mod error;
pub mod mesh;
pub mod primitives;

pub use calibration::Calibration;
pub use cancel::{CancelSignal, NeverCancel};
pub use edge::Edge;
pub use error::{MeshError, Result};
pub use mesh::Mesh;
