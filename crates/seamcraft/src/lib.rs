#![warn(missing_docs)]

//! seamcraft: turn 3D body scans into flat, sewable pattern pieces.
//!
//! The stages live in their own crates and are re-exported here:
//!
//! * [`mesh`]: the indexed triangle mesh, calibration and cancellation.
//! * [`repair`]: component isolation, cropping and hole filling.
//! * [`segment`]: clustering triangles into panels.
//! * [`flatten`]: conformal flattening, seam allowance and cutting layout.
//! * [`validate`]: sewability and fabric checks.
//!
//! [`Pipeline`] chains them.
//!
//! # Example
//!
//! ```rust,no_run
//! use seamcraft::mesh::{primitives, Calibration, NeverCancel};
//! use seamcraft::{Pipeline, PipelineConfig};
//!
//! let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
//! let scan = primitives::grid(10, 1.0);
//! let output = pipeline
//!     .run(&scan, &Calibration::IDENTITY, 3, &NeverCancel)
//!     .unwrap();
//! for piece in &output.flattened {
//!     println!("{} points, {:.0} mm²", piece.points.len(), piece.area());
//! }
//! ```

pub mod config;
pub mod error;
pub mod pipeline;

pub use seamcraft_flatten as flatten;
pub use seamcraft_math as math;
pub use seamcraft_mesh as mesh;
pub use seamcraft_pattern as pattern;
pub use seamcraft_repair as repair;
pub use seamcraft_segment as segment;
pub use seamcraft_validate as validate;

pub use config::PipelineConfig;
pub use error::{PipelineError, Result};
pub use pipeline::{Pipeline, PipelineOutput};

pub use seamcraft_mesh::{Calibration, CancelSignal, Mesh, NeverCancel};
pub use seamcraft_pattern::{FlattenedPanel, Panel, PanelId};
