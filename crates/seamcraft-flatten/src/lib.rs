#![warn(missing_docs)]

//! Conformal flattening of mesh panels into 2D pattern pieces.
//!
//! Each panel is cut out of the parent mesh, pinned at the two boundary
//! vertices farthest apart, and laid flat with a least-squares conformal
//! map so angles are preserved as well as possible. The outer boundary
//! becomes the cut line, scaled to pattern units, with a mitred seam
//! allowance outline around it. [`optimize_for_cutting`] then packs the
//! pieces into rows.
//!
//! # Example
//!
//! ```
//! use seamcraft_flatten::{flatten_panels, FlattenSettings};
//! use seamcraft_mesh::{primitives::grid, NeverCancel};
//! use seamcraft_pattern::{Color, Panel};
//!
//! let mesh = grid(2, 0.5);
//! let panel = Panel::new(mesh.triangles.clone(), Vec::new(), Color::default());
//! let pieces = flatten_panels(&[panel], &mesh, &FlattenSettings::default(), &NeverCancel).unwrap();
//! assert_eq!(pieces[0].points.len(), 8);
//! ```

pub mod error;
pub mod flatten;
pub mod layout;
mod lscm;
pub mod settings;
mod submesh;

pub use error::{FlattenError, Result};
pub use flatten::{flatten_panel, flatten_panels};
pub use layout::{layout_bounds, optimize_for_cutting};
pub use settings::{FlattenSettings, LayoutSettings};
