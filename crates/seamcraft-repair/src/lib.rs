#![warn(missing_docs)]

//! Topology repair for captured meshes.
//!
//! Scans arrive with stray islands, a slab of floor under the object and
//! small holes where the sensor lost track. [`processed`] cleans a mesh in a
//! fixed order: isolate components, crop, then fill holes. Each step is also
//! available on its own, and every step that shrinks the mesh goes through
//! [`rebuild_from_triangle_subset`], so outputs never carry orphan vertices.
//!
//! # Example
//!
//! ```
//! use seamcraft_mesh::primitives::unit_cube;
//! use seamcraft_repair::{processed, RepairOptions};
//!
//! let result = processed(&unit_cube(), &RepairOptions::default()).unwrap();
//! assert!(!result.had_changes());
//! assert_eq!(result.final_triangle_count, 12);
//! ```

pub mod boundary;
pub mod components;
pub mod crop;
pub mod holes;
pub mod rebuild;

#[cfg(test)]
mod fixtures;

use std::fmt;

use seamcraft_mesh::{Mesh, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

pub use boundary::{analyze_boundaries, BoundaryInfo, BoundaryLoop};
pub use components::{connected_components, isolate_largest_component};
pub use crop::{crop_by_plane, CropDirection, CropOptions};
pub use holes::fill_small_holes;
pub use rebuild::rebuild_from_triangle_subset;

/// Which repair steps run, and how.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepairOptions {
    /// Drop disconnected pieces.
    pub isolate_components: bool,
    /// Components at least this large survive isolation alongside the
    /// largest one.
    pub min_component_triangles: usize,
    /// Horizontal crop; `None` disables cropping.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop: Option<CropOptions>,
    /// Fill small holes.
    pub fill_holes: bool,
    /// Largest hole (in edges) that is filled.
    pub max_hole_edges: usize,
}

impl Default for RepairOptions {
    fn default() -> Self {
        Self {
            isolate_components: true,
            min_component_triangles: 100,
            crop: None,
            fill_holes: true,
            max_hole_edges: 30,
        }
    }
}

impl RepairOptions {
    /// Options that leave every mesh untouched.
    pub fn disabled() -> Self {
        Self {
            isolate_components: false,
            crop: None,
            fill_holes: false,
            ..Self::default()
        }
    }

    /// Set the crop plane.
    pub fn with_crop(mut self, height_fraction: f64, direction: CropDirection) -> Self {
        self.crop = Some(CropOptions {
            height_fraction,
            direction,
        });
        self
    }

    /// Set the largest hole that is filled.
    pub fn with_max_hole_edges(mut self, max_hole_edges: usize) -> Self {
        self.max_hole_edges = max_hole_edges;
        self
    }

    /// Set the minimum size of secondary components that are kept.
    pub fn with_min_component_triangles(mut self, min: usize) -> Self {
        self.min_component_triangles = min;
        self
    }
}

/// Outcome of [`processed`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessingResult {
    /// Repaired mesh.
    pub mesh: Mesh,
    /// Components dropped by isolation.
    pub components_removed: usize,
    /// Triangles removed by the crop plane.
    pub triangles_cropped: usize,
    /// Holes closed.
    pub holes_filled: usize,
    /// Triangle count before repair.
    pub original_triangle_count: usize,
    /// Triangle count after repair.
    pub final_triangle_count: usize,
}

impl ProcessingResult {
    /// Did any step change the mesh?
    pub fn had_changes(&self) -> bool {
        self.components_removed > 0 || self.triangles_cropped > 0 || self.holes_filled > 0
    }
}

impl fmt::Display for ProcessingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Repair: {} -> {} triangles ({} components removed, {} cropped, {} holes filled)",
            self.original_triangle_count,
            self.final_triangle_count,
            self.components_removed,
            self.triangles_cropped,
            self.holes_filled
        )
    }
}

/// Run isolation, cropping and hole filling, in that order.
///
/// Disabled steps pass the mesh through. A valid empty mesh is returned
/// unchanged with zero counts.
///
/// # Errors
///
/// Returns the mesh error when the input breaks the mesh invariant, even
/// when it has too few vertices or indices to hold a triangle.
pub fn processed(mesh: &Mesh, options: &RepairOptions) -> Result<ProcessingResult> {
    mesh.validate()?;
    let original_triangle_count = mesh.triangle_count();
    if mesh.is_empty() {
        return Ok(ProcessingResult {
            mesh: mesh.clone(),
            original_triangle_count,
            final_triangle_count: original_triangle_count,
            ..ProcessingResult::default()
        });
    }

    let mut current = mesh.clone();

    let components_removed = if options.isolate_components {
        let (next, removed) = isolate_largest_component(&current, options.min_component_triangles);
        current = next;
        removed
    } else {
        0
    };

    let triangles_cropped = match options.crop {
        Some(crop) => {
            let (next, removed) = crop_by_plane(&current, crop.height_fraction, crop.direction);
            current = next;
            removed
        }
        None => 0,
    };

    let holes_filled = if options.fill_holes {
        let (next, filled) = fill_small_holes(&current, options.max_hole_edges);
        current = next;
        filled
    } else {
        0
    };

    let result = ProcessingResult {
        final_triangle_count: current.triangle_count(),
        mesh: current,
        components_removed,
        triangles_cropped,
        holes_filled,
        original_triangle_count,
    };
    info!("{}", result);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{cube_with_island, pillow_with_hole};
    use seamcraft_mesh::MeshError;

    #[test]
    fn test_defaults() {
        let opts = RepairOptions::default();
        assert!(opts.isolate_components);
        assert_eq!(opts.min_component_triangles, 100);
        assert!(opts.crop.is_none());
        assert!(opts.fill_holes);
        assert_eq!(opts.max_hole_edges, 30);
    }

    #[test]
    fn test_processed_empty_mesh() {
        let result = processed(&Mesh::new(), &RepairOptions::default()).unwrap();
        assert!(!result.had_changes());
        assert!(result.mesh.is_empty());
        assert_eq!(result.final_triangle_count, 0);
    }

    #[test]
    fn test_processed_zero_triangles_passes_through() {
        let mesh = Mesh::from_parts(vec![[0.0; 3]; 4], Vec::new());
        let result = processed(&mesh, &RepairOptions::default()).unwrap();
        assert_eq!(result.mesh, mesh);
    }

    #[test]
    fn test_processed_rejects_bad_indices() {
        let mesh = Mesh::from_parts(vec![[0.0; 3]; 3], vec![0, 1, 7]);
        assert!(matches!(
            processed(&mesh, &RepairOptions::default()),
            Err(MeshError::IndexOutOfRange { index: 7, .. })
        ));
    }

    #[test]
    fn test_processed_rejects_malformed_near_empty_meshes() {
        // Indices into a mesh with no vertices at all
        let mesh = Mesh::from_parts(Vec::new(), vec![0, 1, 2]);
        assert!(matches!(
            processed(&mesh, &RepairOptions::default()),
            Err(MeshError::IndexOutOfRange { index: 0, vertex_count: 0, .. })
        ));
        // A partial triangle
        let mesh = Mesh::from_parts(vec![[0.0; 3]; 3], vec![0, 1]);
        assert_eq!(
            processed(&mesh, &RepairOptions::default()),
            Err(MeshError::MisalignedTriangles { len: 2 })
        );
    }

    #[test]
    fn test_processed_runs_all_steps() {
        let mut mesh = pillow_with_hole(Some(2));
        mesh.merge(&cube_with_island().scaled(0.01));
        let opts = RepairOptions::default()
            .with_min_component_triangles(1000)
            .with_max_hole_edges(12);

        let result = processed(&mesh, &opts).unwrap();
        // The small cube and its island go, the pillow hole is closed
        assert_eq!(result.components_removed, 2);
        assert_eq!(result.holes_filled, 1);
        assert_eq!(result.original_triangle_count, 15 + 12);
        assert_eq!(result.final_triangle_count, 18);
        assert!(result.mesh.is_valid());
        assert!(analyze_boundaries(&result.mesh).is_watertight());
        assert!(result.had_changes());
    }

    #[test]
    fn test_processed_disabled_is_identity() {
        let mesh = cube_with_island();
        let result = processed(&mesh, &RepairOptions::disabled()).unwrap();
        assert_eq!(result.mesh, mesh);
        assert!(!result.had_changes());
    }

    #[test]
    fn test_processed_is_idempotent() {
        let opts = RepairOptions::default().with_min_component_triangles(5);
        let once = processed(&cube_with_island(), &opts).unwrap();
        let twice = processed(&once.mesh, &opts).unwrap();
        assert_eq!(once.holes_filled, 1);
        assert_eq!(twice.mesh, once.mesh);
        assert_eq!(twice.components_removed, 0);
        assert_eq!(twice.holes_filled, 0);
    }

    #[test]
    fn test_counts_never_grow_without_filling() {
        let opts = RepairOptions {
            fill_holes: false,
            ..RepairOptions::default().with_crop(0.5, CropDirection::Above)
        };
        let mesh = cube_with_island();
        let result = processed(&mesh, &opts).unwrap();
        assert!(result.mesh.triangle_count() <= mesh.triangle_count());
        assert!(result.mesh.vertex_count() <= mesh.vertex_count());
    }

    #[test]
    fn test_display_summary() {
        let result = ProcessingResult {
            original_triangle_count: 120,
            final_triangle_count: 100,
            components_removed: 2,
            ..ProcessingResult::default()
        };
        let text = result.to_string();
        assert!(text.contains("120 -> 100"));
        assert!(text.contains("2 components removed"));
    }
}
