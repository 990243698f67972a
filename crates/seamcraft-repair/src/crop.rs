//! Horizontal plane cropping.
//!
//! Captures usually include a slab of floor or table under the object.
//! Cropping removes every triangle whose centroid lies on the discarded side
//! of a horizontal plane placed at a fraction of the mesh height (+Y up).

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use seamcraft_mesh::Mesh;
use tracing::{debug, warn};

use crate::rebuild::rebuild_from_triangle_subset;

/// Which side of the plane is removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CropDirection {
    /// Remove everything below the plane.
    #[default]
    Below,
    /// Remove everything above the plane.
    Above,
}

impl CropDirection {
    /// Is a centroid at height `y` kept for a plane at `plane`?
    pub fn keeps(self, y: f64, plane: f64) -> bool {
        match self {
            CropDirection::Below => y >= plane,
            CropDirection::Above => y <= plane,
        }
    }
}

/// Crop plane settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropOptions {
    /// Plane height as a fraction of the vertical extent, in `[0, 1]`.
    pub height_fraction: f64,
    /// Side to remove.
    pub direction: CropDirection,
}

impl Default for CropOptions {
    fn default() -> Self {
        Self {
            height_fraction: 0.05,
            direction: CropDirection::Below,
        }
    }
}

/// Remove triangles on the `direction` side of a horizontal plane.
///
/// The plane sits at `min.y + height_fraction * height`. Fractions outside
/// `[0, 1]` are clamped. Returns the cropped mesh and the number of
/// triangles removed.
///
/// The mesh must satisfy its validity invariant.
pub fn crop_by_plane(mesh: &Mesh, height_fraction: f64, direction: CropDirection) -> (Mesh, usize) {
    let Some(bounds) = mesh.bounds().filter(|_| !mesh.is_empty()) else {
        return (mesh.clone(), 0);
    };

    let fraction = if height_fraction.is_finite() {
        height_fraction.clamp(0.0, 1.0)
    } else {
        0.0
    };
    if fraction != height_fraction {
        warn!(
            "Crop fraction {} outside [0, 1], using {}",
            height_fraction, fraction
        );
    }

    let plane = bounds.min.y + fraction * bounds.size().y;
    let keep: BTreeSet<usize> = (0..mesh.triangle_count())
        .filter(|&t| direction.keeps(mesh.triangle_centroid(t).y, plane))
        .collect();

    let removed = mesh.triangle_count() - keep.len();
    if removed == 0 {
        return (mesh.clone(), 0);
    }

    debug!(
        "Cropped {} triangles {:?} plane y = {:.4}",
        removed, direction, plane
    );
    (rebuild_from_triangle_subset(mesh, &keep), removed)
}
