//! Panels: regions of a 3D mesh selected to become one pattern piece.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identity of a panel or pattern piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PanelId(pub Uuid);

impl PanelId {
    /// A fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PanelId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display color, components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha.
    pub a: f32,
}

impl Color {
    /// Opaque color from RGB components.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Fixed palette used to color panels; wraps around after its length.
    pub const PALETTE: [Color; 10] = [
        Color::rgb(0.90, 0.30, 0.24),
        Color::rgb(0.20, 0.60, 0.86),
        Color::rgb(0.18, 0.80, 0.44),
        Color::rgb(0.95, 0.77, 0.06),
        Color::rgb(0.61, 0.35, 0.71),
        Color::rgb(0.90, 0.49, 0.13),
        Color::rgb(0.10, 0.74, 0.61),
        Color::rgb(0.91, 0.30, 0.55),
        Color::rgb(0.52, 0.58, 0.59),
        Color::rgb(0.17, 0.24, 0.31),
    ];

    /// Palette entry for panel number `index`.
    pub fn palette(index: usize) -> Self {
        Self::PALETTE[index % Self::PALETTE.len()]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::palette(0)
    }
}

/// A subset of a mesh identified by vertex and triangle indices.
///
/// `triangles` holds vertex-index triples into the parent mesh, so its
/// length is a multiple of three. Whether those indices are in range is
/// checked by the flattener, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    /// Panel identity.
    pub id: PanelId,
    /// Every vertex referenced by `triangles`.
    pub vertex_indices: BTreeSet<u32>,
    /// Flat array of vertex-index triples.
    pub triangles: Vec<u32>,
    /// Source triangle numbers in the parent mesh, parallel to `triangles`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub faces: Vec<u32>,
    /// Display color.
    pub color: Color,
    /// When segmentation produced this panel.
    pub created_at: DateTime<Utc>,
}

impl Panel {
    /// Build a panel from triangle triples, deriving the vertex set.
    pub fn new(triangles: Vec<u32>, faces: Vec<u32>, color: Color) -> Self {
        let vertex_indices = triangles.iter().copied().collect();
        Self {
            id: PanelId::new(),
            vertex_indices,
            triangles,
            faces,
            color,
            created_at: Utc::now(),
        }
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    /// Iterate over triangles as index triples.
    pub fn triangles_iter(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.triangles
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
    }

    /// Copy of this panel with a different color.
    pub fn with_color(&self, color: Color) -> Self {
        Self {
            color,
            ..self.clone()
        }
    }
}
