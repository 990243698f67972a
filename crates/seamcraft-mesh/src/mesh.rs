//! The indexed triangle mesh handed over by the capture collaborator.

use seamcraft_math::{Aabb3, Point3, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{MeshError, Result};

/// Indexed triangle mesh.
///
/// Operations never mutate a mesh in place; repair stages return a new
/// value. The invariant checked by [`Mesh::validate`] is that every index
/// is in `[0, vertices.len())` and `triangles.len() % 3 == 0`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    /// Vertex positions.
    pub vertices: Vec<[f32; 3]>,
    /// Flat array of triangle indices: `[i0, i1, i2, ...]`.
    pub triangles: Vec<u32>,
}

impl Mesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh from raw parts without validating them.
    pub fn from_parts(vertices: Vec<[f32; 3]>, triangles: Vec<u32>) -> Self {
        Self {
            vertices,
            triangles,
        }
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    /// True when there is nothing to process (no vertices or no triangles).
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.triangles.len() < 3
    }

    /// Position of vertex `index` in double precision.
    ///
    /// Panics if `index` is out of range; call [`Mesh::validate`] first on
    /// untrusted input.
    pub fn position(&self, index: u32) -> Point3 {
        let v = self.vertices[index as usize];
        Point3::new(v[0] as f64, v[1] as f64, v[2] as f64)
    }

    /// Vertex indices of triangle `t`.
    pub fn triangle(&self, t: usize) -> [u32; 3] {
        [
            self.triangles[t * 3],
            self.triangles[t * 3 + 1],
            self.triangles[t * 3 + 2],
        ]
    }

    /// Iterate over triangles as index triples.
    pub fn triangles_iter(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.triangles
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
    }

    /// Corner positions of triangle `t`.
    pub fn triangle_positions(&self, t: usize) -> [Point3; 3] {
        let [a, b, c] = self.triangle(t);
        [self.position(a), self.position(b), self.position(c)]
    }

    /// Area of triangle `t`.
    pub fn triangle_area(&self, t: usize) -> f64 {
        let [p0, p1, p2] = self.triangle_positions(t);
        (p1 - p0).cross(&(p2 - p0)).norm() * 0.5
    }

    /// Unit normal of triangle `t`, `None` for a degenerate triangle.
    pub fn triangle_normal(&self, t: usize) -> Option<Vec3> {
        let [p0, p1, p2] = self.triangle_positions(t);
        let n = (p1 - p0).cross(&(p2 - p0));
        let len = n.norm();
        if len > f64::EPSILON {
            Some(n / len)
        } else {
            None
        }
    }

    /// Centroid of triangle `t`.
    pub fn triangle_centroid(&self, t: usize) -> Point3 {
        let [p0, p1, p2] = self.triangle_positions(t);
        Point3::from((p0.coords + p1.coords + p2.coords) / 3.0)
    }

    /// Total surface area.
    pub fn surface_area(&self) -> f64 {
        (0..self.triangle_count())
            .map(|t| self.triangle_area(t))
            .sum()
    }

    /// Axis-aligned bounds of all vertices, `None` when there are none.
    pub fn bounds(&self) -> Option<Aabb3> {
        Aabb3::from_points(
            self.vertices
                .iter()
                .map(|v| Point3::new(v[0] as f64, v[1] as f64, v[2] as f64)),
        )
    }

    /// Check the mesh validity invariant.
    ///
    /// An empty mesh is valid; stages that need geometry reject it
    /// separately with [`MeshError::Empty`].
    pub fn validate(&self) -> Result<()> {
        if self.triangles.len() % 3 != 0 {
            return Err(MeshError::MisalignedTriangles {
                len: self.triangles.len(),
            });
        }
        let vertex_count = self.vertices.len();
        for (i, &index) in self.triangles.iter().enumerate() {
            if index as usize >= vertex_count {
                return Err(MeshError::IndexOutOfRange {
                    triangle: i / 3,
                    index,
                    vertex_count,
                });
            }
        }
        if let Some(index) = self
            .vertices
            .iter()
            .position(|v| v.iter().any(|c| !c.is_finite()))
        {
            return Err(MeshError::NonFiniteVertex { index });
        }
        Ok(())
    }

    /// Convenience wrapper around [`Mesh::validate`].
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Copy of this mesh with every coordinate multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Mesh {
        let vertices = self
            .vertices
            .iter()
            .map(|v| {
                [
                    (v[0] as f64 * factor) as f32,
                    (v[1] as f64 * factor) as f32,
                    (v[2] as f64 * factor) as f32,
                ]
            })
            .collect();
        Mesh {
            vertices,
            triangles: self.triangles.clone(),
        }
    }

    /// Merge another mesh into this one.
    pub fn merge(&mut self, other: &Mesh) {
        let offset = self.vertex_count() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.triangles
            .extend(other.triangles.iter().map(|&i| i + offset));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::unit_cube;

    #[test]
    fn test_cube_counts() {
        let mesh = unit_cube();
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.triangle_count(), 12);
        assert!(mesh.is_valid());
        assert!(!mesh.is_empty());
    }

    #[test]
    fn test_cube_area_and_bounds() {
        let mesh = unit_cube();
        assert!((mesh.surface_area() - 6.0).abs() < 1e-9);
        let bb = mesh.bounds().unwrap();
        assert!((bb.diagonal() - 3f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_validate_misaligned() {
        let mesh = Mesh::from_parts(vec![[0.0; 3]; 3], vec![0, 1]);
        assert_eq!(
            mesh.validate(),
            Err(MeshError::MisalignedTriangles { len: 2 })
        );
    }

    #[test]
    fn test_validate_out_of_range() {
        let mesh = Mesh::from_parts(vec![[0.0; 3]; 3], vec![0, 1, 3]);
        assert!(matches!(
            mesh.validate(),
            Err(MeshError::IndexOutOfRange { index: 3, .. })
        ));
    }

    #[test]
    fn test_validate_non_finite() {
        let mesh = Mesh::from_parts(
            vec![[0.0; 3], [f32::NAN, 0.0, 0.0], [0.0, 1.0, 0.0]],
            vec![0, 1, 2],
        );
        assert_eq!(mesh.validate(), Err(MeshError::NonFiniteVertex { index: 1 }));
    }

    #[test]
    fn test_empty_mesh_is_valid() {
        let mesh = Mesh::new();
        assert!(mesh.is_empty());
        assert!(mesh.is_valid());
        assert!(mesh.bounds().is_none());
    }

    #[test]
    fn test_triangle_queries() {
        let mesh = Mesh::from_parts(
            vec![[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 2.0, 0.0]],
            vec![0, 1, 2],
        );
        assert!((mesh.triangle_area(0) - 2.0).abs() < 1e-12);
        let n = mesh.triangle_normal(0).unwrap();
        assert!((n.z - 1.0).abs() < 1e-12);
        let c = mesh.triangle_centroid(0);
        assert!((c.x - 2.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_triangle_has_no_normal() {
        let mesh = Mesh::from_parts(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]],
            vec![0, 1, 2],
        );
        assert!(mesh.triangle_normal(0).is_none());
    }

    #[test]
    fn test_scaled() {
        let mesh = unit_cube().scaled(0.5);
        let bb = mesh.bounds().unwrap();
        assert!((bb.size().x - 0.5).abs() < 1e-6);
        assert_eq!(mesh.triangles, unit_cube().triangles);
    }

    #[test]
    fn test_merge_offsets_indices() {
        let mut a = unit_cube();
        let b = unit_cube();
        a.merge(&b);
        assert_eq!(a.vertex_count(), 16);
        assert_eq!(a.triangle_count(), 24);
        assert!(a.is_valid());
        assert_eq!(a.triangle(12)[0], b.triangle(0)[0] + 8);
    }

    #[test]
    fn test_mesh_serde_round_trip() {
        let mesh = unit_cube();
        let json = serde_json::to_string(&mesh).unwrap();
        let back: Mesh = serde_json::from_str(&json).unwrap();
        assert_eq!(mesh, back);
    }
}
