//! Compaction of a mesh down to a subset of its triangles.

use std::collections::BTreeSet;

use seamcraft_mesh::Mesh;

const UNMAPPED: u32 = u32::MAX;

/// Build a new mesh from the triangles listed in `keep`.
///
/// Only vertices referenced by kept triangles survive, in their original
/// relative order, and indices are remapped to the compacted array. This is
/// the only path through which repair shrinks a mesh, so no output ever has
/// orphan vertices or out-of-range indices. Entries of `keep` past the end
/// of the triangle list are ignored.
pub fn rebuild_from_triangle_subset(mesh: &Mesh, keep: &BTreeSet<usize>) -> Mesh {
    let triangle_count = mesh.triangle_count();
    let kept: Vec<usize> = keep
        .iter()
        .copied()
        .filter(|&t| t < triangle_count)
        .collect();

    let used: BTreeSet<u32> = kept
        .iter()
        .flat_map(|&t| mesh.triangle(t))
        .collect();

    let mut remap = vec![UNMAPPED; mesh.vertex_count()];
    let mut vertices = Vec::with_capacity(used.len());
    for &old in &used {
        remap[old as usize] = vertices.len() as u32;
        vertices.push(mesh.vertices[old as usize]);
    }

    let mut triangles = Vec::with_capacity(kept.len() * 3);
    for &t in &kept {
        for v in mesh.triangle(t) {
            triangles.push(remap[v as usize]);
        }
    }

    Mesh::from_parts(vertices, triangles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use seamcraft_mesh::primitives::{grid, unit_cube};

    #[test]
    fn test_keep_all_is_identity_on_compact_mesh() {
        let mesh = unit_cube();
        let keep: BTreeSet<usize> = (0..mesh.triangle_count()).collect();
        assert_eq!(rebuild_from_triangle_subset(&mesh, &keep), mesh);
    }

    #[test]
    fn test_subset_drops_orphans() {
        let mesh = grid(2, 1.0);
        // First quad only
        let keep: BTreeSet<usize> = [0, 1].into_iter().collect();
        let out = rebuild_from_triangle_subset(&mesh, &keep);
        assert_eq!(out.triangle_count(), 2);
        assert_eq!(out.vertex_count(), 4);
        assert!(out.is_valid());
        assert!((out.surface_area() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_orphan_vertices_removed() {
        let mut mesh = unit_cube();
        mesh.vertices.push([9.0, 9.0, 9.0]);
        let keep: BTreeSet<usize> = (0..mesh.triangle_count()).collect();
        let out = rebuild_from_triangle_subset(&mesh, &keep);
        assert_eq!(out.vertex_count(), 8);
    }

    #[test]
    fn test_empty_subset() {
        let out = rebuild_from_triangle_subset(&unit_cube(), &BTreeSet::new());
        assert!(out.is_empty());
        assert_eq!(out.vertex_count(), 0);
    }

    #[test]
    fn test_out_of_range_subset_entries_ignored() {
        let keep: BTreeSet<usize> = [0, 500].into_iter().collect();
        let out = rebuild_from_triangle_subset(&unit_cube(), &keep);
        assert_eq!(out.triangle_count(), 1);
    }
}
