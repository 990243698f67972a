//! Meshes shared by the repair tests.

use std::collections::HashSet;

use seamcraft_mesh::{primitives::unit_cube, Mesh};

/// Closed flat square: a top fan and a bottom fan around eight rim
/// vertices, with top triangle `skip` removed.
pub(crate) fn pillow_with_hole(skip: Option<usize>) -> Mesh {
    let vertices = vec![
        [0.0, 0.0, 0.0],
        [0.5, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 0.5, 0.0],
        [1.0, 1.0, 0.0],
        [0.5, 1.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.5, 0.0],
        [0.5, 0.5, 0.1],
        [0.5, 0.5, -0.1],
    ];
    let mut triangles = Vec::new();
    for i in 0..8u32 {
        if Some(i as usize) != skip {
            triangles.extend_from_slice(&[8, i, (i + 1) % 8]);
        }
    }
    for i in 0..8u32 {
        triangles.extend_from_slice(&[9, (i + 1) % 8, i]);
    }
    Mesh::from_parts(vertices, triangles)
}

/// Unit cube whose last triangle is moved onto three new vertices, leaving
/// an eleven-triangle body and a one-triangle island.
pub(crate) fn cube_with_island() -> Mesh {
    let mut mesh = unit_cube();
    let base = mesh.vertex_count() as u32;
    mesh.vertices
        .extend_from_slice(&[[3.0, 0.0, 0.0], [4.0, 0.0, 0.0], [3.0, 1.0, 0.0]]);
    let last = mesh.triangles.len() - 3;
    mesh.triangles[last..].copy_from_slice(&[base, base + 1, base + 2]);
    mesh
}

/// Every directed edge appears at most once.
pub(crate) fn is_consistently_oriented(mesh: &Mesh) -> bool {
    let directed: Vec<(u32, u32)> = mesh
        .triangles_iter()
        .flat_map(|[a, b, c]| [(a, b), (b, c), (c, a)])
        .collect();
    let unique: HashSet<_> = directed.iter().copied().collect();
    unique.len() == directed.len()
}
