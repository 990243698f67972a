//! Filling small boundary loops with centroid fans.

use std::collections::{BTreeSet, HashSet};

use seamcraft_mesh::Mesh;
use tracing::{debug, info, warn};

use crate::boundary::{analyze_boundaries, directed_edges, BoundaryLoop};
use crate::rebuild::rebuild_from_triangle_subset;

/// Smallest loop that can be filled.
pub const MIN_HOLE_EDGES: usize = 3;

/// Fill every closed boundary loop with `3..=max_edges` edges.
///
/// Each hole gets a new vertex at the centroid of its loop and one fan
/// triangle per loop edge. Fan triangles traverse each loop edge opposite to
/// the triangle already on the other side, so orientation is preserved.
/// Larger loops stay open, as do loops through non-manifold boundary
/// vertices. Returns the new mesh and the number of holes filled.
///
/// Once any hole is filled the result is rebuilt over all of its triangles,
/// so vertices no triangle uses are dropped and the rest are renumbered in
/// their original order. When nothing is filled the input comes back
/// untouched, unreferenced vertices included.
///
/// The mesh must satisfy its validity invariant.
pub fn fill_small_holes(mesh: &Mesh, max_edges: usize) -> (Mesh, usize) {
    if mesh.is_empty() {
        return (mesh.clone(), 0);
    }

    let info = analyze_boundaries(mesh);
    if info.loops.is_empty() {
        return (mesh.clone(), 0);
    }

    let directed = directed_edges(mesh);
    let mut vertices = mesh.vertices.clone();
    let mut triangles = mesh.triangles.clone();
    let mut filled = 0;

    for hole in &info.loops {
        let size = hole.edge_count();
        if size < MIN_HOLE_EDGES {
            continue;
        }
        if size > max_edges {
            warn!("Skipping large hole with {} edges (max: {})", size, max_edges);
            continue;
        }
        if let Some(&v) = info
            .non_manifold_vertices
            .iter()
            .find(|&&v| hole.contains(v))
        {
            warn!(
                "Skipping hole with {} edges through non-manifold vertex {}",
                size, v
            );
            continue;
        }

        let ordered = oriented_against(hole, &directed);
        let center = vertices.len() as u32;
        vertices.push(loop_centroid(mesh, &ordered));
        let n = ordered.len();
        for i in 0..n {
            triangles.extend_from_slice(&[center, ordered[i], ordered[(i + 1) % n]]);
        }
        debug!("Filled hole with {} edges using {} triangles", size, n);
        filled += 1;
    }

    if filled == 0 {
        return (mesh.clone(), 0);
    }

    info!("Filled {} of {} holes", filled, info.loops.len());

    let patched = Mesh::from_parts(vertices, triangles);
    let all: BTreeSet<usize> = (0..patched.triangle_count()).collect();
    (rebuild_from_triangle_subset(&patched, &all), filled)
}

/// Loop vertices in the order that runs against the existing triangles.
fn oriented_against(
    hole: &BoundaryLoop,
    directed: &HashSet<(u32, u32)>,
) -> Vec<u32> {
    let mut ordered = hole.vertices.clone();
    if directed.contains(&(ordered[0], ordered[1])) {
        ordered.reverse();
    }
    ordered
}

fn loop_centroid(mesh: &Mesh, vertices: &[u32]) -> [f32; 3] {
    let sum = vertices
        .iter()
        .fold(seamcraft_math::Vec3::zeros(), |acc, &v| acc + mesh.position(v).coords);
    let c = sum / vertices.len() as f64;
    [c.x as f32, c.y as f32, c.z as f32]
}
