//! Boundary edge analysis and loop chaining.
//!
//! A boundary edge is used by exactly one triangle. Boundary edges are
//! chained into closed loops; each closed loop is a hole (or the rim of an
//! open surface). Open chains are a capture defect and are dropped with a
//! warning rather than reported as holes.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use seamcraft_mesh::{Edge, Mesh};
use tracing::{debug, warn};

/// An ordered closed loop of boundary vertices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryLoop {
    /// Vertex indices in traversal order; the last connects back to the first.
    pub vertices: Vec<u32>,
}

impl BoundaryLoop {
    /// Number of edges (and vertices) in the loop.
    pub fn edge_count(&self) -> usize {
        self.vertices.len()
    }

    /// A loop needs at least three vertices to enclose anything.
    pub fn is_valid(&self) -> bool {
        self.vertices.len() >= 3
    }

    /// Does the loop pass through vertex `v`?
    pub fn contains(&self, v: u32) -> bool {
        self.vertices.contains(&v)
    }

    /// Consecutive vertex pairs, including the closing pair.
    pub fn edges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Perimeter in mesh units.
    pub fn length(&self, mesh: &Mesh) -> f64 {
        self.edges()
            .map(|(a, b)| (mesh.position(b) - mesh.position(a)).norm())
            .sum()
    }
}

/// Summary of a mesh's open boundary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundaryInfo {
    /// Every edge used by exactly one triangle.
    pub boundary_edges: BTreeSet<Edge>,
    /// Closed loops chained from the boundary edges.
    pub loops: Vec<BoundaryLoop>,
    /// Boundary vertices with more than two boundary neighbours. Loops
    /// through these are a best-effort decomposition.
    pub non_manifold_vertices: Vec<u32>,
    /// Chains that could not be closed and were dropped.
    pub open_chains: usize,
    /// Total length of all boundary edges, in mesh units.
    pub total_boundary_length: f64,
}

impl BoundaryInfo {
    /// Number of holes (closed loops).
    pub fn hole_count(&self) -> usize {
        self.loops.len()
    }

    /// Mean vertex count per loop, zero when there are none.
    pub fn average_loop_size(&self) -> f64 {
        if self.loops.is_empty() {
            return 0.0;
        }
        let total: usize = self.loops.iter().map(BoundaryLoop::edge_count).sum();
        total as f64 / self.loops.len() as f64
    }

    /// No boundary edges at all.
    pub fn is_watertight(&self) -> bool {
        self.boundary_edges.is_empty()
    }

    /// Is the loop decomposition ambiguous anywhere?
    pub fn has_non_manifold_vertices(&self) -> bool {
        !self.non_manifold_vertices.is_empty()
    }
}

/// Number of triangles adjacent to each undirected edge.
pub fn edge_face_counts(mesh: &Mesh) -> HashMap<Edge, usize> {
    let mut counts: HashMap<Edge, usize> = HashMap::with_capacity(mesh.triangles.len());
    for tri in mesh.triangles_iter() {
        for edge in Edge::of_triangle(tri) {
            *counts.entry(edge).or_insert(0) += 1;
        }
    }
    counts
}

/// Set of directed edges `(from, to)` as traversed by the mesh's triangles.
pub(crate) fn directed_edges(mesh: &Mesh) -> HashSet<(u32, u32)> {
    mesh.triangles_iter()
        .flat_map(|[a, b, c]| [(a, b), (b, c), (c, a)])
        .collect()
}

/// Find boundary edges and chain them into closed loops.
///
/// The mesh must satisfy its validity invariant. Walks start from the
/// lowest unvisited boundary vertex and always step to the lowest unvisited
/// neighbour, so the decomposition is deterministic even through
/// non-manifold boundary vertices.
pub fn analyze_boundaries(mesh: &Mesh) -> BoundaryInfo {
    let boundary_edges: BTreeSet<Edge> = edge_face_counts(mesh)
        .into_iter()
        .filter_map(|(edge, count)| (count == 1).then_some(edge))
        .collect();

    if boundary_edges.is_empty() {
        return BoundaryInfo::default();
    }

    let mut neighbours: BTreeMap<u32, Vec<u32>> = BTreeMap::new();
    for edge in &boundary_edges {
        neighbours.entry(edge.a()).or_default().push(edge.b());
        neighbours.entry(edge.b()).or_default().push(edge.a());
    }
    for list in neighbours.values_mut() {
        list.sort_unstable();
        list.dedup();
    }

    let non_manifold_vertices: Vec<u32> = neighbours
        .iter()
        .filter_map(|(&v, list)| (list.len() > 2).then_some(v))
        .collect();
    if !non_manifold_vertices.is_empty() {
        warn!(
            "Boundary has {} non-manifold vertices; loop decomposition is best-effort",
            non_manifold_vertices.len()
        );
    }

    let mut visited: HashSet<u32> = HashSet::new();
    let mut loops = Vec::new();
    let mut open_chains = 0;

    for &start in neighbours.keys() {
        if visited.contains(&start) {
            continue;
        }

        let mut loop_vertices = vec![start];
        visited.insert(start);
        let mut current = start;
        let closed = loop {
            let list = neighbours.get(&current).map(Vec::as_slice).unwrap_or(&[]);
            if let Some(&next) = list.iter().find(|n| !visited.contains(n)) {
                visited.insert(next);
                loop_vertices.push(next);
                current = next;
            } else if loop_vertices.len() > 2 && list.contains(&start) {
                break true;
            } else {
                break false;
            }
        };

        if closed {
            loops.push(BoundaryLoop {
                vertices: loop_vertices,
            });
        } else {
            warn!(
                "Boundary chain starting at vertex {} is not closed ({} vertices), dropping it",
                start,
                loop_vertices.len()
            );
            open_chains += 1;
        }
    }

    let total_boundary_length = boundary_edges
        .iter()
        .map(|e| (mesh.position(e.b()) - mesh.position(e.a())).norm())
        .sum();

    debug!(
        "Found {} boundary edges in {} loops, sizes: {:?}",
        boundary_edges.len(),
        loops.len(),
        loops.iter().map(BoundaryLoop::edge_count).collect::<Vec<_>>()
    );

    BoundaryInfo {
        boundary_edges,
        loops,
        non_manifold_vertices,
        open_chains,
        total_boundary_length,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use seamcraft_mesh::primitives::{grid, unit_cube};

    fn single_triangle() -> Mesh {
        Mesh::from_parts(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            vec![0, 1, 2],
        )
    }

    #[test]
    fn test_closed_cube_is_watertight() {
        let info = analyze_boundaries(&unit_cube());
        assert!(info.is_watertight());
        assert_eq!(info.hole_count(), 0);
        assert_eq!(info.average_loop_size(), 0.0);
    }

    #[test]
    fn test_single_triangle_is_one_loop() {
        let info = analyze_boundaries(&single_triangle());
        assert_eq!(info.boundary_edges.len(), 3);
        assert_eq!(info.hole_count(), 1);
        assert_eq!(info.loops[0].vertices, vec![0, 1, 2]);
        assert_relative_eq!(info.total_boundary_length, 2.0 + 2f64.sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn test_grid_rim() {
        let info = analyze_boundaries(&grid(3, 1.0));
        assert_eq!(info.boundary_edges.len(), 12);
        assert_eq!(info.hole_count(), 1);
        assert_eq!(info.loops[0].edge_count(), 12);
        assert_relative_eq!(info.total_boundary_length, 4.0, epsilon = 1e-6);
        assert_relative_eq!(info.loops[0].length(&grid(3, 1.0)), 4.0, epsilon = 1e-6);
        assert!(!info.has_non_manifold_vertices());
    }

    #[test]
    fn test_cube_missing_face_has_square_hole() {
        let cube = unit_cube();
        let keep: BTreeSet<usize> = (2..cube.triangle_count()).collect();
        let open = crate::rebuild::rebuild_from_triangle_subset(&cube, &keep);
        let info = analyze_boundaries(&open);
        assert_eq!(info.hole_count(), 1);
        assert_eq!(info.loops[0].edge_count(), 4);
        assert_eq!(info.open_chains, 0);
    }

    #[test]
    fn test_bowtie_vertex_is_non_manifold() {
        // Two triangles sharing only vertex 0
        let mesh = Mesh::from_parts(
            vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [-1.0, 0.0, 0.0],
                [-1.0, -1.0, 0.0],
            ],
            vec![0, 1, 2, 0, 3, 4],
        );
        let info = analyze_boundaries(&mesh);
        assert_eq!(info.non_manifold_vertices, vec![0]);
        assert_eq!(info.boundary_edges.len(), 6);
        // Deterministic across runs
        assert_eq!(info, analyze_boundaries(&mesh));
    }

    #[test]
    fn test_loop_edges_wrap() {
        let lp = BoundaryLoop {
            vertices: vec![4, 5, 6],
        };
        assert_eq!(lp.edges().collect::<Vec<_>>(), vec![(4, 5), (5, 6), (6, 4)]);
        assert!(lp.is_valid());
        assert!(lp.contains(6));
    }
}
