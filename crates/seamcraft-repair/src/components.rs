//! Connected components over shared manifold edges.

use std::collections::{BTreeSet, HashMap};

use seamcraft_mesh::{Edge, Mesh};
use tracing::{debug, info};

use crate::rebuild::rebuild_from_triangle_subset;

/// Disjoint-set forest over triangle indices.
struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    /// Root of `x`, halving the path on the way up.
    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, x: usize, y: usize) {
        let (rx, ry) = (self.find(x), self.find(y));
        if rx == ry {
            return;
        }
        match self.rank[rx].cmp(&self.rank[ry]) {
            std::cmp::Ordering::Less => self.parent[rx] = ry,
            std::cmp::Ordering::Greater => self.parent[ry] = rx,
            std::cmp::Ordering::Equal => {
                self.parent[ry] = rx;
                self.rank[rx] += 1;
            }
        }
    }
}

/// Group triangles into connected components.
///
/// Two triangles are connected when they share an edge used by exactly two
/// triangles, so components never join across a non-manifold edge or a
/// single shared vertex. Components are ordered by size (largest first),
/// ties broken by their lowest triangle index; each lists its triangles in
/// ascending order.
///
/// The mesh must satisfy its validity invariant.
pub fn connected_components(mesh: &Mesh) -> Vec<Vec<usize>> {
    let triangle_count = mesh.triangle_count();
    let mut edge_faces: HashMap<Edge, Vec<usize>> = HashMap::with_capacity(triangle_count * 2);
    for (t, tri) in mesh.triangles_iter().enumerate() {
        for edge in Edge::of_triangle(tri) {
            edge_faces.entry(edge).or_default().push(t);
        }
    }

    let mut sets = UnionFind::new(triangle_count);
    for faces in edge_faces.values() {
        if let [a, b] = faces.as_slice() {
            sets.union(*a, *b);
        }
    }

    let mut by_root: HashMap<usize, Vec<usize>> = HashMap::new();
    for t in 0..triangle_count {
        let root = sets.find(t);
        by_root.entry(root).or_default().push(t);
    }

    let mut components: Vec<Vec<usize>> = by_root.into_values().collect();
    components.sort_by(|a, b| b.len().cmp(&a.len()).then(a[0].cmp(&b[0])));
    components
}

/// Keep the largest component plus every component with at least
/// `min_triangles` triangles.
///
/// Returns the rebuilt mesh and the number of components dropped.
///
/// The mesh must satisfy its validity invariant.
pub fn isolate_largest_component(mesh: &Mesh, min_triangles: usize) -> (Mesh, usize) {
    if mesh.is_empty() {
        return (mesh.clone(), 0);
    }

    let components = connected_components(mesh);
    debug!(
        "Found {} components, sizes: {:?}",
        components.len(),
        components.iter().map(Vec::len).collect::<Vec<_>>()
    );

    let (kept, dropped): (Vec<_>, Vec<_>) = components
        .into_iter()
        .enumerate()
        .partition(|(rank, c)| *rank == 0 || c.len() >= min_triangles);

    if dropped.is_empty() {
        return (mesh.clone(), 0);
    }

    let keep: BTreeSet<usize> = kept.into_iter().flat_map(|(_, c)| c).collect();
    info!(
        "Removed {} small components ({} triangles)",
        dropped.len(),
        dropped.iter().map(|(_, c)| c.len()).sum::<usize>()
    );
    (rebuild_from_triangle_subset(mesh, &keep), dropped.len())
}
