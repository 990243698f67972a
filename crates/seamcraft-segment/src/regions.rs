//! Splitting clusters into edge-connected regions.

use std::collections::{HashMap, VecDeque};

use seamcraft_mesh::{Edge, Mesh};

/// Split every cluster into its edge-connected regions.
///
/// Two triangles of the same cluster are connected when they share an edge
/// that no third triangle of that cluster uses, the same rule the flattener
/// applies to a single panel. Regions come out in cluster order, then by
/// lowest triangle index, each listing its triangles in ascending order.
/// Empty clusters yield nothing.
pub(crate) fn contiguous_regions(
    mesh: &Mesh,
    assignments: &[usize],
    clusters: usize,
) -> Vec<Vec<u32>> {
    let n = assignments.len();
    let mut edge_faces: HashMap<Edge, Vec<usize>> = HashMap::with_capacity(n * 2);
    for (t, tri) in mesh.triangles_iter().enumerate().take(n) {
        for edge in Edge::of_triangle(tri) {
            edge_faces.entry(edge).or_default().push(t);
        }
    }

    let mut neighbours: Vec<Vec<usize>> = vec![Vec::new(); n];
    for faces in edge_faces.values() {
        for &a in faces {
            let mut same = faces
                .iter()
                .copied()
                .filter(|&b| assignments[b] == assignments[a]);
            if let (Some(x), Some(y), None) = (same.next(), same.next(), same.next()) {
                if x == a && x != y {
                    neighbours[x].push(y);
                    neighbours[y].push(x);
                }
            }
        }
    }

    let mut by_cluster: Vec<Vec<Vec<u32>>> = vec![Vec::new(); clusters];
    let mut visited = vec![false; n];
    let mut queue = VecDeque::new();
    for start in 0..n {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        queue.push_back(start);
        let mut region = Vec::new();
        while let Some(t) = queue.pop_front() {
            region.push(t as u32);
            for &u in &neighbours[t] {
                if !visited[u] {
                    visited[u] = true;
                    queue.push_back(u);
                }
            }
        }
        region.sort_unstable();
        by_cluster[assignments[start]].push(region);
    }

    by_cluster.into_iter().flatten().collect()
}
