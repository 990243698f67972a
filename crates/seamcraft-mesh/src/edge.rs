//! Canonical undirected mesh edges.

use serde::{Deserialize, Serialize};

/// An unordered pair of vertex indices stored as `(min, max)`.
///
/// Two triangles that share an edge produce equal `Edge` values no matter
/// which direction each one traverses it, so `Edge` can key maps and sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge {
    a: u32,
    b: u32,
}

impl Edge {
    /// Canonical edge between two vertices.
    pub fn new(v0: u32, v1: u32) -> Self {
        if v0 <= v1 {
            Self { a: v0, b: v1 }
        } else {
            Self { a: v1, b: v0 }
        }
    }

    /// Smaller vertex index.
    pub fn a(&self) -> u32 {
        self.a
    }

    /// Larger vertex index.
    pub fn b(&self) -> u32 {
        self.b
    }

    /// Does this edge touch vertex `v`?
    pub fn contains(&self, v: u32) -> bool {
        self.a == v || self.b == v
    }

    /// The endpoint opposite `v`, if `v` is an endpoint.
    pub fn other(&self, v: u32) -> Option<u32> {
        if self.a == v {
            Some(self.b)
        } else if self.b == v {
            Some(self.a)
        } else {
            None
        }
    }

    /// The three canonical edges of a triangle.
    pub fn of_triangle(tri: [u32; 3]) -> [Edge; 3] {
        [
            Edge::new(tri[0], tri[1]),
            Edge::new(tri[1], tri[2]),
            Edge::new(tri[2], tri[0]),
        ]
    }
}
