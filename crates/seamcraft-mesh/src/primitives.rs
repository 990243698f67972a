//! Small reference meshes used by tests across the workspace.

use crate::mesh::Mesh;

/// Closed unit cube `[0,1]^3` with outward-facing triangles.
pub fn unit_cube() -> Mesh {
    let vertices = vec![
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
        [1.0, 0.0, 1.0],
        [1.0, 1.0, 1.0],
        [0.0, 1.0, 1.0],
    ];
    let triangles = vec![
        0, 2, 1, 0, 3, 2, // -Z
        4, 5, 6, 4, 6, 7, // +Z
        0, 1, 5, 0, 5, 4, // -Y
        2, 3, 7, 2, 7, 6, // +Y
        0, 4, 7, 0, 7, 3, // -X
        1, 2, 6, 1, 6, 5, // +X
    ];
    Mesh::from_parts(vertices, triangles)
}

/// Flat `size` x `size` square in the XY plane split into `n` x `n` quads.
///
/// Vertex `(i, j)` has index `j * (n + 1) + i`; every quad contributes two
/// counter-clockwise triangles seen from +Z.
pub fn grid(n: u32, size: f32) -> Mesh {
    let n = n.max(1);
    let step = size / n as f32;
    let mut vertices = Vec::with_capacity(((n + 1) * (n + 1)) as usize);
    for j in 0..=n {
        for i in 0..=n {
            vertices.push([i as f32 * step, j as f32 * step, 0.0]);
        }
    }
    let mut triangles = Vec::with_capacity((n * n * 6) as usize);
    for j in 0..n {
        for i in 0..n {
            let v00 = j * (n + 1) + i;
            let v10 = v00 + 1;
            let v01 = v00 + n + 1;
            let v11 = v01 + 1;
            triangles.extend_from_slice(&[v00, v10, v11, v00, v11, v01]);
        }
    }
    Mesh::from_parts(vertices, triangles)
}

/// Staircase of `steps` unit treads and risers, one unit wide along Y.
///
/// The profile runs in the XZ plane and each of its `2 * steps` segments is
/// one quad (two triangles), tread first. Segment `k` owns triangles
/// `2k` and `2k + 1`, so treads are the even segments. All treads face the
/// same way but touch each other only through a riser.
pub fn staircase(steps: u32) -> Mesh {
    let steps = steps.max(1);
    let mut profile = vec![[0.0f32, 0.0]];
    for s in 0..steps {
        let (x, z) = (s as f32, s as f32);
        profile.push([x + 1.0, z]);
        profile.push([x + 1.0, z + 1.0]);
    }
    let vertices = profile
        .iter()
        .flat_map(|&[x, z]| [[x, 0.0, z], [x, 1.0, z]])
        .collect();
    let mut triangles = Vec::with_capacity(steps as usize * 12);
    for k in 0..2 * steps {
        let (a, b) = (2 * k, 2 * k + 2);
        triangles.extend_from_slice(&[a, b, b + 1, a, b + 1, a + 1]);
    }
    Mesh::from_parts(vertices, triangles)
}
