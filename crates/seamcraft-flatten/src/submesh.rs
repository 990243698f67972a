//! Local triangle/vertex submesh of one panel.

use std::collections::BTreeSet;

use seamcraft_mesh::Mesh;
use seamcraft_pattern::Panel;
use seamcraft_repair::connected_components;

use crate::error::{FlattenError, Result};

/// Compact copy of the panel's triangles with locally numbered vertices.
///
/// The panel must be one edge-connected piece. A conformal solve pinned on
/// one piece leaves the others unconstrained, so a split panel is rejected.
pub(crate) fn extract(panel: &Panel, mesh: &Mesh) -> Result<Mesh> {
    let invalid = |reason: String| FlattenError::InvalidPanel {
        panel: panel.id,
        reason,
    };

    if panel.triangles.is_empty() {
        return Err(invalid("triangle list is empty".into()));
    }
    if panel.triangles.len() % 3 != 0 {
        return Err(invalid(format!(
            "triangle list has length {}, not a multiple of 3",
            panel.triangles.len()
        )));
    }
    let vertex_count = mesh.vertex_count();
    if let Some(&index) = panel
        .triangles
        .iter()
        .chain(panel.vertex_indices.iter())
        .find(|&&i| i as usize >= vertex_count)
    {
        return Err(invalid(format!(
            "vertex index {index} is out of range for a mesh with {vertex_count} vertices"
        )));
    }

    let used: BTreeSet<u32> = panel.triangles.iter().copied().collect();
    let mut local = vec![u32::MAX; vertex_count];
    let mut vertices = Vec::with_capacity(used.len());
    for &v in &used {
        local[v as usize] = vertices.len() as u32;
        vertices.push(mesh.vertices[v as usize]);
    }
    let triangles = panel.triangles.iter().map(|&v| local[v as usize]).collect();
    let sub = Mesh::from_parts(vertices, triangles);

    let components = connected_components(&sub);
    if components.len() > 1 {
        return Err(invalid(format!(
            "{} triangles form {} disconnected pieces",
            sub.triangle_count(),
            components.len()
        )));
    }
    Ok(sub)
}
