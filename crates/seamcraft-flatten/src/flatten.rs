//! Per-panel flattening: submesh, pins, conformal solve, outline, seams.

use rayon::prelude::*;
use seamcraft_math::Point2;
use seamcraft_mesh::{CancelSignal, Mesh};
use seamcraft_pattern::{FlattenedPanel, Panel, PanelId, PatternEdge, Point2D, Polygon};
use seamcraft_repair::{analyze_boundaries, BoundaryLoop};
use tracing::{debug, info, warn};

use crate::error::{FlattenError, Result};
use crate::lscm::{solve, Pin, SolveError};
use crate::settings::FlattenSettings;
use crate::submesh::extract;

/// Flatten every panel against `mesh`.
///
/// Panels are flattened in parallel; the output keeps the input order. An
/// empty panel list gives an empty result. When several panels fail, the
/// error of the first one in input order is returned.
///
/// # Errors
///
/// Invalid settings, a mesh that breaks its invariant, any per-panel failure
/// (see [`flatten_panel`]) or cancellation.
pub fn flatten_panels(
    panels: &[Panel],
    mesh: &Mesh,
    settings: &FlattenSettings,
    cancel: &dyn CancelSignal,
) -> Result<Vec<FlattenedPanel>> {
    settings.validate()?;
    if panels.is_empty() {
        return Ok(Vec::new());
    }
    mesh.validate()?;

    let results: Vec<Result<FlattenedPanel>> = panels
        .par_iter()
        .map(|panel| flatten_checked(panel, mesh, settings, cancel))
        .collect();
    let flattened = results.into_iter().collect::<Result<Vec<_>>>()?;

    info!("Flattened {} panels", flattened.len());
    Ok(flattened)
}

/// Flatten one panel against `mesh`.
///
/// # Errors
///
/// * [`FlattenError::InvalidPanel`] for an empty or misaligned triangle
///   list, or vertex indices outside the mesh.
/// * [`FlattenError::Degenerate`] for zero-area triangles or an outline
///   with no area.
/// * [`FlattenError::NoBoundary`] for a closed panel.
/// * [`FlattenError::NonFinite`] when the solve produces NaN or infinity.
/// * [`FlattenError::SelfIntersecting`] when the outline crosses itself.
pub fn flatten_panel(
    panel: &Panel,
    mesh: &Mesh,
    settings: &FlattenSettings,
    cancel: &dyn CancelSignal,
) -> Result<FlattenedPanel> {
    settings.validate()?;
    mesh.validate()?;
    flatten_checked(panel, mesh, settings, cancel)
}

fn flatten_checked(
    panel: &Panel,
    mesh: &Mesh,
    settings: &FlattenSettings,
    cancel: &dyn CancelSignal,
) -> Result<FlattenedPanel> {
    if cancel.is_cancelled() {
        return Err(FlattenError::Cancelled);
    }
    let degenerate = |reason: String| FlattenError::Degenerate {
        panel: panel.id,
        reason,
    };

    let sub = extract(panel, mesh)?;
    for t in 0..sub.triangle_count() {
        let area = sub.triangle_area(t);
        if area <= settings.degenerate_area || sub.triangle_normal(t).is_none() {
            return Err(degenerate(format!("triangle {t} has area {area:.3e}")));
        }
    }

    let boundary = analyze_boundaries(&sub);
    if boundary.is_watertight() {
        return Err(FlattenError::NoBoundary { panel: panel.id });
    }
    let outer = outer_loop(&sub, &boundary.loops)
        .ok_or_else(|| degenerate("boundary does not form a closed loop".into()))?;

    let pins = farthest_pair(&sub, outer)
        .ok_or_else(|| degenerate("boundary vertices coincide".into()))?;

    let (uv, stats) = solve(
        &sub,
        &pins,
        settings.max_iterations,
        settings.tolerance,
        cancel,
    )
    .map_err(|e| match e {
        SolveError::Cancelled => FlattenError::Cancelled,
        SolveError::NonFinite(stage) => FlattenError::NonFinite {
            panel: panel.id,
            stage,
        },
    })?;

    let scale = settings.scale_factor;
    let mut order = outer.vertices.clone();
    let mut outline = Polygon::new(order.iter().map(|&v| uv[v as usize] * scale).collect());
    if !outline.signed_area().is_finite() {
        return Err(FlattenError::NonFinite {
            panel: panel.id,
            stage: "outline",
        });
    }
    if outline.area() <= f64::EPSILON {
        return Err(degenerate("flattened outline has no area".into()));
    }
    if !outline.is_ccw() {
        order.reverse();
        outline.reverse();
    }
    if outline.is_self_intersecting() {
        return Err(FlattenError::SelfIntersecting { panel: panel.id });
    }

    let n = order.len();
    let edges: Vec<PatternEdge> = (0..n)
        .map(|i| {
            let j = (i + 1) % n;
            let length = (sub.position(order[j]) - sub.position(order[i])).norm();
            PatternEdge::cut_line(i, j).with_original_length(length * scale)
        })
        .collect();

    let mut piece = FlattenedPanel {
        id: PanelId::new(),
        points: outline.points.into_iter().map(Point2D::from).collect(),
        edges,
        color: panel.color,
        scale_factor: scale,
        source_panel: Some(panel.id),
        seam_outline: Vec::new(),
    };
    if settings.include_seam_allowance && !piece.add_seam_allowance(settings.seam_allowance_mm) {
        warn!("Panel {}: seam allowance outline could not be built", panel.id);
    }

    debug!(
        "Panel {}: {} triangles, {} outline points, {} solver iterations",
        panel.id,
        sub.triangle_count(),
        n,
        stats.iterations
    );

    Ok(piece)
}

/// The boundary loop with the greatest 3D length.
fn outer_loop<'a>(mesh: &Mesh, loops: &'a [BoundaryLoop]) -> Option<&'a BoundaryLoop> {
    loops
        .iter()
        .filter(|l| l.is_valid())
        .map(|l| (l, l.length(mesh)))
        .fold(None, |best: Option<(&BoundaryLoop, f64)>, (l, len)| match best {
            Some((_, best_len)) if best_len >= len => best,
            _ => Some((l, len)),
        })
        .map(|(l, _)| l)
}

/// Pins on the two loop vertices farthest apart, placed on the +X axis.
fn farthest_pair(mesh: &Mesh, lp: &BoundaryLoop) -> Option<[Pin; 2]> {
    let mut best = (0, 0, 0.0);
    for (i, &a) in lp.vertices.iter().enumerate() {
        for &b in &lp.vertices[i + 1..] {
            let d = (mesh.position(b) - mesh.position(a)).norm();
            if d > best.2 {
                best = (a, b, d);
            }
        }
    }
    let (a, b, d) = best;
    (d > f64::EPSILON).then(|| {
        [
            Pin {
                vertex: a,
                position: Point2::origin(),
            },
            Pin {
                vertex: b,
                position: Point2::new(d, 0.0),
            },
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use seamcraft_mesh::primitives::{grid, unit_cube};
    use seamcraft_mesh::{MeshError, NeverCancel};
    use seamcraft_pattern::{Color, EdgeType};
    use std::sync::atomic::AtomicBool;

    fn equilateral() -> Mesh {
        let h = (3f32).sqrt() / 2.0;
        Mesh::from_parts(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.5, h, 0.0]],
            vec![0, 1, 2],
        )
    }

    fn whole(mesh: &Mesh) -> Panel {
        Panel::new(
            mesh.triangles.clone(),
            (0..mesh.triangle_count() as u32).collect(),
            Color::palette(2),
        )
    }

    fn unit_scale() -> FlattenSettings {
        FlattenSettings {
            scale_factor: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_single_equilateral_triangle() {
        let mesh = equilateral();
        let panel = whole(&mesh);
        let flat = flatten_panel(&panel, &mesh, &unit_scale(), &NeverCancel).unwrap();

        assert_eq!(flat.points.len(), 3);
        let cuts: Vec<_> = flat.edges_of_type(EdgeType::CutLine).collect();
        assert_eq!(cuts.len(), 3);
        for e in &cuts {
            assert_relative_eq!(flat.edge_length(e.start, e.end), 1.0, epsilon = 1e-6);
            assert_relative_eq!(e.original_length.unwrap(), 1.0, epsilon = 1e-6);
        }
        assert!(flat.outline().is_ccw());
        assert_eq!(flat.source_panel, Some(panel.id));
        assert_eq!(flat.color, panel.color);
        assert!(flat.validate().is_ok());
    }

    #[test]
    fn test_default_scale_is_millimeters() {
        let mesh = equilateral();
        let flat = flatten_panel(&whole(&mesh), &mesh, &FlattenSettings::default(), &NeverCancel).unwrap();
        for e in flat.edges_of_type(EdgeType::CutLine) {
            assert_relative_eq!(flat.edge_length(e.start, e.end), 1000.0, epsilon = 1e-3);
        }
        assert_relative_eq!(flat.area(), 3f64.sqrt() / 4.0 * 1e6, max_relative = 1e-6);
    }

    #[test]
    fn test_seam_allowance_edges_and_outline() {
        let mesh = grid(2, 0.2);
        let flat = flatten_panel(&whole(&mesh), &mesh, &FlattenSettings::default(), &NeverCancel).unwrap();
        let seams: Vec<_> = flat.edges_of_type(EdgeType::SeamAllowance).collect();
        assert_eq!(seams.len(), flat.points.len());
        assert!(seams.iter().all(|e| e.seam_width_mm == Some(15.0)));
        assert_eq!(flat.seam_outline.len(), flat.points.len());
        // 200 mm square grows by 15 mm on every side, whatever its rotation
        let seam = Polygon::new(flat.seam_outline.iter().map(|&p| p.into()).collect());
        assert_relative_eq!(seam.area(), 230.0 * 230.0, max_relative = 1e-6);
        assert_relative_eq!(flat.area(), 40000.0, max_relative = 1e-6);
    }

    #[test]
    fn test_seam_edges_run_parallel_outside_cut_edges() {
        let mesh = grid(3, 0.3);
        let flat = flatten_panel(&whole(&mesh), &mesh, &FlattenSettings::default(), &NeverCancel).unwrap();
        assert!(flat.validate().is_ok());
        let cuts: Vec<_> = flat.edges_of_type(EdgeType::CutLine).collect();
        let seams: Vec<_> = flat.edges_of_type(EdgeType::SeamAllowance).collect();
        assert_eq!(cuts.len(), seams.len());

        for (cut, seam) in cuts.iter().zip(&seams) {
            assert_eq!((cut.start, cut.end), (seam.start, seam.end));
            let (a, b) = flat.edge_points(cut).unwrap();
            let (sa, sb) = flat.edge_points(seam).unwrap();
            // Outward normal of a CCW outline edge
            let (dx, dy) = (b.x - a.x, b.y - a.y);
            let len = dx.hypot(dy);
            let (nx, ny) = (dy / len, -dx / len);
            for p in [sa, sb] {
                let d = (p.x - a.x) * nx + (p.y - a.y) * ny;
                assert_relative_eq!(d, 15.0, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_multi_triangle_panel_keeps_area_and_boundary() {
        let mesh = grid(4, 0.4);
        // Bottom two rows: 16 triangles forming a 0.4 x 0.2 strip
        let faces: Vec<u32> = (0..16).collect();
        let triangles = faces.iter().flat_map(|&f| mesh.triangle(f as usize)).collect();
        let panel = Panel::new(triangles, faces, Color::default());

        let flat = flatten_panel(&panel, &mesh, &unit_scale(), &NeverCancel).unwrap();
        // 4 + 2 + 4 + 2 boundary edges
        assert_eq!(flat.points.len(), 12);
        assert_relative_eq!(flat.area(), 0.08, max_relative = 1e-6);
        assert_relative_eq!(flat.outline().perimeter(), 1.2, epsilon = 1e-6);
        let original: f64 = flat
            .edges_of_type(EdgeType::CutLine)
            .map(|e| e.original_length.unwrap())
            .sum();
        assert_relative_eq!(original, 1.2, epsilon = 1e-6);
    }

    #[test]
    fn test_disconnected_panel_is_rejected() {
        // A 1 x 1 square and a separate 2 x 2 square in one panel
        let mesh = Mesh::from_parts(
            vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
                [5.0, 0.0, 0.0],
                [7.0, 0.0, 0.0],
                [7.0, 2.0, 0.0],
                [5.0, 2.0, 0.0],
            ],
            vec![0, 1, 2, 0, 2, 3, 4, 5, 6, 4, 6, 7],
        );
        let panel = whole(&mesh);
        match flatten_panel(&panel, &mesh, &unit_scale(), &NeverCancel) {
            Err(FlattenError::InvalidPanel { panel: id, reason }) => {
                assert_eq!(id, panel.id);
                assert!(reason.contains("disconnected"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_without_seam_allowance() {
        let mesh = grid(2, 0.2);
        let settings = FlattenSettings {
            include_seam_allowance: false,
            ..Default::default()
        };
        let flat = flatten_panel(&whole(&mesh), &mesh, &settings, &NeverCancel).unwrap();
        assert_eq!(flat.edges_of_type(EdgeType::SeamAllowance).count(), 0);
        assert!(flat.seam_outline.is_empty());
    }

    #[test]
    fn test_outline_is_outer_boundary() {
        let mesh = grid(3, 0.3);
        let flat = flatten_panel(&whole(&mesh), &mesh, &unit_scale(), &NeverCancel).unwrap();
        assert_eq!(flat.points.len(), 12);
        assert_relative_eq!(flat.outline().perimeter(), 1.2, epsilon = 1e-6);
    }

    #[test]
    fn test_closed_panel_has_no_boundary() {
        let mesh = unit_cube();
        let panel = whole(&mesh);
        assert_eq!(
            flatten_panel(&panel, &mesh, &unit_scale(), &NeverCancel),
            Err(FlattenError::NoBoundary { panel: panel.id })
        );
    }

    #[test]
    fn test_zero_area_triangle_is_degenerate() {
        let mesh = Mesh::from_parts(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]],
            vec![0, 1, 2],
        );
        assert!(matches!(
            flatten_panel(&whole(&mesh), &mesh, &unit_scale(), &NeverCancel),
            Err(FlattenError::Degenerate { .. })
        ));
    }

    #[test]
    fn test_out_of_range_panel() {
        let mesh = equilateral();
        let panel = Panel::new(vec![0, 1, 5], vec![0], Color::default());
        assert!(matches!(
            flatten_panels(&[panel], &mesh, &unit_scale(), &NeverCancel),
            Err(FlattenError::InvalidPanel { .. })
        ));
    }

    #[test]
    fn test_invalid_mesh_is_mesh_error() {
        let mesh = Mesh::from_parts(vec![[0.0; 3]; 3], vec![0, 1, 9]);
        let panel = Panel::new(vec![0, 1, 2], vec![0], Color::default());
        assert!(matches!(
            flatten_panels(&[panel], &mesh, &unit_scale(), &NeverCancel),
            Err(FlattenError::Mesh(MeshError::IndexOutOfRange { .. }))
        ));
    }

    #[test]
    fn test_empty_panel_list() {
        let out = flatten_panels(&[], &Mesh::new(), &unit_scale(), &NeverCancel).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_many_panels_keep_order() {
        let mesh = grid(4, 0.4);
        let panels: Vec<Panel> = (0..4)
            .map(|q| {
                let start = q * 12;
                Panel::new(
                    mesh.triangles[start..start + 12].to_vec(),
                    Vec::new(),
                    Color::palette(q),
                )
            })
            .collect();
        let flat = flatten_panels(&panels, &mesh, &unit_scale(), &NeverCancel).unwrap();
        assert_eq!(flat.len(), 4);
        for (f, p) in flat.iter().zip(&panels) {
            assert_eq!(f.source_panel, Some(p.id));
        }
    }

    #[test]
    fn test_first_error_in_order() {
        let mesh = equilateral();
        let bad_a = Panel::new(vec![0, 1], Vec::new(), Color::default());
        let bad_b = Panel::new(Vec::new(), Vec::new(), Color::default());
        match flatten_panels(&[whole(&mesh), bad_a.clone(), bad_b], &mesh, &unit_scale(), &NeverCancel) {
            Err(FlattenError::InvalidPanel { panel, .. }) => assert_eq!(panel, bad_a.id),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_cancelled() {
        let mesh = grid(3, 1.0);
        let flag = AtomicBool::new(true);
        assert_eq!(
            flatten_panels(&[whole(&mesh)], &mesh, &unit_scale(), &flag),
            Err(FlattenError::Cancelled)
        );
    }
}
