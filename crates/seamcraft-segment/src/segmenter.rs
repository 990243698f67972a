//! The segmentation entry points.

use seamcraft_mesh::{CancelSignal, Mesh, MeshError, NeverCancel};
use seamcraft_pattern::{Color, Panel};
use tracing::{debug, info};

use crate::error::Result;
use crate::kmeans::{cluster, TriangleFeatures};
use crate::regions::contiguous_regions;
use crate::settings::{PreviewResolution, SegmentationSettings};

/// A strategy that partitions a mesh's triangles into panels.
///
/// Every triangle of the mesh belongs to exactly one returned panel, and
/// every panel is one edge-connected piece. The panel count is a target:
/// very small meshes give fewer panels, and clusters that fall apart into
/// separate pieces give more.
pub trait Segmenter: Send + Sync {
    /// Segment `mesh` into about `target_panels` panels.
    fn segment(
        &self,
        mesh: &Mesh,
        target_panels: usize,
        cancel: &dyn CancelSignal,
    ) -> Result<Vec<Panel>>;

    /// Cheaper segmentation for interactive preview.
    fn preview(
        &self,
        mesh: &Mesh,
        resolution: PreviewResolution,
        cancel: &dyn CancelSignal,
    ) -> Result<Vec<Panel>>;
}

/// Clustering-based segmenter over triangle positions and normals.
#[derive(Debug, Clone, Default)]
pub struct PanelSegmenter {
    /// Clustering parameters.
    pub settings: SegmentationSettings,
}

impl PanelSegmenter {
    /// Segmenter with the given settings.
    pub fn new(settings: SegmentationSettings) -> Self {
        Self { settings }
    }

    fn run(
        &self,
        mesh: &Mesh,
        target_panels: usize,
        max_iterations: usize,
        cancel: &dyn CancelSignal,
    ) -> Result<Vec<Panel>> {
        self.settings.validate()?;
        self.settings.check_panel_count(target_panels)?;
        mesh.validate()?;
        if mesh.is_empty() {
            return Err(MeshError::Empty.into());
        }

        let features = TriangleFeatures::from_mesh(mesh);
        let clustering = cluster(
            &features,
            target_panels,
            max_iterations,
            &self.settings,
            cancel,
        )?;

        let regions = contiguous_regions(mesh, &clustering.assignments, target_panels);
        let clusters_used = {
            let mut used = vec![false; target_panels];
            clustering.assignments.iter().for_each(|&c| used[c] = true);
            used.into_iter().filter(|&u| u).count()
        };
        if regions.len() > clusters_used {
            debug!(
                "{} clusters fell apart into {} connected regions",
                clusters_used,
                regions.len()
            );
        }

        let panels: Vec<Panel> = regions
            .into_iter()
            .enumerate()
            .map(|(i, faces)| {
                let triangles = faces
                    .iter()
                    .flat_map(|&f| mesh.triangle(f as usize))
                    .collect();
                Panel::new(triangles, faces, Color::palette(i))
            })
            .collect();

        info!(
            "Segmented {} triangles into {} panels (target {}, {} iterations{})",
            mesh.triangle_count(),
            panels.len(),
            target_panels,
            clustering.iterations,
            if clustering.converged { "" } else { ", not converged" }
        );
        Ok(panels)
    }
}

impl Segmenter for PanelSegmenter {
    fn segment(
        &self,
        mesh: &Mesh,
        target_panels: usize,
        cancel: &dyn CancelSignal,
    ) -> Result<Vec<Panel>> {
        self.run(mesh, target_panels, self.settings.max_iterations, cancel)
    }

    fn preview(
        &self,
        mesh: &Mesh,
        resolution: PreviewResolution,
        cancel: &dyn CancelSignal,
    ) -> Result<Vec<Panel>> {
        self.run(
            mesh,
            resolution.panel_count(),
            self.settings.preview_max_iterations,
            cancel,
        )
    }
}

/// Segment with default settings and no cancellation.
pub fn segment_mesh(mesh: &Mesh, target_panels: usize) -> Result<Vec<Panel>> {
    PanelSegmenter::default().segment(mesh, target_panels, &NeverCancel)
}

/// Preview segmentation with default settings and no cancellation.
pub fn preview_segmentation(mesh: &Mesh, resolution: PreviewResolution) -> Result<Vec<Panel>> {
    PanelSegmenter::default().preview(mesh, resolution, &NeverCancel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SegmentError;
    use seamcraft_mesh::primitives::{grid, staircase, unit_cube};
    use seamcraft_repair::connected_components;
    use std::collections::BTreeSet;
    use std::sync::atomic::AtomicBool;

    fn assert_contiguous(mesh: &Mesh, panels: &[Panel]) {
        for panel in panels {
            let piece = Mesh::from_parts(mesh.vertices.clone(), panel.triangles.clone());
            assert_eq!(
                connected_components(&piece).len(),
                1,
                "panel with faces {:?} is not one piece",
                panel.faces
            );
        }
    }

    fn assert_partition(mesh: &Mesh, panels: &[Panel]) {
        let mut seen = vec![0usize; mesh.triangle_count()];
        for panel in panels {
            assert!(!panel.faces.is_empty());
            assert_eq!(panel.triangle_count(), panel.faces.len());
            for (i, &f) in panel.faces.iter().enumerate() {
                seen[f as usize] += 1;
                assert_eq!(panel.triangles_iter().nth(i), Some(mesh.triangle(f as usize)));
            }
            let verts: BTreeSet<u32> = panel.triangles.iter().copied().collect();
            assert_eq!(verts, panel.vertex_indices);
        }
        assert!(seen.iter().all(|&c| c == 1), "not a partition: {seen:?}");
        assert_contiguous(mesh, panels);
    }

    #[test]
    fn test_cube_six_panels_partition() {
        let mesh = unit_cube();
        let panels = segment_mesh(&mesh, 6).unwrap();
        assert!(!panels.is_empty());
        assert_partition(&mesh, &panels);
    }

    #[test]
    fn test_separated_treads_become_separate_panels() {
        let mesh = staircase(4);
        let panels = segment_mesh(&mesh, 3).unwrap();
        assert!(!panels.is_empty());
        // Treads share a normal but touch only through risers, so any panel
        // holding two of them must also hold the risers between
        assert_partition(&mesh, &panels);
        for (i, panel) in panels.iter().enumerate() {
            assert_eq!(panel.color, Color::palette(i));
        }
    }

    #[test]
    fn test_grid_partition_and_colors() {
        let mesh = grid(10, 1.0);
        let panels = segment_mesh(&mesh, 4).unwrap();
        assert_partition(&mesh, &panels);
        for (i, panel) in panels.iter().enumerate() {
            assert_eq!(panel.color, Color::palette(i));
        }
    }

    #[test]
    fn test_repeatable_partition() {
        let mesh = grid(6, 2.0);
        let a: Vec<Vec<u32>> = segment_mesh(&mesh, 5).unwrap().into_iter().map(|p| p.faces).collect();
        let b: Vec<Vec<u32>> = segment_mesh(&mesh, 5).unwrap().into_iter().map(|p| p.faces).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_small_mesh_yields_fewer_panels() {
        let mesh = Mesh::from_parts(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
            vec![0, 1, 2, 0, 2, 3],
        );
        let panels = segment_mesh(&mesh, 5).unwrap();
        assert_eq!(panels.len(), 2);
        assert_partition(&mesh, &panels);
    }

    #[test]
    fn test_rejects_bad_panel_count() {
        let mesh = unit_cube();
        assert!(matches!(
            segment_mesh(&mesh, 2),
            Err(SegmentError::InvalidPanelCount { requested: 2, .. })
        ));
        assert!(matches!(
            segment_mesh(&mesh, 21),
            Err(SegmentError::InvalidPanelCount { requested: 21, .. })
        ));
    }

    #[test]
    fn test_rejects_invalid_mesh() {
        let mesh = Mesh::from_parts(vec![[0.0; 3]; 3], vec![0, 1, 3]);
        assert!(matches!(
            segment_mesh(&mesh, 4),
            Err(SegmentError::Mesh(MeshError::IndexOutOfRange { .. }))
        ));
        assert_eq!(
            segment_mesh(&Mesh::new(), 4),
            Err(SegmentError::Mesh(MeshError::Empty))
        );
    }

    #[test]
    fn test_preview_uses_resolution() {
        let mesh = grid(12, 1.0);
        let panels = preview_segmentation(&mesh, PreviewResolution::Coarse).unwrap();
        assert_partition(&mesh, &panels);
        let fine = preview_segmentation(&mesh, PreviewResolution::Fine).unwrap();
        assert_partition(&mesh, &fine);
    }

    #[test]
    fn test_cancelled_segmentation_returns_no_panels() {
        let flag = AtomicBool::new(true);
        let result = PanelSegmenter::default().segment(&unit_cube(), 6, &flag);
        assert_eq!(result, Err(SegmentError::Cancelled));
    }

    #[test]
    fn test_segmenter_is_object_safe() {
        let segmenter: Box<dyn Segmenter> = Box::new(PanelSegmenter::default());
        let panels = segmenter.segment(&unit_cube(), 3, &NeverCancel).unwrap();
        assert_partition(&unit_cube(), &panels);
    }
}
