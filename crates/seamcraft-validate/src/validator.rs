//! The validator and its entry points.

use rayon::prelude::*;
use seamcraft_math::Aabb2;
use seamcraft_pattern::{FlattenedPanel, Point2D, Polygon};
use tracing::{debug, info};

use crate::checks::{self, Findings};
use crate::fabric;
use crate::issues::{IssueKind, Severity, ValidationIssue, ValidationWarning, WarningKind};
use crate::result::{
    FabricCompatibility, FabricUtilizationResult, PatternSetValidationResult,
    PatternValidationResult,
};
use crate::settings::ValidationSettings;

/// Checks flattened pieces for sewability.
///
/// Every method is a pure function of its arguments; one validator can be
/// shared across threads.
#[derive(Debug, Clone, Default)]
pub struct PatternValidator {
    /// Thresholds.
    pub settings: ValidationSettings,
}

impl PatternValidator {
    /// Validator with the given thresholds.
    pub fn new(settings: ValidationSettings) -> Self {
        Self { settings }
    }

    /// Validate one piece.
    pub fn validate_panel(&self, panel: &FlattenedPanel) -> PatternValidationResult {
        let mut findings = Findings::new(panel.id);
        let mut area_mm2 = 0.0;
        let mut perimeter_mm = 0.0;
        let mut max_distortion = None;

        if checks::check_structure(panel, &mut findings) {
            let boundary = checks::valid_boundary(panel);
            area_mm2 = checks::check_geometry(panel, &self.settings, &mut findings);
            perimeter_mm = boundary
                .iter()
                .map(|&(a, b)| panel.edge_length(a, b))
                .sum::<f64>()
                * panel.mm_per_unit();
            // Duplicates make neighbouring edges look like crossings
            if !findings.has_kind(IssueKind::DuplicatePoints) {
                checks::check_self_intersection(panel, &boundary, &mut findings);
            }
            checks::check_seams(panel, &self.settings, &mut findings);
            max_distortion = checks::check_edges(panel, &boundary, &self.settings, &mut findings);
        }

        let is_valid = !findings.issues.iter().any(ValidationIssue::is_blocking);
        debug!(
            "Piece {}: {} issues, {} warnings, valid={}",
            panel.id,
            findings.issues.len(),
            findings.warnings.len(),
            is_valid
        );
        PatternValidationResult {
            panel: panel.id,
            is_valid,
            issues: findings.issues,
            warnings: findings.warnings,
            area_mm2,
            perimeter_mm,
            max_distortion,
        }
    }

    /// Validate every piece, then the layout as a whole.
    ///
    /// An empty set is valid with zero area.
    pub fn validate_panel_set(&self, panels: &[FlattenedPanel]) -> PatternSetValidationResult {
        let panel_results: Vec<_> = panels.par_iter().map(|p| self.validate_panel(p)).collect();

        let issues = overlap_issues(panels);
        let sizes: Vec<_> = panels.iter().filter_map(fabric::piece_size).collect();
        let total_area_mm2 = sizes.iter().map(|s| s.area_mm2).sum();
        let compatibility = fabric::compatibility(&sizes, &self.settings);

        let mut warnings = Vec::new();
        if compatibility.requires_custom_width {
            warnings.push(ValidationWarning::new(
                WarningKind::CustomFabricWidth,
                format!(
                    "Widest piece is {:.0} mm, wider than every standard fabric",
                    compatibility.max_panel_width_mm
                ),
            ));
        }

        let (recommended_fabric_width_mm, utilization) = if sizes.is_empty() {
            (None, None)
        } else {
            let width = fabric::recommended_width(&compatibility);
            let utilization = fabric::utilization(&sizes, width, &self.settings);
            warnings.extend(utilization.warnings.iter().cloned());
            (Some(width), Some(utilization))
        };

        let is_valid = panel_results.iter().all(|r| r.is_valid)
            && !issues.iter().any(ValidationIssue::is_blocking);
        info!(
            "Validated {} pieces: valid={}, {} overlaps, {:.0} mm² total",
            panels.len(),
            is_valid,
            issues.len(),
            total_area_mm2
        );

        PatternSetValidationResult {
            is_valid,
            panel_results,
            issues,
            warnings,
            total_area_mm2,
            recommended_fabric_width_mm,
            compatibility,
            utilization,
        }
    }

    /// Fabric consumed when every piece is stacked along a roll of the
    /// given width.
    pub fn validate_fabric_utilization(
        &self,
        panels: &[FlattenedPanel],
        fabric_width_mm: f64,
    ) -> FabricUtilizationResult {
        let sizes: Vec<_> = panels.iter().filter_map(fabric::piece_size).collect();
        fabric::utilization(&sizes, fabric_width_mm, &self.settings)
    }

    /// Standard fabric widths that fit the widest piece.
    pub fn check_fabric_compatibility(&self, panels: &[FlattenedPanel]) -> FabricCompatibility {
        let sizes: Vec<_> = panels.iter().filter_map(fabric::piece_size).collect();
        fabric::compatibility(&sizes, &self.settings)
    }
}

/// Pairs of pieces whose outlines share area.
fn overlap_issues(panels: &[FlattenedPanel]) -> Vec<ValidationIssue> {
    let shapes: Vec<Option<(Aabb2, Polygon)>> = panels
        .iter()
        .map(|p| {
            if p.points.len() < 3 || p.points.iter().any(|q| !q.is_finite()) {
                return None;
            }
            let outline = p.outline();
            outline.bounds().map(|b| (b, outline))
        })
        .collect();

    (0..panels.len())
        .into_par_iter()
        .flat_map_iter(|i| {
            let shapes = &shapes;
            (i + 1..panels.len()).filter_map(move |j| {
                let (Some((ba, pa)), Some((bb, pb))) = (&shapes[i], &shapes[j]) else {
                    return None;
                };
                if !ba.intersects(bb) || !pa.overlaps(pb) {
                    return None;
                }
                let lo = ba.min.sup(&bb.min);
                let hi = ba.max.inf(&bb.max);
                let center = Point2D::new((lo.x + hi.x) * 0.5, (lo.y + hi.y) * 0.5);
                let shared = ba.overlap_area(bb) / ba.area().min(bb.area()).max(f64::MIN_POSITIVE);
                Some(
                    ValidationIssue::new(
                        Severity::Major,
                        IssueKind::PanelOverlap,
                        format!(
                            "Piece {} overlaps piece {} ({:.0}% of the smaller bounds)",
                            panels[i].id,
                            panels[j].id,
                            shared * 100.0
                        ),
                    )
                    .with_panel(panels[i].id)
                    .with_location(center),
                )
            })
        })
        .collect()
}

/// Validate one piece with default settings.
pub fn validate_panel(panel: &FlattenedPanel) -> PatternValidationResult {
    PatternValidator::default().validate_panel(panel)
}

/// Validate a set of pieces with default settings.
pub fn validate_panel_set(panels: &[FlattenedPanel]) -> PatternSetValidationResult {
    PatternValidator::default().validate_panel_set(panels)
}

/// Fabric utilization with default settings.
pub fn validate_fabric_utilization(
    panels: &[FlattenedPanel],
    fabric_width_mm: f64,
) -> FabricUtilizationResult {
    PatternValidator::default().validate_fabric_utilization(panels, fabric_width_mm)
}

/// Fabric compatibility with default settings.
pub fn check_fabric_compatibility(panels: &[FlattenedPanel]) -> FabricCompatibility {
    PatternValidator::default().check_fabric_compatibility(panels)
}
