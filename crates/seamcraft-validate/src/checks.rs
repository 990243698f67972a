//! Per-piece checks.
//!
//! Each check appends to a [`Findings`] collector. Lengths are compared in
//! millimeters using the piece's own scale factor.

use std::collections::HashMap;

use seamcraft_math::Point2;
use seamcraft_pattern::{segment_intersection, EdgeType, FlattenedPanel, PanelId, Point2D};

use crate::issues::{IssueKind, Severity, ValidationIssue, ValidationWarning, WarningKind};
use crate::settings::ValidationSettings;

pub(crate) struct Findings {
    panel: PanelId,
    pub(crate) issues: Vec<ValidationIssue>,
    pub(crate) warnings: Vec<ValidationWarning>,
}

impl Findings {
    pub(crate) fn new(panel: PanelId) -> Self {
        Self {
            panel,
            issues: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn issue(
        &mut self,
        severity: Severity,
        kind: IssueKind,
        message: String,
        location: Option<Point2D>,
    ) {
        let mut issue = ValidationIssue::new(severity, kind, message).with_panel(self.panel);
        issue.location = location;
        self.issues.push(issue);
    }

    fn warning(&mut self, kind: WarningKind, message: String) {
        self.warnings
            .push(ValidationWarning::new(kind, message).with_panel(self.panel));
    }

    pub(crate) fn has_kind(&self, kind: IssueKind) -> bool {
        self.issues.iter().any(|i| i.kind == kind)
    }
}

/// Point count, scale, finiteness and edge indices.
///
/// Returns false when the piece cannot be measured at all.
pub(crate) fn check_structure(panel: &FlattenedPanel, f: &mut Findings) -> bool {
    let n = panel.points.len();
    if n < 3 {
        f.issue(
            Severity::Critical,
            IssueKind::InsufficientPoints,
            format!("Piece has {n} points, at least 3 are needed"),
            None,
        );
        return false;
    }
    if !(panel.scale_factor.is_finite() && panel.scale_factor > 0.0) {
        f.issue(
            Severity::Critical,
            IssueKind::InvalidScale,
            format!("Scale factor {} is not a positive number", panel.scale_factor),
            None,
        );
        return false;
    }

    let mut measurable = true;
    for (i, p) in panel.points.iter().enumerate() {
        if !p.is_finite() {
            f.issue(
                Severity::Critical,
                IssueKind::NonFinitePoint,
                format!("Point {i} is not finite"),
                None,
            );
            measurable = false;
        }
    }
    for (e, edge) in panel.edges.iter().enumerate() {
        let count = panel.points_of(edge.edge_type).len();
        if let Some(index) = [edge.start, edge.end].into_iter().find(|&i| i >= count) {
            f.issue(
                Severity::Critical,
                IssueKind::InvalidEdge,
                format!("Edge {e} references point {index} of {count}"),
                None,
            );
        }
    }
    measurable
}

/// Boundary edges whose endpoints exist.
pub(crate) fn valid_boundary(panel: &FlattenedPanel) -> Vec<(usize, usize)> {
    let n = panel.points.len();
    panel
        .boundary()
        .into_iter()
        .filter(|&(a, b)| a < n && b < n)
        .collect()
}

/// Duplicates, collinearity, area and aspect ratio. Returns the area in mm².
pub(crate) fn check_geometry(
    panel: &FlattenedPanel,
    settings: &ValidationSettings,
    f: &mut Findings,
) -> f64 {
    let mm = panel.mm_per_unit();

    // Adding 0.0 folds -0.0 into 0.0 so both hash alike
    let mut seen: HashMap<(u64, u64), usize> = HashMap::new();
    let mut duplicates = 0;
    let mut first_pair = None;
    for (i, p) in panel.points.iter().enumerate() {
        let key = ((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits());
        match seen.get(&key) {
            Some(&earlier) => {
                duplicates += 1;
                first_pair.get_or_insert((earlier, i));
            }
            None => {
                seen.insert(key, i);
            }
        }
    }
    if let Some((a, b)) = first_pair {
        f.issue(
            Severity::Critical,
            IssueKind::DuplicatePoints,
            format!("{duplicates} duplicate point(s), first at points {a} and {b}"),
            Some(panel.points[b]),
        );
    }

    let outline = panel.outline();
    let area_mm2 = outline.area() * mm * mm;
    if outline.is_collinear(settings.collinear_epsilon) {
        f.issue(
            Severity::Critical,
            IssueKind::CollinearPoints,
            format!(
                "All {} points lie on one line, the piece has no area",
                panel.points.len()
            ),
            None,
        );
        return area_mm2;
    }
    if area_mm2 < settings.min_area_mm2 {
        f.issue(
            Severity::Critical,
            IssueKind::ZeroArea,
            format!(
                "Area {area_mm2:.1} mm² is below the minimum of {} mm²",
                settings.min_area_mm2
            ),
            Some(outline.centroid().into()),
        );
    }
    let ratio = outline.aspect_ratio();
    if ratio > settings.max_aspect_ratio {
        f.issue(
            Severity::Minor,
            IssueKind::ExtremeAspectRatio,
            format!(
                "Aspect ratio {ratio:.1}:1 exceeds {}:1",
                settings.max_aspect_ratio
            ),
            Some(outline.centroid().into()),
        );
    }
    area_mm2
}

/// Every pair of boundary edges that share no endpoint must stay apart.
pub(crate) fn check_self_intersection(
    panel: &FlattenedPanel,
    boundary: &[(usize, usize)],
    f: &mut Findings,
) {
    let point = |i: usize| Point2::from(panel.points[i]);
    for (i, &(a0, a1)) in boundary.iter().enumerate() {
        if a0 == a1 {
            continue;
        }
        for &(b0, b1) in &boundary[i + 1..] {
            if b0 == b1 || a0 == b0 || a0 == b1 || a1 == b0 || a1 == b1 {
                continue;
            }
            if let Some(p) = segment_intersection(&point(a0), &point(a1), &point(b0), &point(b1))
            {
                f.issue(
                    Severity::Critical,
                    IssueKind::SelfIntersection,
                    format!("Boundary edges {a0}-{a1} and {b0}-{b1} intersect"),
                    Some(p.into()),
                );
            }
        }
    }
}

/// Seam widths against the allowed range and against each other.
pub(crate) fn check_seams(panel: &FlattenedPanel, settings: &ValidationSettings, f: &mut Findings) {
    let widths: Vec<f64> = panel
        .edges_of_type(EdgeType::SeamAllowance)
        .filter_map(|e| e.seam_width_mm)
        .collect();
    if widths.is_empty() {
        return;
    }

    let narrow: Vec<f64> = widths
        .iter()
        .copied()
        .filter(|w| !(w.is_finite() && *w >= settings.seam_min_mm))
        .collect();
    if let Some(narrowest) = narrow.iter().copied().reduce(f64::min) {
        f.issue(
            Severity::Major,
            IssueKind::SeamAllowanceTooNarrow,
            format!(
                "{} seam edge(s) narrower than {} mm (narrowest {narrowest:.1} mm)",
                narrow.len(),
                settings.seam_min_mm
            ),
            None,
        );
    }

    let finite: Vec<f64> = widths.iter().copied().filter(|w| w.is_finite()).collect();
    let widest = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if widest > settings.seam_max_mm {
        f.warning(
            WarningKind::SeamAllowanceTooWide,
            format!(
                "Seam allowance of {widest:.1} mm is wider than {} mm",
                settings.seam_max_mm
            ),
        );
    }
    let narrowest = finite.iter().copied().fold(f64::INFINITY, f64::min);
    if finite.len() > 1 && widest - narrowest > settings.seam_variation_tolerance_mm {
        f.warning(
            WarningKind::InconsistentSeamAllowance,
            format!(
                "Seam allowance varies from {narrowest:.1} to {widest:.1} mm across the piece"
            ),
        );
    }
}

/// Short boundary edges and stretched or shrunk edges.
///
/// Returns the worst distortion ratio seen, if any edge carries its 3D
/// length.
pub(crate) fn check_edges(
    panel: &FlattenedPanel,
    boundary: &[(usize, usize)],
    settings: &ValidationSettings,
    f: &mut Findings,
) -> Option<f64> {
    let mm = panel.mm_per_unit();
    let midpoint = |p: Point2D, q: Point2D| Point2D::new((p.x + q.x) * 0.5, (p.y + q.y) * 0.5);

    let mut short = 0;
    let mut shortest: Option<(f64, usize, usize)> = None;
    for &(a, b) in boundary {
        let length_mm = panel.edge_length(a, b) * mm;
        if length_mm < settings.min_edge_length_mm {
            short += 1;
            if shortest.map_or(true, |(l, _, _)| length_mm < l) {
                shortest = Some((length_mm, a, b));
            }
        }
    }
    if let Some((length, a, b)) = shortest {
        f.issue(
            Severity::Major,
            IssueKind::EdgeTooShort,
            format!(
                "{short} boundary edge(s) shorter than {} mm (shortest {length:.2} mm)",
                settings.min_edge_length_mm
            ),
            Some(midpoint(panel.points[a], panel.points[b])),
        );
    }

    // Each edge is measured on the point list it indexes
    let mut worst: Option<(f64, Point2D, Point2D)> = None;
    let mut distorted = 0;
    for edge in &panel.edges {
        let Some(original) = edge.original_length else {
            continue;
        };
        let Some((p, q)) = panel.edge_points(edge) else {
            continue;
        };
        if !(original > 0.0) {
            continue;
        }
        let ratio = p.distance(&q) / original;
        let distortion = if ratio > 0.0 { ratio.max(1.0 / ratio) } else { f64::INFINITY };
        if distortion > settings.max_distortion {
            distorted += 1;
        }
        if worst.map_or(true, |(d, _, _)| distortion > d) {
            worst = Some((distortion, p, q));
        }
    }
    if distorted > 0 {
        if let Some((d, p, q)) = worst {
            f.issue(
                Severity::Minor,
                IssueKind::ExcessiveDistortion,
                format!(
                    "{distorted} edge(s) distorted beyond {}x (worst {d:.2}x)",
                    settings.max_distortion
                ),
                Some(midpoint(p, q)),
            );
        }
    }
    worst.map(|(d, _, _)| d)
}
