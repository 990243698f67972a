//! Flattened 2D pattern pieces.

use seamcraft_math::{Aabb2, Point2};
use serde::{Deserialize, Serialize};

use crate::error::{PatternError, Result};
use crate::panel::{Color, PanelId};
use crate::point::Point2D;
use crate::polygon::Polygon;

/// What a pattern edge means to the person cutting and sewing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeType {
    /// Where the fabric is cut.
    CutLine,
    /// Where the fabric is folded.
    FoldLine,
    /// Runs along a cut line at the seam-allowance distance.
    SeamAllowance,
    /// Notch used to align panels while sewing.
    RegistrationMark,
}

/// An edge between two points of a [`FlattenedPanel`].
///
/// Seam-allowance edges index [`FlattenedPanel::seam_outline`]; every other
/// edge indexes [`FlattenedPanel::points`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatternEdge {
    /// Index of the start point.
    pub start: usize,
    /// Index of the end point.
    pub end: usize,
    /// Edge meaning.
    pub edge_type: EdgeType,
    /// Length of the same edge on the 3D surface, in pattern units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_length: Option<f64>,
    /// Seam allowance width in millimeters (seam-allowance edges only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seam_width_mm: Option<f64>,
}

impl PatternEdge {
    /// Edge of the given type with no measurements attached.
    pub fn new(start: usize, end: usize, edge_type: EdgeType) -> Self {
        Self {
            start,
            end,
            edge_type,
            original_length: None,
            seam_width_mm: None,
        }
    }

    /// Cut line between two points.
    pub fn cut_line(start: usize, end: usize) -> Self {
        Self::new(start, end, EdgeType::CutLine)
    }

    /// Seam allowance between two points of the seam outline.
    pub fn seam_allowance(start: usize, end: usize, width_mm: f64) -> Self {
        Self {
            seam_width_mm: Some(width_mm),
            ..Self::new(start, end, EdgeType::SeamAllowance)
        }
    }

    /// Copy of this edge carrying its 3D length.
    pub fn with_original_length(self, length: f64) -> Self {
        Self {
            original_length: Some(length),
            ..self
        }
    }
}

/// The 2D cutting pattern produced by flattening one panel.
///
/// `points` is the ordered outline. `seam_outline` is that outline offset
/// outward by the seam allowance, point for point, so seam edge `i -> i+1`
/// runs parallel to cut edge `i -> i+1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlattenedPanel {
    /// Identity of this pattern piece.
    pub id: PanelId,
    /// Ordered outline points, in pattern units.
    pub points: Vec<Point2D>,
    /// Tagged edges between outline points.
    pub edges: Vec<PatternEdge>,
    /// Display color, inherited from the source panel.
    pub color: Color,
    /// Pattern units per real-world meter.
    pub scale_factor: f64,
    /// Panel this piece was flattened from (lookup only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_panel: Option<PanelId>,
    /// Outline offset outward by the seam allowance. Seam-allowance edges
    /// index this list.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub seam_outline: Vec<Point2D>,
}

impl FlattenedPanel {
    /// A piece whose outline is closed by cut lines through `points`.
    pub fn from_outline(points: Vec<Point2D>, color: Color, scale_factor: f64) -> Self {
        let n = points.len();
        let edges = (0..n)
            .map(|i| PatternEdge::cut_line(i, (i + 1) % n))
            .collect();
        Self {
            id: PanelId::new(),
            points,
            edges,
            color,
            scale_factor,
            source_panel: None,
            seam_outline: Vec::new(),
        }
    }

    /// Check the structural invariants: at least three finite points,
    /// every edge endpoint in range of the list it indexes, positive scale.
    pub fn validate(&self) -> Result<()> {
        if self.points.len() < 3 {
            return Err(PatternError::TooFewPoints(self.points.len()));
        }
        if !(self.scale_factor.is_finite() && self.scale_factor > 0.0) {
            return Err(PatternError::InvalidScale(self.scale_factor));
        }
        if let Some(i) = self.points.iter().position(|p| !p.is_finite()) {
            return Err(PatternError::NonFinitePoint(i));
        }
        for (edge, e) in self.edges.iter().enumerate() {
            let point_count = self.points_of(e.edge_type).len();
            for index in [e.start, e.end] {
                if index >= point_count {
                    return Err(PatternError::EdgeOutOfRange {
                        edge,
                        index,
                        point_count,
                    });
                }
            }
        }
        Ok(())
    }

    /// The point list an edge of this type indexes.
    pub fn points_of(&self, edge_type: EdgeType) -> &[Point2D] {
        match edge_type {
            EdgeType::SeamAllowance => &self.seam_outline,
            _ => &self.points,
        }
    }

    /// Endpoints of `edge`, `None` when an index is out of range.
    pub fn edge_points(&self, edge: &PatternEdge) -> Option<(Point2D, Point2D)> {
        let points = self.points_of(edge.edge_type);
        Some((*points.get(edge.start)?, *points.get(edge.end)?))
    }

    /// Add a seam allowance `width_mm` wide: the outline offset outward,
    /// stored in `seam_outline`, and one seam-allowance edge along each
    /// outline edge.
    ///
    /// Replaces any previous seam allowance. Returns false and leaves the
    /// piece unchanged when the offset outline cannot be built.
    pub fn add_seam_allowance(&mut self, width_mm: f64) -> bool {
        let distance = width_mm / self.mm_per_unit();
        let Some(offset) = self.outline().offset(-distance) else {
            return false;
        };
        let n = offset.points.len();
        self.seam_outline = offset.points.into_iter().map(Point2D::from).collect();
        self.edges.retain(|e| e.edge_type != EdgeType::SeamAllowance);
        self.edges
            .extend((0..n).map(|i| PatternEdge::seam_allowance(i, (i + 1) % n, width_mm)));
        true
    }

    /// Outline as a polygon.
    pub fn outline(&self) -> Polygon {
        Polygon::new(self.points.iter().map(|&p| p.into()).collect())
    }

    /// Edges of a given type.
    pub fn edges_of_type(&self, edge_type: EdgeType) -> impl Iterator<Item = &PatternEdge> + '_ {
        self.edges.iter().filter(move |e| e.edge_type == edge_type)
    }

    /// Boundary as index pairs: the cut lines when there are any, otherwise
    /// the implicit closed loop through `points`.
    pub fn boundary(&self) -> Vec<(usize, usize)> {
        let cuts: Vec<_> = self
            .edges_of_type(EdgeType::CutLine)
            .map(|e| (e.start, e.end))
            .collect();
        if !cuts.is_empty() {
            return cuts;
        }
        let n = self.points.len();
        if n < 2 {
            return Vec::new();
        }
        (0..n).map(|i| (i, (i + 1) % n)).collect()
    }

    /// Length of the edge between two points, in pattern units.
    pub fn edge_length(&self, start: usize, end: usize) -> f64 {
        self.points[start].distance(&self.points[end])
    }

    /// Outline area in pattern units squared.
    pub fn area(&self) -> f64 {
        self.outline().area()
    }

    /// Millimeters per pattern unit.
    pub fn mm_per_unit(&self) -> f64 {
        1000.0 / self.scale_factor
    }

    /// Bounds of the outline.
    pub fn bounds(&self) -> Option<Aabb2> {
        Aabb2::from_points(self.points.iter().map(|&p| Point2::from(p)))
    }

    /// Bounds of everything that must be cut: outline plus seam allowance.
    pub fn footprint(&self) -> Option<Aabb2> {
        Aabb2::from_points(
            self.points
                .iter()
                .chain(self.seam_outline.iter())
                .map(|&p| Point2::from(p)),
        )
    }

    /// Copy of this piece moved by `(dx, dy)`. Nothing else changes.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            points: self.points.iter().map(|p| p.translated(dx, dy)).collect(),
            seam_outline: self
                .seam_outline
                .iter()
                .map(|p| p.translated(dx, dy))
                .collect(),
            ..self.clone()
        }
    }
}
