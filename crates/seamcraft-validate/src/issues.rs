//! Issues and warnings reported by the validator.

use seamcraft_pattern::{PanelId, Point2D};
use serde::{Deserialize, Serialize};

/// How serious an issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Worth a look; the piece can still be sewn.
    Minor,
    /// The piece will sew badly or not fit the layout.
    Major,
    /// The geometry is unusable.
    Critical,
}

impl Severity {
    /// Human-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minor => "Minor",
            Self::Major => "Major",
            Self::Critical => "Critical",
        }
    }

    /// Does this severity make a result invalid?
    pub fn is_blocking(&self) -> bool {
        *self >= Severity::Major
    }
}

/// What an issue is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Fewer than three outline points.
    InsufficientPoints,
    /// Two outline points are identical.
    DuplicatePoints,
    /// All outline points lie on one line.
    CollinearPoints,
    /// Outline area is below the minimum.
    ZeroArea,
    /// Piece is much longer than it is wide.
    ExtremeAspectRatio,
    /// Two non-adjacent boundary edges meet.
    SelfIntersection,
    /// Seam allowance narrower than the minimum.
    SeamAllowanceTooNarrow,
    /// Boundary edge shorter than the minimum.
    EdgeTooShort,
    /// Flattened edge length differs too much from its 3D length.
    ExcessiveDistortion,
    /// An edge references a point that does not exist.
    InvalidEdge,
    /// An outline point is NaN or infinite.
    NonFinitePoint,
    /// The piece's scale factor is unusable.
    InvalidScale,
    /// Two pieces overlap in the layout.
    PanelOverlap,
}

impl IssueKind {
    /// Human-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InsufficientPoints => "Insufficient Points",
            Self::DuplicatePoints => "Duplicate Points",
            Self::CollinearPoints => "Collinear Points",
            Self::ZeroArea => "Zero Area",
            Self::ExtremeAspectRatio => "Extreme Aspect Ratio",
            Self::SelfIntersection => "Self-Intersection",
            Self::SeamAllowanceTooNarrow => "Seam Allowance Too Narrow",
            Self::EdgeTooShort => "Edge Too Short",
            Self::ExcessiveDistortion => "Excessive Distortion",
            Self::InvalidEdge => "Invalid Edge",
            Self::NonFinitePoint => "Non-Finite Point",
            Self::InvalidScale => "Invalid Scale",
            Self::PanelOverlap => "Panel Overlap",
        }
    }
}

/// A problem found during validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// How serious it is.
    pub severity: Severity,
    /// What it is about.
    pub kind: IssueKind,
    /// Human-readable description.
    pub message: String,
    /// Piece the issue belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub panel: Option<PanelId>,
    /// Where on the piece, in pattern units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Point2D>,
}

impl ValidationIssue {
    /// Create a new issue.
    pub fn new(severity: Severity, kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            severity,
            kind,
            message: message.into(),
            panel: None,
            location: None,
        }
    }

    /// Attach the piece.
    pub fn with_panel(mut self, panel: PanelId) -> Self {
        self.panel = Some(panel);
        self
    }

    /// Attach a location.
    pub fn with_location(mut self, location: Point2D) -> Self {
        self.location = Some(location);
        self
    }

    /// Does this issue make the result invalid?
    pub fn is_blocking(&self) -> bool {
        self.severity.is_blocking()
    }
}

/// What a warning is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Seam allowance wider than the maximum.
    SeamAllowanceTooWide,
    /// Seam widths vary across one piece.
    InconsistentSeamAllowance,
    /// Too much fabric is wasted.
    LowFabricEfficiency,
    /// Piece is wider than the fabric.
    OversizedPanel,
    /// No standard fabric width fits every piece.
    CustomFabricWidth,
}

/// Something worth telling the user that does not make the pattern invalid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationWarning {
    /// What it is about.
    pub kind: WarningKind,
    /// Human-readable description.
    pub message: String,
    /// Piece the warning belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub panel: Option<PanelId>,
    /// Where on the piece, in pattern units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Point2D>,
}

impl ValidationWarning {
    /// Create a new warning.
    pub fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            panel: None,
            location: None,
        }
    }

    /// Attach the piece.
    pub fn with_panel(mut self, panel: PanelId) -> Self {
        self.panel = Some(panel);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Minor < Severity::Major);
        assert!(Severity::Major < Severity::Critical);
        assert!(!Severity::Minor.is_blocking());
        assert!(Severity::Major.is_blocking());
    }

    #[test]
    fn test_issue_builders() {
        let id = PanelId::new();
        let issue = ValidationIssue::new(Severity::Critical, IssueKind::ZeroArea, "area 0 mm2")
            .with_panel(id)
            .with_location(Point2D::new(1.0, 2.0));
        assert_eq!(issue.panel, Some(id));
        assert_eq!(issue.location, Some(Point2D::new(1.0, 2.0)));
        assert!(issue.is_blocking());
        assert_eq!(issue.kind.as_str(), "Zero Area");
    }

    #[test]
    fn test_issue_serde() {
        let issue = ValidationIssue::new(Severity::Major, IssueKind::PanelOverlap, "overlap");
        let json = serde_json::to_string(&issue).unwrap();
        assert!(json.contains("\"panel_overlap\""));
        assert!(!json.contains("location"));
        let back: ValidationIssue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, issue);
    }
}
