//! Structured validation outcomes.

use seamcraft_pattern::PanelId;
use serde::{Deserialize, Serialize};

use crate::issues::{IssueKind, ValidationIssue, ValidationWarning};

/// Outcome of validating one pattern piece.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternValidationResult {
    /// Piece that was validated.
    pub panel: PanelId,
    /// No `Critical` or `Major` issue was found.
    pub is_valid: bool,
    /// Problems, in the order the checks ran.
    pub issues: Vec<ValidationIssue>,
    /// Non-blocking observations.
    pub warnings: Vec<ValidationWarning>,
    /// Outline area in mm² (zero when the piece could not be measured).
    pub area_mm2: f64,
    /// Outline perimeter in mm (zero when the piece could not be measured).
    pub perimeter_mm: f64,
    /// Worst flattened/original edge length ratio, when edges carry one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_distortion: Option<f64>,
}

impl PatternValidationResult {
    /// Issues of a given kind.
    pub fn issues_of_kind(
        &self,
        kind: IssueKind,
    ) -> impl Iterator<Item = &ValidationIssue> + '_ {
        self.issues.iter().filter(move |i| i.kind == kind)
    }
}

/// How the widest piece compares with standard bolt widths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FabricCompatibility {
    /// Width of the widest piece including seam allowance, in mm.
    pub max_panel_width_mm: f64,
    /// Standard widths that fit every piece, narrowest first.
    pub compatible_widths_mm: Vec<f64>,
    /// No standard width fits.
    pub requires_custom_width: bool,
}

/// Fabric consumed by a naive strip layout at one width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FabricUtilizationResult {
    /// Width the layout was computed for, in mm.
    pub fabric_width_mm: f64,
    /// Sum of piece areas, in mm².
    pub panel_area_mm2: f64,
    /// Roll length used: every piece stacked along the roll, in mm.
    pub fabric_length_mm: f64,
    /// `fabric_length_mm * fabric_width_mm`.
    pub fabric_area_mm2: f64,
    /// `panel_area_mm2 / fabric_area_mm2`, zero when no fabric is used.
    pub efficiency: f64,
    /// Pieces wider than the fabric.
    pub oversized_panels: Vec<PanelId>,
    /// Human-readable advice.
    pub recommendations: Vec<String>,
    /// Warnings backing the recommendations.
    pub warnings: Vec<ValidationWarning>,
}

/// Outcome of validating a set of pieces together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternSetValidationResult {
    /// Every piece is valid and no set-level issue blocks.
    pub is_valid: bool,
    /// Per-piece results, in input order.
    pub panel_results: Vec<PatternValidationResult>,
    /// Set-level problems (overlaps).
    pub issues: Vec<ValidationIssue>,
    /// Set-level observations (fabric fit and efficiency).
    pub warnings: Vec<ValidationWarning>,
    /// Sum of piece areas, in mm².
    pub total_area_mm2: f64,
    /// Narrowest fabric that fits every piece, `None` for an empty set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_fabric_width_mm: Option<f64>,
    /// Fit against standard widths.
    pub compatibility: FabricCompatibility,
    /// Utilization at the recommended width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utilization: Option<FabricUtilizationResult>,
}

impl PatternSetValidationResult {
    /// Every issue in the set, piece-level first.
    pub fn all_issues(&self) -> impl Iterator<Item = &ValidationIssue> + '_ {
        self.panel_results
            .iter()
            .flat_map(|r| r.issues.iter())
            .chain(self.issues.iter())
    }
}
