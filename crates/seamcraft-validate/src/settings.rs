//! Validation thresholds.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidateError};

/// Common bolt widths, in millimeters.
pub const STANDARD_FABRIC_WIDTHS_MM: [f64; 5] = [914.0, 1120.0, 1370.0, 1500.0, 1520.0];

/// Thresholds for [`PatternValidator`](crate::PatternValidator).
///
/// Lengths are in millimeters regardless of a piece's scale factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationSettings {
    /// Smallest acceptable piece area.
    pub min_area_mm2: f64,
    /// Largest acceptable long/short extent ratio.
    pub max_aspect_ratio: f64,
    /// Narrowest acceptable seam allowance.
    pub seam_min_mm: f64,
    /// Widest seam allowance before a warning.
    pub seam_max_mm: f64,
    /// Largest spread of seam widths within one piece.
    pub seam_variation_tolerance_mm: f64,
    /// Shortest acceptable boundary edge.
    pub min_edge_length_mm: f64,
    /// Largest flattened/original edge length ratio, either way.
    pub max_distortion: f64,
    /// Relative tolerance for the collinearity test.
    pub collinear_epsilon: f64,
    /// Efficiency below which a layout gets a warning.
    pub min_fabric_efficiency: f64,
    /// Fabric widths considered standard.
    pub standard_fabric_widths_mm: Vec<f64>,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            min_area_mm2: 100.0,
            max_aspect_ratio: 20.0,
            seam_min_mm: 3.0,
            seam_max_mm: 50.0,
            seam_variation_tolerance_mm: 2.0,
            min_edge_length_mm: 10.0,
            max_distortion: 1.5,
            collinear_epsilon: 1e-9,
            min_fabric_efficiency: 0.65,
            standard_fabric_widths_mm: STANDARD_FABRIC_WIDTHS_MM.to_vec(),
        }
    }
}

impl ValidationSettings {
    /// Check the thresholds are usable. The error describes the first
    /// problem found.
    pub fn validate(&self) -> Result<()> {
        let non_negative = [
            ("min_area_mm2", self.min_area_mm2),
            ("seam_min_mm", self.seam_min_mm),
            ("seam_variation_tolerance_mm", self.seam_variation_tolerance_mm),
            ("min_edge_length_mm", self.min_edge_length_mm),
            ("collinear_epsilon", self.collinear_epsilon),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ValidateError::InvalidSettings(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        if !(self.seam_max_mm.is_finite() && self.seam_max_mm >= self.seam_min_mm) {
            return Err(ValidateError::InvalidSettings(format!(
                "seam_max_mm ({}) must be at least seam_min_mm ({})",
                self.seam_max_mm, self.seam_min_mm
            )));
        }
        if !(self.max_aspect_ratio >= 1.0) {
            return Err(ValidateError::InvalidSettings(format!(
                "max_aspect_ratio must be at least 1, got {}",
                self.max_aspect_ratio
            )));
        }
        if !(self.max_distortion >= 1.0) {
            return Err(ValidateError::InvalidSettings(format!(
                "max_distortion must be at least 1, got {}",
                self.max_distortion
            )));
        }
        if !(0.0..=1.0).contains(&self.min_fabric_efficiency) {
            return Err(ValidateError::InvalidSettings(format!(
                "min_fabric_efficiency must be in [0, 1], got {}",
                self.min_fabric_efficiency
            )));
        }
        if let Some(w) = self
            .standard_fabric_widths_mm
            .iter()
            .find(|w| !(w.is_finite() && **w > 0.0))
        {
            return Err(ValidateError::InvalidSettings(format!(
                "fabric width must be positive, got {w}"
            )));
        }
        Ok(())
    }

    /// Standard widths in ascending order.
    pub fn sorted_fabric_widths(&self) -> Vec<f64> {
        let mut widths = self.standard_fabric_widths_mm.clone();
        widths.sort_by(|a, b| a.total_cmp(b));
        widths
    }
}
