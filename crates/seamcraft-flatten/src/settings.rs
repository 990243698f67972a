//! Flattening and layout parameters.

use serde::{Deserialize, Serialize};

use crate::error::{FlattenError, Result};

/// Parameters for conformal flattening.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlattenSettings {
    /// Pattern units per meter of mesh (1000 gives millimeters).
    pub scale_factor: f64,
    /// Seam allowance added around each piece (mm).
    pub seam_allowance_mm: f64,
    /// Emit seam-allowance edges and the offset outline.
    pub include_seam_allowance: bool,
    /// Conjugate-gradient iteration cap per panel.
    pub max_iterations: usize,
    /// Relative residual at which the solve stops.
    pub tolerance: f64,
    /// Triangles below this area (square meters) make a panel degenerate.
    pub degenerate_area: f64,
}

impl Default for FlattenSettings {
    fn default() -> Self {
        Self {
            scale_factor: 1000.0,
            seam_allowance_mm: 15.0,
            include_seam_allowance: true,
            max_iterations: 2000,
            tolerance: 1e-10,
            degenerate_area: 1e-12,
        }
    }
}

impl FlattenSettings {
    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if !(self.scale_factor.is_finite() && self.scale_factor > 0.0) {
            return Err(FlattenError::InvalidSettings(
                "scale_factor must be finite and positive".into(),
            ));
        }
        if !(self.seam_allowance_mm.is_finite() && self.seam_allowance_mm >= 0.0) {
            return Err(FlattenError::InvalidSettings(
                "seam_allowance_mm must be finite and non-negative".into(),
            ));
        }
        if self.max_iterations == 0 {
            return Err(FlattenError::InvalidSettings(
                "max_iterations must be at least 1".into(),
            ));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(FlattenError::InvalidSettings(
                "tolerance must be finite and positive".into(),
            ));
        }
        if !(self.degenerate_area.is_finite() && self.degenerate_area >= 0.0) {
            return Err(FlattenError::InvalidSettings(
                "degenerate_area must be finite and non-negative".into(),
            ));
        }
        Ok(())
    }

    /// Seam allowance in pattern units.
    pub fn seam_allowance_units(&self) -> f64 {
        self.seam_allowance_mm * self.scale_factor / 1000.0
    }
}

/// Parameters for row packing, in pattern units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// A row is closed once the next piece would pass this width.
    pub max_row_width: f64,
    /// Gap between neighbouring pieces and rows.
    pub spacing: f64,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            max_row_width: 1500.0,
            spacing: 10.0,
        }
    }
}

impl LayoutSettings {
    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if !(self.max_row_width.is_finite() && self.max_row_width > 0.0) {
            return Err(FlattenError::InvalidSettings(
                "max_row_width must be finite and positive".into(),
            ));
        }
        if !(self.spacing.is_finite() && self.spacing >= 0.0) {
            return Err(FlattenError::InvalidSettings(
                "spacing must be finite and non-negative".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(FlattenSettings::default().validate().is_ok());
        assert!(LayoutSettings::default().validate().is_ok());
    }

    #[test]
    fn test_seam_units_follow_scale() {
        let s = FlattenSettings::default();
        assert!((s.seam_allowance_units() - 15.0).abs() < 1e-12);
        let s = FlattenSettings {
            scale_factor: 100.0,
            ..Default::default()
        };
        assert!((s.seam_allowance_units() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_bad_values() {
        for bad in [
            FlattenSettings {
                scale_factor: 0.0,
                ..Default::default()
            },
            FlattenSettings {
                seam_allowance_mm: -1.0,
                ..Default::default()
            },
            FlattenSettings {
                max_iterations: 0,
                ..Default::default()
            },
            FlattenSettings {
                tolerance: f64::NAN,
                ..Default::default()
            },
        ] {
            assert!(matches!(bad.validate(), Err(FlattenError::InvalidSettings(_))));
        }
        let bad = LayoutSettings {
            max_row_width: -5.0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_layout_from_toml_like_json() {
        let s: LayoutSettings = serde_json::from_str(r#"{"spacing": 4.0}"#).unwrap();
        assert_eq!(s.spacing, 4.0);
        assert_eq!(s.max_row_width, 1500.0);
    }
}
