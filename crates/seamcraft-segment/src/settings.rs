//! Clustering parameters.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SegmentError};

/// Parameters for panel segmentation.
///
/// The distance between a triangle and a cluster center is
/// `spatial_weight * |c - mu| / diag + normal_weight * (1 - n . nu)`, where
/// `diag` is the mesh bounding-box diagonal. The spatial term keeps panels
/// contiguous; the normal term keeps them roughly planar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationSettings {
    /// Iteration cap for a full segmentation.
    pub max_iterations: usize,
    /// Iteration cap for interactive previews.
    pub preview_max_iterations: usize,
    /// Stop once the summed center movement drops below this.
    pub convergence_threshold: f64,
    /// Weight of the normalized spatial distance.
    pub spatial_weight: f64,
    /// Weight of the normal deviation.
    pub normal_weight: f64,
    /// Fewest panels a caller may request.
    pub min_panels: usize,
    /// Most panels a caller may request.
    pub max_panels: usize,
}

impl Default for SegmentationSettings {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            preview_max_iterations: 10,
            convergence_threshold: 1e-4,
            spatial_weight: 1.0,
            normal_weight: 0.5,
            min_panels: 3,
            max_panels: 20,
        }
    }
}

impl SegmentationSettings {
    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 || self.preview_max_iterations == 0 {
            return Err(SegmentError::InvalidSettings(
                "iteration caps must be at least 1".into(),
            ));
        }
        if !(self.convergence_threshold.is_finite() && self.convergence_threshold >= 0.0) {
            return Err(SegmentError::InvalidSettings(
                "convergence_threshold must be finite and non-negative".into(),
            ));
        }
        for (name, w) in [
            ("spatial_weight", self.spatial_weight),
            ("normal_weight", self.normal_weight),
        ] {
            if !(w.is_finite() && w >= 0.0) {
                return Err(SegmentError::InvalidSettings(format!(
                    "{name} must be finite and non-negative"
                )));
            }
        }
        if self.spatial_weight == 0.0 && self.normal_weight == 0.0 {
            return Err(SegmentError::InvalidSettings(
                "at least one distance weight must be positive".into(),
            ));
        }
        if self.min_panels == 0 || self.min_panels > self.max_panels {
            return Err(SegmentError::InvalidSettings(
                "panel bounds must satisfy 1 <= min_panels <= max_panels".into(),
            ));
        }
        Ok(())
    }

    /// Check a requested panel count against the configured bounds.
    pub fn check_panel_count(&self, requested: usize) -> Result<()> {
        if requested < self.min_panels || requested > self.max_panels {
            return Err(SegmentError::InvalidPanelCount {
                requested,
                min: self.min_panels,
                max: self.max_panels,
            });
        }
        Ok(())
    }
}

/// Preview fidelity for interactive segmentation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewResolution {
    /// Few large panels.
    Coarse,
    /// Default preview.
    #[default]
    Medium,
    /// Many small panels.
    Fine,
}

impl PreviewResolution {
    /// Target panel count for this resolution.
    pub fn panel_count(self) -> usize {
        match self {
            PreviewResolution::Coarse => 5,
            PreviewResolution::Medium => 8,
            PreviewResolution::Fine => 15,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(SegmentationSettings::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_settings() {
        let bad = SegmentationSettings {
            max_iterations: 0,
            ..Default::default()
        };
        assert!(matches!(bad.validate(), Err(SegmentError::InvalidSettings(_))));

        let bad = SegmentationSettings {
            spatial_weight: 0.0,
            normal_weight: 0.0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());

        let bad = SegmentationSettings {
            normal_weight: f64::NAN,
            ..Default::default()
        };
        assert!(bad.validate().is_err());

        let bad = SegmentationSettings {
            min_panels: 10,
            max_panels: 5,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_panel_count_bounds() {
        let s = SegmentationSettings::default();
        assert!(s.check_panel_count(3).is_ok());
        assert!(s.check_panel_count(20).is_ok());
        assert_eq!(
            s.check_panel_count(2),
            Err(SegmentError::InvalidPanelCount {
                requested: 2,
                min: 3,
                max: 20
            })
        );
        assert!(s.check_panel_count(21).is_err());
    }

    #[test]
    fn test_preview_counts() {
        assert_eq!(PreviewResolution::Coarse.panel_count(), 5);
        assert_eq!(PreviewResolution::Medium.panel_count(), 8);
        assert_eq!(PreviewResolution::Fine.panel_count(), 15);
    }

    #[test]
    fn test_settings_from_partial_json() {
        let s: SegmentationSettings = serde_json::from_str(r#"{"max_iterations": 7}"#).unwrap();
        assert_eq!(s.max_iterations, 7);
        assert_eq!(s.min_panels, 3);
    }
}
