//! Configuration for every stage, loadable from TOML or JSON.

use seamcraft_flatten::{FlattenSettings, LayoutSettings};
use seamcraft_repair::RepairOptions;
use seamcraft_segment::SegmentationSettings;
use seamcraft_validate::ValidationSettings;
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// Settings for a full scan-to-pattern run.
///
/// Every table is optional; missing keys take their defaults.
///
/// # Example TOML
///
/// ```toml
/// [repair]
/// max_hole_edges = 20
///
/// [segmentation]
/// normal_weight = 0.8
///
/// [flatten]
/// seam_allowance_mm = 10.0
///
/// [validation]
/// standard_fabric_widths_mm = [1120.0, 1500.0]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Mesh cleanup.
    pub repair: RepairOptions,
    /// Panel clustering.
    pub segmentation: SegmentationSettings,
    /// Conformal flattening.
    pub flatten: FlattenSettings,
    /// Cutting layout.
    pub layout: LayoutSettings,
    /// Pattern checks.
    pub validation: ValidationSettings,
}

impl PipelineConfig {
    /// Parse from TOML and check the values.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s).map_err(|e| PipelineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| PipelineError::Config(e.to_string()))
    }

    /// Parse from JSON and check the values.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(s).map_err(|e| PipelineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to JSON.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| PipelineError::Config(e.to_string()))
    }

    /// Check every stage's settings.
    pub fn validate(&self) -> Result<()> {
        self.segmentation.validate()?;
        self.flatten.validate()?;
        self.layout.validate()?;
        self.validation.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seamcraft_repair::CropDirection;
    use seamcraft_validate::ValidateError;

    #[test]
    fn test_defaults_validate() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config = PipelineConfig::from_toml_str(
            r#"
            [repair]
            max_hole_edges = 20
            crop = { height_fraction = 0.1, direction = "below" }

            [flatten]
            seam_allowance_mm = 10.0

            [validation]
            standard_fabric_widths_mm = [1120.0, 1500.0]
            "#,
        )
        .unwrap();
        assert_eq!(config.repair.max_hole_edges, 20);
        assert!(config.repair.fill_holes);
        let crop = config.repair.crop.unwrap();
        assert_eq!(crop.direction, CropDirection::Below);
        assert_eq!(config.flatten.seam_allowance_mm, 10.0);
        assert_eq!(config.flatten.scale_factor, 1000.0);
        assert_eq!(config.validation.standard_fabric_widths_mm, vec![1120.0, 1500.0]);
        assert_eq!(config.segmentation, SegmentationSettings::default());
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(PipelineConfig::from_toml_str("").unwrap(), PipelineConfig::default());
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = PipelineConfig::default();
        config.layout.spacing = 25.0;
        let text = config.to_toml_string().unwrap();
        assert_eq!(PipelineConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_json_round_trip() {
        let mut config = PipelineConfig::default();
        config.repair = RepairOptions::default().with_crop(0.05, CropDirection::Above);
        let text = config.to_json_string().unwrap();
        assert_eq!(PipelineConfig::from_json_str(&text).unwrap(), config);
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        let err = PipelineConfig::from_toml_str("[flatten]\nscale_factor = -1.0\n").unwrap_err();
        assert!(matches!(err, PipelineError::Flatten(_)));

        let err = PipelineConfig::from_json_str(r#"{"validation": {"max_distortion": 0.5}}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Validate(ValidateError::InvalidSettings(_))
        ));
    }

    #[test]
    fn test_malformed_input_rejected() {
        assert!(matches!(
            PipelineConfig::from_toml_str("[repair\n"),
            Err(PipelineError::Config(_))
        ));
        assert!(matches!(
            PipelineConfig::from_json_str("{"),
            Err(PipelineError::Config(_))
        ));
    }
}
