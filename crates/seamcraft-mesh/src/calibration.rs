//! Real-world scale supplied by the calibration collaborator.

use serde::{Deserialize, Serialize};

use crate::error::{MeshError, Result};
use crate::mesh::Mesh;

/// Conversion from capture units to meters.
///
/// The calibration UI measures a reference feature of known size on the
/// captured mesh; the ratio of the two becomes `scale_factor`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    /// Meters per mesh unit.
    pub scale_factor: f64,
    /// Known real-world length of the reference feature, in millimeters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_length_mm: Option<f64>,
    /// Length of the same feature measured on the mesh, in mesh units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measured_length: Option<f64>,
}

impl Calibration {
    /// Calibration for a mesh already expressed in meters.
    pub const IDENTITY: Self = Self {
        scale_factor: 1.0,
        reference_length_mm: None,
        measured_length: None,
    };

    /// Calibration with an explicit meters-per-unit factor.
    pub fn with_scale(scale_factor: f64) -> Result<Self> {
        let cal = Self {
            scale_factor,
            ..Self::IDENTITY
        };
        cal.validate()?;
        Ok(cal)
    }

    /// Derive the factor from a reference feature.
    ///
    /// `measured` is the feature length in mesh units and `known_mm` its
    /// real length in millimeters.
    pub fn from_reference(measured: f64, known_mm: f64) -> Result<Self> {
        if !(measured.is_finite() && measured > 0.0) {
            return Err(MeshError::InvalidScale(measured));
        }
        let cal = Self {
            scale_factor: known_mm / 1000.0 / measured,
            reference_length_mm: Some(known_mm),
            measured_length: Some(measured),
        };
        cal.validate()?;
        Ok(cal)
    }

    /// Reject a non-finite or non-positive factor.
    pub fn validate(&self) -> Result<()> {
        if self.scale_factor.is_finite() && self.scale_factor > 0.0 {
            Ok(())
        } else {
            Err(MeshError::InvalidScale(self.scale_factor))
        }
    }

    /// Convert a captured mesh to meters.
    pub fn apply(&self, mesh: &Mesh) -> Result<Mesh> {
        self.validate()?;
        if self.scale_factor == 1.0 {
            return Ok(mesh.clone());
        }
        Ok(mesh.scaled(self.scale_factor))
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self::IDENTITY
    }
}
