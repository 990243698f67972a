//! The end-to-end scan-to-pattern run.

use seamcraft_flatten::{flatten_panels, optimize_for_cutting};
use seamcraft_mesh::{Calibration, CancelSignal, Mesh};
use seamcraft_pattern::{FlattenedPanel, Panel};
use seamcraft_repair::{processed, ProcessingResult};
use seamcraft_segment::{PanelSegmenter, PreviewResolution, Segmenter};
use seamcraft_validate::{PatternSetValidationResult, PatternValidator};
use tracing::info;

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};

/// Everything produced by one [`Pipeline::run`].
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Repaired mesh and repair counters.
    pub processing: ProcessingResult,
    /// Panels over `processing.mesh`.
    pub panels: Vec<Panel>,
    /// Pattern pieces laid out for cutting, one per panel in the same order.
    pub flattened: Vec<FlattenedPanel>,
    /// Checks over the laid-out pieces.
    pub validation: PatternSetValidationResult,
    /// One line per completed stage.
    pub operation_log: Vec<String>,
}

/// Calibrate, repair, segment, flatten, lay out and validate.
///
/// The segmentation strategy is injected; [`Pipeline::new`] uses a
/// [`PanelSegmenter`] built from the configuration.
pub struct Pipeline {
    config: PipelineConfig,
    segmenter: Box<dyn Segmenter>,
}

impl Pipeline {
    /// Pipeline with the default segmenter.
    ///
    /// # Errors
    ///
    /// Returns the first configuration problem found.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let segmenter = Box::new(PanelSegmenter::new(config.segmentation.clone()));
        Ok(Self { config, segmenter })
    }

    /// Replace the segmentation strategy.
    pub fn with_segmenter(mut self, segmenter: Box<dyn Segmenter>) -> Self {
        self.segmenter = segmenter;
        self
    }

    /// The configuration in use.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every stage on a captured mesh.
    ///
    /// Cancellation is checked between stages and inside the iterative
    /// ones.
    pub fn run(
        &self,
        mesh: &Mesh,
        calibration: &Calibration,
        target_panels: usize,
        cancel: &dyn CancelSignal,
    ) -> Result<PipelineOutput> {
        let mut log = Vec::new();

        let calibrated = calibration.apply(mesh)?;
        log.push(format!("Calibrated at {} m per unit", calibration.scale_factor));
        check(cancel)?;

        let processing = processed(&calibrated, &self.config.repair)?;
        log.push(processing.to_string());
        check(cancel)?;

        let panels = self
            .segmenter
            .segment(&processing.mesh, target_panels, cancel)?;
        log.push(format!(
            "Segmented {} triangles into {} panels",
            processing.final_triangle_count,
            panels.len()
        ));
        check(cancel)?;

        let flattened = flatten_panels(&panels, &processing.mesh, &self.config.flatten, cancel)?;
        let flattened = optimize_for_cutting(&flattened, &self.config.layout)?;
        log.push(format!("Flattened and laid out {} pieces", flattened.len()));
        check(cancel)?;

        let validation =
            PatternValidator::new(self.config.validation.clone()).validate_panel_set(&flattened);
        log.push(format!(
            "Validation {}: {} set issues, {} warnings",
            if validation.is_valid { "passed" } else { "failed" },
            validation.issues.len(),
            validation.warnings.len()
        ));
        info!("Pipeline finished: {}", log.join("; "));

        Ok(PipelineOutput {
            processing,
            panels,
            flattened,
            validation,
            operation_log: log,
        })
    }

    /// Calibrate, repair and run a cheap segmentation for display.
    pub fn preview(
        &self,
        mesh: &Mesh,
        calibration: &Calibration,
        resolution: PreviewResolution,
        cancel: &dyn CancelSignal,
    ) -> Result<Vec<Panel>> {
        let calibrated = calibration.apply(mesh)?;
        let processing = processed(&calibrated, &self.config.repair)?;
        check(cancel)?;
        Ok(self.segmenter.preview(&processing.mesh, resolution, cancel)?)
    }
}

fn check(cancel: &dyn CancelSignal) -> Result<()> {
    if cancel.is_cancelled() {
        Err(PipelineError::Cancelled)
    } else {
        Ok(())
    }
}
