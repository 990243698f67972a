//! Fabric width and utilization.

use seamcraft_pattern::{FlattenedPanel, PanelId};

use crate::issues::{ValidationWarning, WarningKind};
use crate::result::{FabricCompatibility, FabricUtilizationResult};
use crate::settings::ValidationSettings;

/// Size of a piece as it lies on the fabric, in mm.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PieceSize {
    pub(crate) id: PanelId,
    pub(crate) width_mm: f64,
    pub(crate) length_mm: f64,
    pub(crate) area_mm2: f64,
}

/// Footprint of a piece, `None` when it cannot be measured.
pub(crate) fn piece_size(panel: &FlattenedPanel) -> Option<PieceSize> {
    if panel.points.len() < 3
        || !(panel.scale_factor.is_finite() && panel.scale_factor > 0.0)
        || panel.points.iter().any(|p| !p.is_finite())
    {
        return None;
    }
    let mm = panel.mm_per_unit();
    let footprint = panel.footprint()?;
    Some(PieceSize {
        id: panel.id,
        width_mm: footprint.width() * mm,
        length_mm: footprint.height() * mm,
        area_mm2: panel.area() * mm * mm,
    })
}

pub(crate) fn compatibility(sizes: &[PieceSize], settings: &ValidationSettings) -> FabricCompatibility {
    let max_panel_width_mm = sizes.iter().map(|s| s.width_mm).fold(0.0, f64::max);
    let compatible_widths_mm: Vec<f64> = settings
        .sorted_fabric_widths()
        .into_iter()
        .filter(|&w| w >= max_panel_width_mm)
        .collect();
    FabricCompatibility {
        max_panel_width_mm,
        requires_custom_width: compatible_widths_mm.is_empty(),
        compatible_widths_mm,
    }
}

/// Narrowest compatible width, or the widest piece rounded up to 10 mm.
pub(crate) fn recommended_width(compat: &FabricCompatibility) -> f64 {
    match compat.compatible_widths_mm.first() {
        Some(&w) => w,
        None => (compat.max_panel_width_mm / 10.0).ceil() * 10.0,
    }
}

pub(crate) fn utilization(
    sizes: &[PieceSize],
    fabric_width_mm: f64,
    settings: &ValidationSettings,
) -> FabricUtilizationResult {
    let panel_area_mm2: f64 = sizes.iter().map(|s| s.area_mm2).sum();
    let fabric_length_mm: f64 = sizes.iter().map(|s| s.length_mm).sum();
    let mut result = FabricUtilizationResult {
        fabric_width_mm,
        panel_area_mm2,
        fabric_length_mm,
        fabric_area_mm2: 0.0,
        efficiency: 0.0,
        oversized_panels: Vec::new(),
        recommendations: Vec::new(),
        warnings: Vec::new(),
    };
    if sizes.is_empty() {
        return result;
    }
    if !(fabric_width_mm.is_finite() && fabric_width_mm > 0.0) {
        result
            .recommendations
            .push(format!("Fabric width must be positive, got {fabric_width_mm} mm"));
        return result;
    }

    result.fabric_area_mm2 = fabric_length_mm * fabric_width_mm;
    if result.fabric_area_mm2 > 0.0 {
        result.efficiency = panel_area_mm2 / result.fabric_area_mm2;
    }

    for size in sizes.iter().filter(|s| s.width_mm > fabric_width_mm) {
        result.oversized_panels.push(size.id);
        result.warnings.push(
            ValidationWarning::new(
                WarningKind::OversizedPanel,
                format!(
                    "Piece is {:.0} mm wide, fabric is {fabric_width_mm:.0} mm",
                    size.width_mm
                ),
            )
            .with_panel(size.id),
        );
    }
    if !result.oversized_panels.is_empty() {
        result.recommendations.push(format!(
            "{} piece(s) do not fit a {fabric_width_mm:.0} mm fabric; use a wider fabric or split them",
            result.oversized_panels.len()
        ));
    }

    if result.efficiency < settings.min_fabric_efficiency {
        let percent = result.efficiency * 100.0;
        result.warnings.push(ValidationWarning::new(
            WarningKind::LowFabricEfficiency,
            format!(
                "Fabric efficiency is {percent:.0}%, below {:.0}%",
                settings.min_fabric_efficiency * 100.0
            ),
        ));
        result.recommendations.push(format!(
            "Only {percent:.0}% of the fabric is used; nest pieces side by side or rotate them to reduce waste"
        ));
    }
    result
}
