//! Greedy row packing of pattern pieces for cutting.

use seamcraft_math::Aabb2;
use seamcraft_pattern::FlattenedPanel;
use tracing::debug;

use crate::error::Result;
use crate::settings::LayoutSettings;

/// Arrange pieces left to right in rows, starting a new row below the
/// tallest piece of the current one when the next piece would pass
/// `max_row_width`.
///
/// Pieces are only translated: order, point counts, edges, colors and
/// scale are untouched. Footprints include the seam allowance. A piece
/// wider than a row gets a row of its own.
///
/// # Errors
///
/// Returns `InvalidSettings` for a non-positive row width or negative
/// spacing.
pub fn optimize_for_cutting(
    panels: &[FlattenedPanel],
    layout: &LayoutSettings,
) -> Result<Vec<FlattenedPanel>> {
    layout.validate()?;

    let mut cursor_x = 0.0;
    let mut cursor_y = 0.0;
    let mut row_height: f64 = 0.0;
    let mut placed = Vec::with_capacity(panels.len());

    for panel in panels {
        let Some(footprint) = panel.footprint() else {
            placed.push(panel.clone());
            continue;
        };
        let (width, height) = (footprint.width(), footprint.height());

        if cursor_x > 0.0 && cursor_x + width > layout.max_row_width {
            cursor_y += row_height + layout.spacing;
            cursor_x = 0.0;
            row_height = 0.0;
        }

        placed.push(panel.translated(cursor_x - footprint.min.x, cursor_y - footprint.min.y));
        cursor_x += width + layout.spacing;
        row_height = row_height.max(height);
    }

    debug!(
        "Packed {} pieces into a {:.1} deep layout",
        placed.len(),
        cursor_y + row_height
    );
    Ok(placed)
}

/// Bounds of the whole layout, `None` when there are no points.
pub fn layout_bounds(panels: &[FlattenedPanel]) -> Option<Aabb2> {
    panels
        .iter()
        .filter_map(FlattenedPanel::footprint)
        .reduce(|a, b| a.union(&b))
}
