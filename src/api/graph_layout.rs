use crate::core::{CanvasSize, DeviceRect, SeriesId};
use crate::render::DrawingSurface;

use super::{ChartEngine, GraphMargins};

/// Stacks one band per series between the top and bottom margins.
///
/// Bands share the remaining height evenly; a canvas too small for the
/// margins yields zero-height bands, which painters skip.
#[must_use]
pub(super) fn stack_graph_bands(
    size: CanvasSize,
    margins: GraphMargins,
    series: &[SeriesId],
) -> Vec<(SeriesId, DeviceRect)> {
    if series.is_empty() {
        return Vec::new();
    }
    let count = series.len() as f64;
    let width = f64::from(size.width);
    let spacing = margins.graph_spacing_px * (count - 1.0);
    let available = f64::from(size.height) - margins.top_px - margins.bottom_px - spacing;
    let band_height = (available / count).floor().max(0.0);

    series
        .iter()
        .enumerate()
        .map(|(position, series_id)| {
            let top =
                margins.top_px + position as f64 * (band_height + margins.graph_spacing_px);
            (*series_id, DeviceRect::new(0.0, top, width, band_height))
        })
        .collect()
}

impl<S: DrawingSurface> ChartEngine<S> {
    /// Recomputes graph bands and the y marker pairs that live in them.
    pub(super) fn relayout_graphs(&mut self) {
        let series: Vec<SeriesId> = self
            .core
            .model
            .data
            .y_series
            .iter()
            .map(|series| series.id)
            .collect();
        let bands = stack_graph_bands(self.core.model.size, self.core.behavior.margins, &series);
        self.core.model.markers.layout_y_markers(&bands);
        self.core.model.graph_bands = bands;
        self.core.model.hit_index_stale = true;
    }
}
