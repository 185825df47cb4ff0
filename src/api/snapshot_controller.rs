use crate::error::{ChartError, ChartResult};
use crate::render::DrawingSurface;

use super::{ChartEngine, EngineSnapshot, SeriesRangeSnapshot};

impl<S: DrawingSurface> ChartEngine<S> {
    /// Builds a deterministic snapshot useful for regression tests.
    ///
    /// Works on a disposed engine too, so hosts can log the final state.
    #[must_use]
    pub fn snapshot(&self) -> EngineSnapshot {
        let model = &self.core.model;
        let left = model.markers.left();
        let right = model.markers.right();
        EngineSnapshot {
            size: model.size,
            viewport: model.viewport.state(),
            zoom_pivot_ratio: model.viewport.zoom_pivot_ratio(),
            has_graph: model.has_graph(),
            point_count: model.data.len(),
            left_marker_index: left.value_index,
            right_marker_index: right.value_index,
            left_marker_position: left.device_position,
            right_marker_position: right.device_position,
            hover_index: self.hover_index(),
            selection: model.selection,
            selected_bars: model.selected_bars.iter().copied().collect(),
            zoom_parts: model.zoom_parts,
            overlay_range: model.overlay_range,
            interaction_mode: model.interaction.mode(),
            series_ranges: model
                .visible_ranges
                .iter()
                .map(|(series_id, range)| SeriesRangeSnapshot {
                    series_id: *series_id,
                    min: range.min,
                    max: range.max,
                })
                .collect(),
            layer_stats: self.layer_recompute_stats(),
            render_generation: self.render_generation(),
            disposed: self.core.runtime.disposed,
        }
    }

    /// Serializes snapshot as pretty JSON for fixture-based regression checks.
    pub fn snapshot_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(&self.snapshot())
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize snapshot: {e}")))
    }
}
