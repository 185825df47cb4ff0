use tracing::{debug, warn};

use crate::core::{
    ChartDataModel, MarkerSet, SeriesId, SharedMinMaxKeeper, VisibleRange, YSeries,
};
use crate::error::{ChartError, ChartResult};
use crate::render::{DrawingSurface, LayerId};

use super::ChartEngine;

impl<S: DrawingSurface> ChartEngine<S> {
    /// Replaces the chart data and resets zoom, markers and selection.
    ///
    /// A model without samples or series switches to the no-graph state,
    /// which only draws the model's error message. Unusable samples are
    /// skipped, see [`ChartDataModel::sanitized`].
    pub fn set_data_model(&mut self, data: ChartDataModel) -> ChartResult<()> {
        self.ensure_alive()?;
        let data = data.sanitized();
        warn_on_length_mismatch(&data);
        self.cancel_interaction();

        let len = data.len();
        let series_count = data.y_series.len();
        self.core.model.data = data;
        self.apply_value_range();
        self.core.model.viewport.fit_to_content();
        self.core.model.zoom_parts = None;
        self.core.model.markers = MarkerSet::new(len);
        self.core.model.selection = None;
        self.core.model.selected_bars.clear();
        self.core.model.overlay_range = None;
        self.relayout_graphs();
        self.load_visible_ranges();
        self.core.model.reposition_markers();
        debug!(
            points = len,
            series = series_count,
            has_graph = self.core.model.has_graph(),
            "data model set"
        );
        self.invalidate_all();
        Ok(())
    }

    /// Replaces the chart data but keeps zoom and marker indices.
    ///
    /// Marker, selection and overlay indices are clamped into the new length.
    pub fn update_data_model(&mut self, data: ChartDataModel) -> ChartResult<()> {
        self.ensure_alive()?;
        let data = data.sanitized();
        warn_on_length_mismatch(&data);
        self.cancel_interaction();

        let len = data.len();
        self.core.model.data = data;
        self.apply_value_range();
        self.core.model.markers.set_series_len(len);
        let model = &mut self.core.model;
        model.selection = model.selection.filter(|selection| selection.value_index < len);
        model.selected_bars.retain(|index| *index < len);
        if let Some(range) = model.overlay_range.as_mut() {
            range.start_index = model.data.clamp_index(range.start_index);
            range.end_index = model.data.clamp_index(range.end_index);
        }
        self.relayout_graphs();
        self.load_visible_ranges();
        self.core.model.reposition_markers();
        debug!(points = len, "data model updated");
        self.invalidate_all();
        Ok(())
    }

    /// Shares y ranges with companion charts; `None` detaches.
    pub fn set_synched_min_max_keeper(&mut self, keeper: Option<SharedMinMaxKeeper>) {
        self.core.runtime.synched_min_max = keeper;
    }

    /// Sets the visible y range of one series.
    pub fn set_visible_range(&mut self, series_id: SeriesId, min: f64, max: f64) -> ChartResult<()> {
        self.ensure_alive()?;
        if !min.is_finite() || !max.is_finite() {
            return Err(ChartError::InvalidData(
                "visible range bounds must be finite".to_owned(),
            ));
        }
        if !self.core.model.visible_ranges.contains_key(&series_id) {
            return Err(ChartError::InvalidData(format!(
                "unknown series id {}",
                series_id.0
            )));
        }
        self.commit_visible_range(series_id, VisibleRange::normalized(min, max));
        Ok(())
    }

    /// Recomputes every y range from the data, discarding manual adjustments.
    pub fn reset_visible_ranges(&mut self) -> ChartResult<()> {
        self.ensure_alive()?;
        let len = self.core.model.data.len();
        let ranges: Vec<(SeriesId, VisibleRange)> = self
            .core
            .model
            .data
            .y_series
            .iter()
            .map(|series| (series.id, data_visible_range(series, len)))
            .collect();
        for (series_id, range) in ranges {
            self.commit_visible_range(series_id, range);
        }
        Ok(())
    }

    /// Stores a y range, realigns the y markers of its band and publishes it
    /// to the shared keeper when the keeper already tracks the series.
    pub(super) fn commit_visible_range(&mut self, series_id: SeriesId, range: VisibleRange) {
        self.core.model.visible_ranges.insert(series_id, range);
        if let Some(pair) = self.core.model.markers.y_pair_mut(series_id) {
            pair.reset_to_band();
        }
        if let Some(keeper) = &self.core.runtime.synched_min_max {
            keeper.borrow_mut().update_existing(series_id, range);
        }
        debug!(
            series = series_id.0,
            min = range.min,
            max = range.max,
            "visible range changed"
        );
        self.invalidate_layer(LayerId::Series);
    }

    fn apply_value_range(&mut self) {
        let (start, end) = self.core.model.data.x_range().unwrap_or((0.0, 1.0));
        self.core.model.viewport.set_value_range(start, end);
    }

    fn load_visible_ranges(&mut self) {
        let model = &mut self.core.model;
        let len = model.data.len();
        let keeper = self.core.runtime.synched_min_max.as_ref().map(|keeper| keeper.borrow());
        model.visible_ranges = model
            .data
            .y_series
            .iter()
            .map(|series| {
                let range = keeper
                    .as_ref()
                    .and_then(|keeper| keeper.get(series.id))
                    .unwrap_or_else(|| data_visible_range(series, len));
                (series.id, range)
            })
            .collect();
    }

    /// Ends any drag, its autoscroll and a running smooth scroll without
    /// committing them.
    pub(super) fn cancel_interaction(&mut self) {
        self.stop_autoscroll();
        self.stop_smooth_scroll();
        self.core.model.interaction.end_drag();
        self.core.model.interaction.set_context_menu(None);
        self.core.presentation.render_cache.set_pan_offset(0.0);
    }
}

/// Y range from the data, narrowed by the series' min/max overrides.
fn data_visible_range(series: &YSeries, len: usize) -> VisibleRange {
    let (min, max) = series.data_range(len).unwrap_or((0.0, 1.0));
    VisibleRange::normalized(
        series.min_override.unwrap_or(min),
        series.max_override.unwrap_or(max),
    )
}

fn warn_on_length_mismatch(data: &ChartDataModel) {
    for series in &data.y_series {
        let low_len = series.low.as_ref().map(Vec::len);
        if series.high.len() != data.len() || low_len.is_some_and(|low| low != data.len()) {
            warn!(
                series = series.id.0,
                y_len = series.high.len(),
                x_len = data.len(),
                "y values length differs from x values; missing samples are skipped"
            );
        }
    }
}
