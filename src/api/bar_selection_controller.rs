use std::collections::BTreeSet;

use tracing::debug;

use crate::error::ChartResult;
use crate::render::{DrawingSurface, LayerId};

use super::interaction_coordinator::InteractionCoordinator;
use super::smooth_scroll_coordinator::SmoothScrollCoordinator;
use super::{ChartEngine, Selection};

impl<S: DrawingSurface> ChartEngine<S> {
    /// Highlights several bars at once without notifying listeners.
    ///
    /// Indices past the data are ignored. A zoomed chart scrolls smoothly
    /// until the first selected bar is centered, which also ends a page zoom.
    pub fn set_selected_bars(&mut self, indices: &[usize]) -> ChartResult<()> {
        self.ensure_alive()?;
        let len = self.core.model.data.len();
        let bars: BTreeSet<usize> = indices.iter().copied().filter(|index| *index < len).collect();
        debug!(count = bars.len(), "selected bars replaced");
        let first = bars.first().copied();
        self.core.model.selected_bars = bars;
        self.core.model.zoom_parts = None;
        if let Some(index) = first {
            self.center_bar_smoothly(index);
        }
        self.invalidate_layer(LayerId::Overlay);
        Ok(())
    }

    #[must_use]
    pub fn selected_bars(&self) -> &BTreeSet<usize> {
        &self.core.model.selected_bars
    }

    /// Selects the bar after the first selected one, wrapping to the first
    /// bar, and reports it as a point selection.
    pub fn select_next_bar(&mut self) -> ChartResult<Option<usize>> {
        self.ensure_alive()?;
        let len = self.core.model.data.len();
        let next = self
            .core
            .model
            .selected_bars
            .first()
            .copied()
            .map_or(0, |index| (index + 1) % len.max(1));
        Ok(self.select_bar(next))
    }

    /// Selects the bar before the first selected one, wrapping to the last bar.
    pub fn select_previous_bar(&mut self) -> ChartResult<Option<usize>> {
        self.ensure_alive()?;
        let len = self.core.model.data.len();
        let previous = match self.core.model.selected_bars.first().copied() {
            None => 0,
            Some(0) => len.saturating_sub(1),
            Some(index) => index - 1,
        };
        Ok(self.select_bar(previous))
    }

    fn select_bar(&mut self, value_index: usize) -> Option<usize> {
        if !self.core.model.has_graph() {
            return None;
        }
        let series_id = self
            .core
            .model
            .data
            .y_series
            .iter()
            .find(|series| series.kind.uses_bar_hit_areas())
            .map(|series| series.id);
        self.core.model.zoom_parts = None;
        self.center_bar_smoothly(value_index);
        InteractionCoordinator::select(
            self,
            Selection {
                series_id,
                value_index,
            },
        );
        if series_id.is_none() {
            self.core.model.selected_bars = BTreeSet::from([value_index]);
        }
        Some(value_index)
    }

    fn center_bar_smoothly(&mut self, value_index: usize) {
        let model = &self.core.model;
        let Some(value) = model.data.x.value(value_index) else {
            return;
        };
        let visible = model.viewport.visible_width();
        let left_border = model.viewport.value_to_virtual(value).round() as i64 - visible / 2;
        SmoothScrollCoordinator::start(self, left_border);
    }
}
