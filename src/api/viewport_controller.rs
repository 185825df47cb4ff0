use tracing::debug;

use crate::core::{CanvasSize, SynchConfiguration};
use crate::error::{ChartError, ChartResult};
use crate::render::{DrawingSurface, LayerId};

use super::{ChartEngine, MarkerCoordinator, ZoomParts};

impl<S: DrawingSurface> ChartEngine<S> {
    /// Zooms in by the configured factor around `pivot_x`, or around the
    /// last zoom pivot when `None`.
    pub fn zoom_in(&mut self, pivot_x: Option<f64>) -> ChartResult<bool> {
        self.ensure_alive()?;
        Ok(self.apply_zoom(pivot_x, self.core.behavior.zoom_factor))
    }

    pub fn zoom_out(&mut self, pivot_x: Option<f64>) -> ChartResult<bool> {
        self.ensure_alive()?;
        Ok(self.apply_zoom(pivot_x, 1.0 / self.core.behavior.zoom_factor))
    }

    /// Multiplies the zoom ratio by `factor` (`> 1` zooms in).
    pub fn zoom_by(&mut self, factor: f64, pivot_x: Option<f64>) -> ChartResult<bool> {
        self.ensure_alive()?;
        if !factor.is_finite() || factor <= 0.0 {
            return Err(ChartError::InvalidData(
                "zoom factor must be finite and > 0".to_owned(),
            ));
        }
        Ok(self.apply_zoom(pivot_x, factor))
    }

    /// Sets an absolute zoom ratio. Ratios below one snap to the unzoomed state.
    pub fn set_zoom_ratio(&mut self, zoom_ratio: f64, pivot_x: Option<f64>) -> ChartResult<bool> {
        self.ensure_alive()?;
        if !zoom_ratio.is_finite() || zoom_ratio <= 0.0 {
            return Err(ChartError::InvalidData(
                "zoom ratio must be finite and > 0".to_owned(),
            ));
        }
        self.release_zoom_state();
        let before = self.core.model.viewport.state();
        self.core.model.viewport.set_zoom_ratio(zoom_ratio, pivot_x);
        Ok(self.after_viewport_change(before))
    }

    /// Zooms so the samples `[start_index, end_index]` fill the viewport.
    pub fn zoom_to_index_range(&mut self, start_index: usize, end_index: usize) -> ChartResult<bool> {
        self.ensure_alive()?;
        let x = &self.core.model.data.x;
        let (Some(start), Some(end)) = (
            x.value(self.core.model.data.clamp_index(start_index)),
            x.value(self.core.model.data.clamp_index(end_index)),
        ) else {
            return Ok(false);
        };
        self.release_zoom_state();
        let before = self.core.model.viewport.state();
        self.core.model.viewport.zoom_to_range(start, end);
        Ok(self.after_viewport_change(before))
    }

    pub fn fit_to_content(&mut self) -> ChartResult<bool> {
        self.ensure_alive()?;
        self.release_zoom_state();
        let before = self.core.model.viewport.state();
        self.core.model.viewport.fit_to_content();
        Ok(self.after_viewport_change(before))
    }

    /// Scrolls by `delta_px` (positive moves the content left). Returns the
    /// applied delta after clamping to the virtual content.
    pub fn pan_by(&mut self, delta_px: i64) -> ChartResult<i64> {
        self.ensure_alive()?;
        Ok(self.apply_pan(delta_px))
    }

    pub fn set_left_border(&mut self, left_border: i64) -> ChartResult<()> {
        self.ensure_alive()?;
        self.stop_smooth_scroll();
        let before = self.core.model.viewport.state();
        self.core.model.viewport.set_left_border(left_border);
        self.after_viewport_change(before);
        Ok(())
    }

    /// Splits the content into `parts` pages and shows page `position`.
    ///
    /// The virtual width is 0.8 × `parts` visible widths, so the edges of
    /// the neighbouring pages stay visible. `position` is clamped to the last
    /// page. The page zoom survives resizes and ends with any other zoom.
    pub fn zoom_with_parts(&mut self, parts: u32, position: u32) -> ChartResult<bool> {
        self.ensure_alive()?;
        if parts == 0 {
            return Err(ChartError::InvalidData(
                "zoom parts must be > 0".to_owned(),
            ));
        }
        self.stop_smooth_scroll();
        let position = position.min(parts - 1);
        self.core.model.zoom_parts = (parts > 1).then_some(ZoomParts { parts, position });
        let before = self.core.model.viewport.state();
        self.core.model.viewport.zoom_with_parts(parts, position);
        debug!(parts, position, "zoomed to part");
        Ok(self.after_viewport_change(before))
    }

    #[must_use]
    pub fn zoom_parts(&self) -> Option<ZoomParts> {
        self.core.model.zoom_parts
    }

    /// Shows the next page of a page zoom; `false` on the last page or
    /// without a page zoom.
    pub fn move_to_next_part(&mut self) -> ChartResult<bool> {
        self.ensure_alive()?;
        match self.core.model.zoom_parts {
            Some(current) if current.position + 1 < current.parts => {
                self.zoom_with_parts(current.parts, current.position + 1)
            }
            _ => Ok(false),
        }
    }

    pub fn move_to_previous_part(&mut self) -> ChartResult<bool> {
        self.ensure_alive()?;
        match self.core.model.zoom_parts {
            Some(current) if current.position > 0 => {
                self.zoom_with_parts(current.parts, current.position - 1)
            }
            _ => Ok(false),
        }
    }

    #[must_use]
    pub fn zoom_pivot_ratio(&self) -> f64 {
        self.core.model.viewport.zoom_pivot_ratio()
    }

    /// Applies a new canvas size.
    ///
    /// Zoom ratio and relative scroll position are kept, or the page zoom is
    /// re-applied to the new width. A zero-area size is accepted but nothing
    /// is drawn until a usable size arrives.
    pub fn resize(&mut self, size: CanvasSize) -> ChartResult<()> {
        self.ensure_alive()?;
        if size == self.core.model.size {
            return Ok(());
        }
        self.stop_autoscroll();
        self.stop_smooth_scroll();
        let before = self.core.model.viewport.state();
        self.core.model.size = size;
        self.core.behavior.size = size;
        self.core.model.viewport.resize(size.width);
        if let Some(parts) = self.core.model.zoom_parts {
            self.core
                .model
                .viewport
                .zoom_with_parts(parts.parts, parts.position);
        }
        self.relayout_graphs();
        self.core.model.reposition_markers();
        debug!(width = size.width, height = size.height, "chart resized");
        self.invalidate_all();
        self.after_viewport_change(before);
        Ok(())
    }

    /// Zoom and marker state to mirror onto a companion chart.
    #[must_use]
    pub fn synch_configuration(&self) -> SynchConfiguration {
        let model = &self.core.model;
        let marker_ratio = |index: usize| {
            model
                .data
                .x
                .value(index)
                .map_or(0.0, |value| model.viewport.position_ratio(value))
        };
        SynchConfiguration {
            zoom_ratio: model.viewport.zoom_ratio(),
            left_border_ratio: model.viewport.left_border_ratio(),
            left_marker_ratio: marker_ratio(model.markers.left().value_index),
            right_marker_ratio: marker_ratio(model.markers.right().value_index),
        }
    }

    /// Shows the same section as the chart that produced `config`.
    pub fn apply_synch_configuration(&mut self, config: SynchConfiguration) -> ChartResult<()> {
        self.ensure_alive()?;
        if [
            config.zoom_ratio,
            config.left_border_ratio,
            config.left_marker_ratio,
            config.right_marker_ratio,
        ]
        .iter()
        .any(|value| !value.is_finite())
        {
            return Err(ChartError::InvalidData(
                "synch configuration values must be finite".to_owned(),
            ));
        }
        self.release_zoom_state();
        let before = self.core.model.viewport.state();
        self.core
            .model
            .viewport
            .set_zoom_ratio(config.zoom_ratio.max(1.0), None);
        self.core
            .model
            .viewport
            .set_left_border_ratio(config.left_border_ratio);

        let (start, end) = self.core.model.viewport.value_range();
        let to_index = |ratio: f64| self.core.model.data.x.nearest_index(start + ratio * (end - start));
        let left = to_index(config.left_marker_ratio);
        let right = to_index(config.right_marker_ratio);
        let left_kind = self.core.model.markers.left().kind;
        let right_kind = self.core.model.markers.right().kind;
        if let (Some(left), Some(right)) = (left, right) {
            MarkerCoordinator::place(self, left_kind, left);
            MarkerCoordinator::place(self, right_kind, right);
        }
        if !self.after_viewport_change(before) {
            self.invalidate_layer(LayerId::Overlay);
        }
        Ok(())
    }

    /// Zoom step shared by keyboard, wheel, double click and the public API.
    pub(super) fn apply_zoom(&mut self, pivot_x: Option<f64>, factor: f64) -> bool {
        self.release_zoom_state();
        let before = self.core.model.viewport.state();
        let viewport = &mut self.core.model.viewport;
        if factor >= 1.0 {
            viewport.zoom_in(pivot_x, factor);
        } else {
            viewport.zoom_out(pivot_x, 1.0 / factor);
        }
        let changed = self.after_viewport_change(before);
        if changed && self.core.behavior.auto_move_markers_to_border {
            MarkerCoordinator::move_to_border(self);
        }
        changed
    }

    pub(super) fn apply_pan(&mut self, delta_px: i64) -> i64 {
        self.stop_smooth_scroll();
        let before = self.core.model.viewport.state();
        let applied = self.core.model.viewport.pan_by(delta_px);
        self.after_viewport_change(before);
        applied
    }

    /// Ends the animated scroll and the page zoom ahead of another zoom.
    pub(super) fn release_zoom_state(&mut self) {
        self.stop_smooth_scroll();
        self.core.model.zoom_parts = None;
    }
}
