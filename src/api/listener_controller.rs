use crate::extensions::{
    HoveredValueChanged, MarkerMoved, OverlayRangeMoved, PointDoubleClicked, PointSelected,
    Subscription, ViewportResized,
};
use crate::render::DrawingSurface;

use super::ChartEngine;

impl<S: DrawingSurface> ChartEngine<S> {
    /// Fired when a drag, keyboard step or API call moved the range markers.
    pub fn on_marker_moved(
        &self,
        callback: impl Fn(&MarkerMoved) + 'static,
    ) -> Subscription<MarkerMoved> {
        self.core.runtime.listeners.marker_moved.subscribe(callback)
    }

    pub fn on_point_selected(
        &self,
        callback: impl Fn(&PointSelected) + 'static,
    ) -> Subscription<PointSelected> {
        self.core.runtime.listeners.point_selected.subscribe(callback)
    }

    /// Fired for pointer hover only; `set_hover_index` stays silent.
    pub fn on_hovered_value_changed(
        &self,
        callback: impl Fn(&HoveredValueChanged) + 'static,
    ) -> Subscription<HoveredValueChanged> {
        self.core
            .runtime
            .listeners
            .hovered_value_changed
            .subscribe(callback)
    }

    pub fn on_viewport_resized(
        &self,
        callback: impl Fn(&ViewportResized) + 'static,
    ) -> Subscription<ViewportResized> {
        self.core.runtime.listeners.viewport_resized.subscribe(callback)
    }

    pub fn on_overlay_range_moved(
        &self,
        callback: impl Fn(&OverlayRangeMoved) + 'static,
    ) -> Subscription<OverlayRangeMoved> {
        self.core
            .runtime
            .listeners
            .overlay_range_moved
            .subscribe(callback)
    }

    pub fn on_point_double_clicked(
        &self,
        callback: impl Fn(&PointDoubleClicked) + 'static,
    ) -> Subscription<PointDoubleClicked> {
        self.core
            .runtime
            .listeners
            .point_double_clicked
            .subscribe(callback)
    }
}
