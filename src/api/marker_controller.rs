use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{MarkerKind, MarkerSet};
use crate::error::{ChartError, ChartResult};
use crate::extensions::MarkerMoved;
use crate::render::{DrawingSurface, LayerId};

use super::{ChartEngine, OverlayRange};

/// Distance kept between the viewport edges and markers moved to the border.
const BORDER_INSET_PX: f64 = 2.0;

/// How `ChartEngine::set_marker_position` treats the viewport and listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerPositionOptions {
    /// Center the viewport on the marker.
    pub center_viewport: bool,
    /// Scroll just enough to bring an off-screen marker into view.
    pub reveal: bool,
    pub fire_event: bool,
}

impl Default for MarkerPositionOptions {
    fn default() -> Self {
        Self {
            center_viewport: false,
            reveal: true,
            fire_event: true,
        }
    }
}

impl MarkerPositionOptions {
    /// Moves the marker only: no scrolling, no listener notification.
    #[must_use]
    pub fn silent() -> Self {
        Self {
            center_viewport: false,
            reveal: false,
            fire_event: false,
        }
    }

    #[must_use]
    pub fn centered(mut self) -> Self {
        self.center_viewport = true;
        self
    }
}

pub(super) struct MarkerCoordinator;

impl MarkerCoordinator {
    /// Places a range marker on a clamped index without side effects.
    pub(super) fn place<S: DrawingSurface>(
        engine: &mut ChartEngine<S>,
        kind: MarkerKind,
        value_index: usize,
    ) {
        let model = &mut engine.core.model;
        model
            .markers
            .set_range_index(kind, value_index, &model.viewport, &model.data.x);
    }

    pub(super) fn set_position<S: DrawingSurface>(
        engine: &mut ChartEngine<S>,
        kind: MarkerKind,
        value_index: usize,
        options: MarkerPositionOptions,
    ) {
        Self::place(engine, kind, value_index);
        if options.center_viewport {
            Self::center_on(engine, kind);
        } else if options.reveal {
            Self::reveal(engine, kind);
        }
        engine.invalidate_layer(LayerId::Overlay);
        if options.fire_event {
            Self::fire_moved(engine);
        }
    }

    fn center_on<S: DrawingSurface>(engine: &mut ChartEngine<S>, kind: MarkerKind) {
        let Some(marker) = engine.core.model.markers.marker(kind) else {
            return;
        };
        let delta = marker.device_position - engine.core.model.viewport.visible_width() / 2;
        engine.apply_pan(delta);
    }

    /// Scrolls the minimal distance that brings the marker into view.
    fn reveal<S: DrawingSurface>(engine: &mut ChartEngine<S>, kind: MarkerKind) {
        let Some(marker) = engine.core.model.markers.marker(kind) else {
            return;
        };
        let position = marker.device_position;
        let visible = engine.core.model.viewport.visible_width();
        let delta = if position < 0 {
            position
        } else if position >= visible {
            position - visible + 1
        } else {
            0
        };
        if delta != 0 {
            engine.apply_pan(delta);
        }
    }

    pub(super) fn fire_moved<S: DrawingSurface>(engine: &ChartEngine<S>) {
        let (left_index, right_index) = engine.core.model.markers.range().index_span();
        engine
            .core
            .runtime
            .listeners
            .marker_moved
            .dispatch(&MarkerMoved {
                left_index,
                right_index,
            });
    }

    /// Puts the left and right marker just inside the viewport edges.
    pub(super) fn move_to_border<S: DrawingSurface>(engine: &mut ChartEngine<S>) {
        let model = &engine.core.model;
        if !model.has_graph() {
            return;
        }
        let right_edge = (model.visible_width() - 1.0 - BORDER_INSET_PX).max(0.0);
        let left = MarkerSet::quantize(BORDER_INSET_PX, &model.viewport, &model.data.x);
        let right = MarkerSet::quantize(right_edge, &model.viewport, &model.data.x);
        let (Some(left), Some(right)) = (left, right) else {
            return;
        };
        let left_kind = model.markers.left().kind;
        let right_kind = model.markers.right().kind;
        Self::place(engine, left_kind, left);
        Self::place(engine, right_kind, right);
        engine.invalidate_layer(LayerId::Overlay);
        Self::fire_moved(engine);
    }

    /// Zooms so the span between the range markers fills the viewport.
    pub(super) fn zoom_to_markers<S: DrawingSurface>(engine: &mut ChartEngine<S>) -> bool {
        let model = &engine.core.model;
        let (left, right) = model.markers.range().index_span();
        let (Some(start), Some(end)) = (model.data.x.value(left), model.data.x.value(right)) else {
            return false;
        };
        let before = model.viewport.state();
        engine.release_zoom_state();
        engine.core.model.viewport.zoom_to_range(start, end);
        let changed = engine.after_viewport_change(before);
        debug!(left, right, changed, "zoomed to range markers");
        changed
    }
}

impl<S: DrawingSurface> ChartEngine<S> {
    #[must_use]
    pub fn left_marker_index(&self) -> usize {
        self.core.model.markers.left().value_index
    }

    #[must_use]
    pub fn right_marker_index(&self) -> usize {
        self.core.model.markers.right().value_index
    }

    /// Value index of one range marker, regardless of its on-screen side.
    #[must_use]
    pub fn marker_index(&self, kind: MarkerKind) -> Option<usize> {
        self.core
            .model
            .markers
            .marker(kind)
            .map(|marker| marker.value_index)
    }

    /// Moves a range marker; the index is clamped into the series.
    pub fn set_marker_position(
        &mut self,
        kind: MarkerKind,
        value_index: usize,
        options: MarkerPositionOptions,
    ) -> ChartResult<()> {
        self.ensure_alive()?;
        if !matches!(kind, MarkerKind::RangeA | MarkerKind::RangeB) {
            return Err(ChartError::InvalidData(format!(
                "marker {kind:?} is not a range marker"
            )));
        }
        if !self.core.model.has_graph() {
            return Ok(());
        }
        MarkerCoordinator::set_position(self, kind, value_index, options);
        Ok(())
    }

    pub fn move_markers_to_border(&mut self) -> ChartResult<()> {
        self.ensure_alive()?;
        MarkerCoordinator::move_to_border(self);
        Ok(())
    }

    /// Moves the left marker to the sample captured by the last secondary click.
    pub fn move_left_marker_here(&mut self) -> ChartResult<bool> {
        self.ensure_alive()?;
        let kind = self.core.model.markers.left().kind;
        Ok(self.move_marker_to_context_index(kind))
    }

    pub fn move_right_marker_here(&mut self) -> ChartResult<bool> {
        self.ensure_alive()?;
        let kind = self.core.model.markers.right().kind;
        Ok(self.move_marker_to_context_index(kind))
    }

    fn move_marker_to_context_index(&mut self, kind: MarkerKind) -> bool {
        let Some(value_index) = self
            .core
            .model
            .interaction
            .context_menu()
            .and_then(|menu| menu.value_index)
        else {
            return false;
        };
        MarkerCoordinator::set_position(self, kind, value_index, MarkerPositionOptions::default());
        true
    }

    pub fn zoom_to_markers(&mut self) -> ChartResult<bool> {
        self.ensure_alive()?;
        Ok(MarkerCoordinator::zoom_to_markers(self))
    }

    /// Highlights an index span, or clears it with `None`.
    pub fn set_overlay_range(&mut self, range: Option<OverlayRange>) -> ChartResult<()> {
        self.ensure_alive()?;
        let data = &self.core.model.data;
        self.core.model.overlay_range = range.filter(|_| !data.is_empty()).map(|range| {
            OverlayRange::new(
                data.clamp_index(range.start_index),
                data.clamp_index(range.end_index),
            )
        });
        self.invalidate_layer(LayerId::Overlay);
        Ok(())
    }

    /// Mirrors a hovered sample, e.g. from a companion chart or a map.
    ///
    /// An index without a focus rectangle moves to the nearest rendered one.
    /// Listeners are not notified.
    pub fn set_hover_index(&mut self, value_index: Option<usize>) -> ChartResult<()> {
        self.ensure_alive()?;
        if !self.core.model.has_graph() {
            return Ok(());
        }
        self.ensure_hit_index();
        let model = &mut self.core.model;
        let value_index = value_index.map(|index| {
            let index = model.data.clamp_index(index);
            model.hit_index.nearest_with_rect(0, index).unwrap_or(index)
        });
        if model.markers.set_hover(value_index, &model.viewport, &model.data.x) {
            self.invalidate_layer(LayerId::Overlay);
        }
        Ok(())
    }

    #[must_use]
    pub fn hover_index(&self) -> Option<usize> {
        self.core
            .model
            .markers
            .hover()
            .map(|marker| marker.value_index)
    }
}
