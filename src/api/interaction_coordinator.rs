use tracing::{debug, trace};

use crate::core::{DevicePoint, LinearScale, MarkerSet};
use crate::error::ChartResult;
use crate::extensions::{HoveredValueChanged, OverlayRangeMoved, PointDoubleClicked, PointSelected};
use crate::interaction::{
    ContextMenuState, DragSession, DragTarget, InteractionMode, PointerButton,
};
use crate::render::{DrawingSurface, LayerId};

use super::autoscroll_coordinator::AutoscrollCoordinator;
use super::chart_runtime::EngineTask;
use super::{ChartEngine, MarkerCoordinator, OverlayRange, Selection};

/// Pointer travel below which a pan grab still counts as a click.
const CLICK_SLOP_PX: f64 = 3.0;

/// Routes pointer input through the drag modes in priority order.
pub(super) struct InteractionCoordinator;

impl InteractionCoordinator {
    fn primary_down<S: DrawingSurface>(engine: &mut ChartEngine<S>, position: DevicePoint) {
        engine.ensure_hit_index();
        let config = engine.core.behavior;
        let model = &engine.core.model;
        let (x, y) = (position.x, position.y);

        if let Some(kind) = model
            .markers
            .hit_range_marker(x, model.height(), config.marker_hit_margin_px)
        {
            let line = model
                .markers
                .marker(kind)
                .map_or(x, |marker| marker.device_position as f64);
            let session = DragSession::new(
                InteractionMode::DraggingXMarker,
                Some(DragTarget::XMarker(kind)),
                position,
            )
            .with_click_offset(x - line);
            Self::begin(engine, session);
            return;
        }

        let zoomed = model.viewport.is_zoomed();
        if config.pan_anywhere_when_zoomed && zoomed {
            Self::begin_pan(engine, position, None);
            return;
        }

        if config.show_y_markers {
            if let Some((series_id, kind)) =
                model
                    .markers
                    .hit_y_marker(x, y, model.visible_width(), config.marker_hit_margin_px)
            {
                let line = model
                    .markers
                    .y_pair(series_id)
                    .and_then(|pair| pair.get(kind))
                    .map_or(y, |marker| marker.device_position as f64);
                let session = DragSession::new(
                    InteractionMode::DraggingYMarker,
                    Some(DragTarget::YMarker { series_id, kind }),
                    position,
                )
                .with_click_offset(y - line);
                Self::begin(engine, session);
                return;
            }
        }

        if let Some(range) = model.overlay_range {
            if overlay_contains(engine, range, x, config.marker_hit_margin_px) {
                let session = DragSession::new(
                    InteractionMode::DraggingOverlayRangeMarker,
                    Some(DragTarget::OverlayRange),
                    position,
                )
                .with_start_indices(range.start_index, range.end_index);
                Self::begin(engine, session);
                return;
            }
        }

        let hit = model.hit_index.resolve(x, y);
        if let Some(hit) = hit.filter(|hit| hit.is_bar) {
            Self::select(
                engine,
                Selection {
                    series_id: Some(hit.series_id),
                    value_index: hit.value_index,
                },
            );
            return;
        }

        let point = hit.map(|hit| Selection {
            series_id: None,
            value_index: hit.value_index,
        });
        if zoomed {
            Self::begin_pan(engine, position, point);
        } else if let Some(point) = point {
            Self::select(engine, point);
        }
    }

    fn begin<S: DrawingSurface>(engine: &mut ChartEngine<S>, session: DragSession) {
        debug!(mode = ?session.mode, target = ?session.target, "drag started");
        engine.stop_smooth_scroll();
        engine.core.model.interaction.begin_drag(session);
        engine.invalidate_layer(LayerId::Overlay);
    }

    fn begin_pan<S: DrawingSurface>(
        engine: &mut ChartEngine<S>,
        position: DevicePoint,
        click: Option<Selection>,
    ) {
        engine.stop_smooth_scroll();
        engine.core.model.pending_click = click;
        engine.core.presentation.render_cache.set_pan_offset(0.0);
        let session = DragSession::new(InteractionMode::DraggingChartPan, None, position);
        debug!(x = position.x, "chart pan started");
        engine.core.model.interaction.begin_drag(session);
    }

    fn secondary_down<S: DrawingSurface>(engine: &mut ChartEngine<S>, position: DevicePoint) {
        engine.ensure_hit_index();
        let model = &engine.core.model;
        let state = ContextMenuState {
            position,
            value_index: model
                .hit_index
                .resolve(position.x, position.y)
                .map(|hit| hit.value_index),
            hovered_marker: model.markers.hit_range_marker(
                position.x,
                model.height(),
                engine.core.behavior.marker_hit_margin_px,
            ),
        };
        trace!(?state, "context menu state captured");
        engine.core.model.interaction.set_context_menu(Some(state));
    }

    pub(super) fn select<S: DrawingSurface>(engine: &mut ChartEngine<S>, selection: Selection) {
        engine.core.model.selection = Some(selection);
        if selection.series_id.is_some() {
            let bars = &mut engine.core.model.selected_bars;
            bars.clear();
            bars.insert(selection.value_index);
        }
        engine.invalidate_layer(LayerId::Overlay);
        engine
            .core
            .runtime
            .listeners
            .point_selected
            .dispatch(&PointSelected {
                series_id: selection.series_id,
                value_index: selection.value_index,
            });
    }

    fn hover<S: DrawingSurface>(engine: &mut ChartEngine<S>, position: DevicePoint) {
        engine.ensure_hit_index();
        let margin = engine.core.behavior.marker_hit_margin_px;
        let model = &mut engine.core.model;
        let value_index = model
            .hit_index
            .resolve(position.x, position.y)
            .map(|hit| hit.value_index);
        let hovered_marker = model
            .markers
            .hit_range_marker(position.x, model.height(), margin);
        let marker_changed = model.interaction.set_hovered_marker(hovered_marker);
        let hover_changed = model
            .markers
            .set_hover(value_index, &model.viewport, &model.data.x);

        if hover_changed || marker_changed {
            engine.invalidate_layer(LayerId::Overlay);
        }
        if hover_changed {
            engine
                .core
                .runtime
                .listeners
                .hovered_value_changed
                .dispatch(&HoveredValueChanged { value_index });
        }
    }

    fn drag_move<S: DrawingSurface>(engine: &mut ChartEngine<S>, drag: DragSession) {
        match drag.target {
            Some(DragTarget::XMarker(kind)) => {
                let model = &mut engine.core.model;
                let line_x = drag.line_x().clamp(0.0, (model.visible_width() - 1.0).max(0.0));
                if let Some(index) =
                    model
                        .markers
                        .drag_range_marker(kind, line_x, &model.viewport, &model.data.x)
                {
                    trace!(?kind, index, "range marker dragged");
                    engine.invalidate_layer(LayerId::Overlay);
                }
                AutoscrollCoordinator::update(engine);
            }
            Some(DragTarget::YMarker { series_id, kind }) => {
                if let Some(pair) = engine.core.model.markers.y_pair_mut(series_id) {
                    pair.move_to(kind, drag.current_device_pos.y - drag.click_offset);
                    engine.invalidate_layer(LayerId::Overlay);
                }
            }
            Some(DragTarget::OverlayRange) => Self::drag_overlay(engine, drag),
            None => {
                let viewport = &engine.core.model.viewport;
                let left = viewport.left_border() as f64;
                let min_offset = left - viewport.max_left_border() as f64;
                let offset = drag.delta_x().clamp(min_offset, left);
                engine.core.presentation.render_cache.set_pan_offset(offset);
            }
        }
    }

    fn drag_overlay<S: DrawingSurface>(engine: &mut ChartEngine<S>, drag: DragSession) {
        let model = &engine.core.model;
        let quantize = |x: f64| MarkerSet::quantize(x, &model.viewport, &model.data.x);
        let (Some(from), Some(to)) = (
            quantize(drag.start_device_pos.x),
            quantize(drag.current_device_pos.x),
        ) else {
            return;
        };
        let (start, end) = drag.start_indices;
        let last = model.data.len().saturating_sub(1) as i64;
        let shift = (to as i64 - from as i64).clamp(-(start as i64), last - end as i64);
        let moved = OverlayRange::new(
            (start as i64 + shift) as usize,
            (end as i64 + shift) as usize,
        );
        if engine.core.model.overlay_range != Some(moved) {
            engine.core.model.overlay_range = Some(moved);
            engine.invalidate_layer(LayerId::Overlay);
        }
    }

    fn finish_drag<S: DrawingSurface>(engine: &mut ChartEngine<S>, drag: DragSession) {
        debug!(mode = ?drag.mode, "drag finished");
        match drag.target {
            Some(DragTarget::XMarker(_)) => {
                engine.stop_autoscroll();
                engine.invalidate_layer(LayerId::Overlay);
                MarkerCoordinator::fire_moved(engine);
                if engine.core.behavior.auto_zoom_to_markers {
                    engine.core.runtime.tasks.schedule(0, EngineTask::ZoomToMarkers);
                }
            }
            Some(DragTarget::YMarker { series_id, .. }) => {
                let model = &engine.core.model;
                let range = model
                    .visible_ranges
                    .get(&series_id)
                    .and_then(|range| LinearScale::from_range(*range).ok())
                    .zip(model.markers.y_pair(series_id))
                    .map(|(scale, pair)| pair.resolve_range(scale));
                if let Some(range) = range {
                    engine.commit_visible_range(series_id, range);
                }
            }
            Some(DragTarget::OverlayRange) => {
                engine.invalidate_layer(LayerId::Overlay);
                if let Some(range) = engine.core.model.overlay_range {
                    engine
                        .core
                        .runtime
                        .listeners
                        .overlay_range_moved
                        .dispatch(&OverlayRangeMoved {
                            start_index: range.start_index,
                            end_index: range.end_index,
                        });
                }
            }
            None => {
                let offset = engine.core.presentation.render_cache.pan_offset();
                engine.core.presentation.render_cache.set_pan_offset(0.0);
                let click = engine.core.model.pending_click.take();
                if drag.delta_x().abs() < CLICK_SLOP_PX {
                    if let Some(click) = click {
                        Self::select(engine, click);
                    }
                } else {
                    let applied = engine.apply_pan(-(offset.round() as i64));
                    debug!(applied, "chart pan committed");
                }
            }
        }
    }
}

fn overlay_contains<S: DrawingSurface>(
    engine: &ChartEngine<S>,
    range: OverlayRange,
    x: f64,
    margin: f64,
) -> bool {
    let model = &engine.core.model;
    let device = |index: usize| {
        model
            .data
            .x
            .value(index)
            .map(|value| model.viewport.value_to_device(value))
    };
    match (device(range.start_index), device(range.end_index)) {
        (Some(start), Some(end)) => x >= start - margin && x <= end + margin,
        _ => false,
    }
}

impl<S: DrawingSurface> ChartEngine<S> {
    /// Pointer press in device coordinates.
    ///
    /// The primary button starts the highest-priority drag under the pointer
    /// or selects the hit point; the secondary button only records state for a
    /// context menu; the back button fits the chart to its content.
    pub fn pointer_down(&mut self, x: f64, y: f64, button: PointerButton) -> ChartResult<()> {
        self.ensure_alive()?;
        let Some(position) = finite_point(x, y) else {
            return Ok(());
        };
        self.core.model.interaction.on_pointer_move(position);
        if !self.core.model.has_graph() {
            return Ok(());
        }
        match button {
            PointerButton::Primary => {
                if self.core.model.interaction.drag().is_some() {
                    self.cancel_interaction();
                }
                InteractionCoordinator::primary_down(self, position);
            }
            PointerButton::Secondary => InteractionCoordinator::secondary_down(self, position),
            PointerButton::Back => {
                self.fit_to_content()?;
            }
            PointerButton::Middle => {}
        }
        Ok(())
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> ChartResult<()> {
        self.ensure_alive()?;
        let Some(position) = finite_point(x, y) else {
            return Ok(());
        };
        self.core.model.interaction.on_pointer_move(position);
        if !self.core.model.has_graph() {
            return Ok(());
        }
        match self.core.model.interaction.drag() {
            Some(drag) => InteractionCoordinator::drag_move(self, drag),
            None => InteractionCoordinator::hover(self, position),
        }
        Ok(())
    }

    /// Ends the live drag, committing what it moved.
    pub fn pointer_up(&mut self, x: f64, y: f64) -> ChartResult<()> {
        self.ensure_alive()?;
        let Some(position) = finite_point(x, y) else {
            return Ok(());
        };
        self.core.model.interaction.on_pointer_move(position);
        if let Some(drag) = self.core.model.interaction.end_drag() {
            InteractionCoordinator::finish_drag(self, drag);
        }
        Ok(())
    }

    /// Pointer left the widget: hover and marker highlight are cleared. A
    /// live drag keeps the pointer.
    pub fn pointer_leave(&mut self) -> ChartResult<()> {
        self.ensure_alive()?;
        let had_marker = self.core.model.interaction.hovered_marker().is_some();
        self.core.model.interaction.on_pointer_leave();
        if self.core.model.interaction.drag().is_some() {
            return Ok(());
        }
        let model = &mut self.core.model;
        let hover_changed = model.markers.set_hover(None, &model.viewport, &model.data.x);
        if hover_changed || had_marker {
            self.invalidate_layer(LayerId::Overlay);
        }
        if hover_changed {
            self.core
                .runtime
                .listeners
                .hovered_value_changed
                .dispatch(&HoveredValueChanged { value_index: None });
        }
        Ok(())
    }

    /// Double click: reports a hit bar, otherwise zooms in at `x`.
    pub fn double_click(&mut self, x: f64, y: f64) -> ChartResult<()> {
        self.ensure_alive()?;
        if finite_point(x, y).is_none() || !self.core.model.has_graph() {
            return Ok(());
        }
        self.ensure_hit_index();
        if let Some(hit) = self.core.model.hit_index.resolve_bar(x, y) {
            self.core
                .runtime
                .listeners
                .point_double_clicked
                .dispatch(&PointDoubleClicked {
                    series_id: hit.series_id,
                    value_index: hit.value_index,
                });
            return Ok(());
        }
        self.apply_zoom(Some(x), self.core.behavior.zoom_factor);
        Ok(())
    }

    /// Abandons the live drag without committing it.
    pub fn cancel_drag(&mut self) -> ChartResult<bool> {
        self.ensure_alive()?;
        if self.core.model.interaction.drag().is_none() {
            return Ok(false);
        }
        self.cancel_interaction();
        self.core.model.pending_click = None;
        self.core.model.reposition_markers();
        for pair in self.core.model.markers.y_pairs_mut() {
            pair.reset_to_band();
        }
        debug!("drag cancelled");
        self.invalidate_layer(LayerId::Overlay);
        Ok(true)
    }

    /// Sets or clears the selected sample without notifying listeners.
    pub fn set_selection(&mut self, selection: Option<Selection>) -> ChartResult<()> {
        self.ensure_alive()?;
        let data = &self.core.model.data;
        self.core.model.selection = selection
            .filter(|_| !data.is_empty())
            .map(|selection| Selection {
                series_id: selection.series_id,
                value_index: data.clamp_index(selection.value_index),
            });
        self.invalidate_layer(LayerId::Overlay);
        Ok(())
    }
}

fn finite_point(x: f64, y: f64) -> Option<DevicePoint> {
    if x.is_finite() && y.is_finite() {
        Some(DevicePoint::new(x, y))
    } else {
        trace!(x, y, "non-finite pointer position ignored");
        None
    }
}
