use tracing::trace;

use crate::interaction::{DragTarget, ScrollEdge, TickOutcome, edge_penetration};
use crate::render::{DrawingSurface, LayerId};

use super::{ChartEngine, chart_runtime::EngineTask};

/// Drives edge scrolling while a range marker is dragged past the viewport.
pub(super) struct AutoscrollCoordinator;

impl AutoscrollCoordinator {
    /// Starts or stops the session after the dragged marker moved.
    pub(super) fn update<S: DrawingSurface>(engine: &mut ChartEngine<S>) {
        let Some(drag) = engine.core.model.interaction.drag() else {
            engine.stop_autoscroll();
            return;
        };
        if !matches!(drag.target, Some(DragTarget::XMarker(_))) {
            return;
        }
        let visible = engine.core.model.viewport.visible_width();
        let outside = edge_penetration(drag.line_x(), visible).is_some();
        let active = engine.core.runtime.autoscroll.is_active();
        if outside && !active {
            Self::start(engine);
        } else if !outside && active {
            engine.stop_autoscroll();
        }
    }

    fn start<S: DrawingSurface>(engine: &mut ChartEngine<S>) {
        let generation = engine.core.runtime.autoscroll.begin();
        Self::schedule(engine, generation);
    }

    fn schedule<S: DrawingSurface>(engine: &mut ChartEngine<S>, generation: u64) {
        let interval = engine.core.behavior.autoscroll_interval_ms;
        let handle = engine
            .core
            .runtime
            .tasks
            .schedule(interval, EngineTask::AutoscrollTick { generation });
        engine.core.runtime.autoscroll.set_pending(handle);
    }

    /// One timer tick: scroll by the table step, keep the marker on the edge
    /// and queue the next tick unless the border was reached.
    pub(super) fn tick<S: DrawingSurface>(engine: &mut ChartEngine<S>, generation: u64) {
        if engine.core.runtime.disposed || !engine.core.runtime.autoscroll.is_current(generation) {
            trace!(generation, "stale autoscroll tick ignored");
            return;
        }
        let target = engine.core.model.interaction.drag().and_then(|drag| match drag.target {
            Some(DragTarget::XMarker(kind)) => Some((kind, drag.line_x())),
            _ => None,
        });
        let Some((kind, line_x)) = target else {
            engine.stop_autoscroll();
            return;
        };
        let visible = engine.core.model.viewport.visible_width();
        let Some((edge, depth)) = edge_penetration(line_x, visible) else {
            engine.stop_autoscroll();
            return;
        };

        let before = engine.core.model.viewport.state();
        let outcome = engine
            .core
            .runtime
            .autoscroll
            .step(&mut engine.core.model.viewport, edge, depth);
        engine.after_viewport_change(before);

        let edge_x = match edge {
            ScrollEdge::Left => 0.0,
            ScrollEdge::Right => (visible - 1).max(0) as f64,
        };
        let model = &mut engine.core.model;
        model
            .markers
            .drag_range_marker(kind, edge_x, &model.viewport, &model.data.x);
        engine.invalidate_layer(LayerId::Overlay);

        match outcome {
            TickOutcome::Scrolled(_) => Self::schedule(engine, generation),
            TickOutcome::Halted => engine.stop_autoscroll(),
        }
    }
}

impl<S: DrawingSurface> ChartEngine<S> {
    #[must_use]
    pub fn is_autoscrolling(&self) -> bool {
        self.core.runtime.autoscroll.is_active()
    }

    /// Ends the autoscroll session and drops its queued tick.
    pub(super) fn stop_autoscroll(&mut self) {
        if let Some(handle) = self.core.runtime.autoscroll.cancel() {
            self.core.runtime.tasks.cancel(handle);
        }
    }
}
