use tracing::trace;

use crate::error::ChartResult;
use crate::interaction::TickOutcome;
use crate::render::DrawingSurface;

use super::{ChartEngine, chart_runtime::EngineTask};

/// Animates programmatic scrolls on the deferred queue.
pub(super) struct SmoothScrollCoordinator;

impl SmoothScrollCoordinator {
    pub(super) fn start<S: DrawingSurface>(engine: &mut ChartEngine<S>, left_border: i64) -> bool {
        let viewport = &engine.core.model.viewport;
        let target = left_border.clamp(0, viewport.max_left_border());
        if target == viewport.left_border() {
            engine.stop_smooth_scroll();
            return false;
        }
        if let Some(handle) = engine.core.runtime.smooth_scroll.cancel() {
            engine.core.runtime.tasks.cancel(handle);
        }
        let generation = engine.core.runtime.smooth_scroll.begin(target);
        Self::schedule(engine, generation);
        true
    }

    fn schedule<S: DrawingSurface>(engine: &mut ChartEngine<S>, generation: u64) {
        let interval = engine.core.behavior.smooth_scroll_interval_ms;
        let handle = engine
            .core
            .runtime
            .tasks
            .schedule(interval, EngineTask::SmoothScrollTick { generation });
        engine.core.runtime.smooth_scroll.set_pending(handle);
    }

    pub(super) fn tick<S: DrawingSurface>(engine: &mut ChartEngine<S>, generation: u64) {
        if engine.core.runtime.disposed || !engine.core.runtime.smooth_scroll.is_current(generation)
        {
            trace!(generation, "stale smooth scroll tick ignored");
            return;
        }
        let step_px = engine.core.behavior.smooth_scroll_step_px;
        let before = engine.core.model.viewport.state();
        let outcome = engine
            .core
            .runtime
            .smooth_scroll
            .step(&mut engine.core.model.viewport, step_px);
        engine.after_viewport_change(before);
        match outcome {
            TickOutcome::Scrolled(0) => engine.stop_smooth_scroll(),
            TickOutcome::Scrolled(_) => Self::schedule(engine, generation),
            TickOutcome::Halted => {}
        }
    }
}

impl<S: DrawingSurface> ChartEngine<S> {
    /// Scrolls to `left_border` in small steps driven by `run_pending_tasks`.
    ///
    /// The target is clamped to the content. Any explicit zoom, pan, resize
    /// or drag ends the animation where it is. Returns `false` when the
    /// viewport already shows the target.
    pub fn scroll_smoothly_to(&mut self, left_border: i64) -> ChartResult<bool> {
        self.ensure_alive()?;
        Ok(SmoothScrollCoordinator::start(self, left_border))
    }

    #[must_use]
    pub fn is_smooth_scrolling(&self) -> bool {
        self.core.runtime.smooth_scroll.is_active()
    }

    pub(super) fn stop_smooth_scroll(&mut self) {
        if let Some(handle) = self.core.runtime.smooth_scroll.cancel() {
            self.core.runtime.tasks.cancel(handle);
        }
    }
}
