use tracing::{debug, trace};

use crate::error::ChartResult;
use crate::render::DrawingSurface;

use super::autoscroll_coordinator::AutoscrollCoordinator;
use super::chart_runtime::EngineTask;
use super::render_coordinator::RenderCoordinator;
use super::smooth_scroll_coordinator::SmoothScrollCoordinator;
use super::{ChartEngine, MarkerCoordinator};

impl<S: DrawingSurface> ChartEngine<S> {
    /// Advances the engine clock to `now_ms` and runs every task due by then.
    ///
    /// Hosts call this from their event loop or frame timer. Tasks scheduled
    /// while running (e.g. the next autoscroll tick) only run once they are
    /// due. Returns the number of tasks executed.
    pub fn run_pending_tasks(&mut self, now_ms: u64) -> ChartResult<usize> {
        self.ensure_alive()?;
        self.core.runtime.tasks.advance_to(now_ms);
        let mut executed = 0;
        while let Some((handle, task)) = self.core.runtime.tasks.pop_due() {
            if self.core.runtime.disposed {
                debug!("dropping deferred tasks of disposed engine");
                self.core.runtime.tasks.clear();
                break;
            }
            trace!(?handle, ?task, "running deferred task");
            self.run_task(task)?;
            executed += 1;
        }
        Ok(executed)
    }

    /// Current engine clock in milliseconds.
    #[must_use]
    pub fn clock_ms(&self) -> u64 {
        self.core.runtime.tasks.now_ms()
    }

    #[must_use]
    pub fn pending_task_count(&self) -> usize {
        self.core.runtime.tasks.len()
    }

    fn run_task(&mut self, task: EngineTask) -> ChartResult<()> {
        match task {
            EngineTask::Recompose { generation } => RenderCoordinator::run_queued(self, generation),
            EngineTask::AutoscrollTick { generation } => {
                AutoscrollCoordinator::tick(self, generation);
                Ok(())
            }
            EngineTask::SmoothScrollTick { generation } => {
                SmoothScrollCoordinator::tick(self, generation);
                Ok(())
            }
            EngineTask::ZoomToMarkers => {
                MarkerCoordinator::zoom_to_markers(self);
                Ok(())
            }
        }
    }
}
