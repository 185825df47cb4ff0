use tracing::trace;

use crate::core::ViewportState;
use crate::error::ChartResult;
use crate::extensions::ViewportResized;
use crate::render::{DrawingSurface, LayerId};

use super::{ChartEngine, chart_runtime::EngineTask};

impl<S: DrawingSurface> ChartEngine<S> {
    /// Dirties `layer` and every layer above it, then queues a recomposition.
    pub(super) fn invalidate_layer(&mut self, layer: LayerId) {
        if layer == LayerId::Series {
            self.core.model.hit_index_stale = true;
        }
        self.core.presentation.render_cache.invalidate(layer);
        self.queue_recompose();
    }

    pub(super) fn invalidate_all(&mut self) {
        self.core.model.hit_index_stale = true;
        self.core.presentation.render_cache.invalidate_all();
        self.queue_recompose();
    }

    /// Asks for a repaint of the dirty layers on the next task pump.
    ///
    /// Repeated requests before `run_pending_tasks` coalesce into one
    /// recomposition. Layers that are not dirty are reused.
    pub fn request_render(&mut self) -> ChartResult<()> {
        self.ensure_alive()?;
        self.queue_recompose();
        Ok(())
    }

    /// Queues one recomposition, superseding any request still queued.
    ///
    /// A zero-area canvas never schedules work.
    pub(super) fn queue_recompose(&mut self) {
        if self.core.runtime.disposed || !self.core.model.size.is_valid() {
            return;
        }
        let generation = self.core.presentation.render_cache.request_render();
        let handle = self
            .core
            .runtime
            .tasks
            .schedule(0, EngineTask::Recompose { generation });
        if let Some(previous) = self
            .core
            .presentation
            .render_cache
            .set_pending_handle(handle)
        {
            self.core.runtime.tasks.cancel(previous);
        }
    }

    /// Common follow-up of every zoom, scroll and resize.
    ///
    /// Returns `false` when the viewport did not actually change.
    pub(super) fn after_viewport_change(&mut self, before: ViewportState) -> bool {
        let state = self.core.model.viewport.state();
        if state == before {
            return false;
        }
        self.core.model.reposition_markers();
        self.invalidate_layer(LayerId::Series);
        trace!(
            zoom_ratio = state.zoom_ratio,
            left_border = state.left_border,
            virtual_width = state.virtual_width,
            "viewport changed"
        );
        self.core
            .runtime
            .listeners
            .viewport_resized
            .dispatch(&ViewportResized { state });
        true
    }
}
