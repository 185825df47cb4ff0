use crate::core::{DeferredQueue, SharedMinMaxKeeper};
use crate::extensions::ChartListeners;
use crate::interaction::{AutoscrollController, SmoothScroller};

/// Work queued on the engine's deferred task queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum EngineTask {
    /// Coalesced layer recomposition; stale unless `generation` is the latest.
    Recompose { generation: u64 },
    AutoscrollTick { generation: u64 },
    SmoothScrollTick { generation: u64 },
    /// Deferred follow-up of a range marker drag.
    ZoomToMarkers,
}

/// Runtime orchestration state grouped separately from model/behavior/presentation.
pub(super) struct ChartRuntimeState {
    pub(super) tasks: DeferredQueue<EngineTask>,
    pub(super) autoscroll: AutoscrollController,
    pub(super) smooth_scroll: SmoothScroller,
    pub(super) listeners: ChartListeners,
    pub(super) synched_min_max: Option<SharedMinMaxKeeper>,
    pub(super) disposed: bool,
}

impl Default for ChartRuntimeState {
    fn default() -> Self {
        Self {
            tasks: DeferredQueue::new(),
            autoscroll: AutoscrollController::new(),
            smooth_scroll: SmoothScroller::new(),
            listeners: ChartListeners::default(),
            synched_min_max: None,
            disposed: false,
        }
    }
}
