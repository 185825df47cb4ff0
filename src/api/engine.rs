use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use crate::core::{
    CanvasSize, ChartDataModel, DeviceRect, MarkerSet, SeriesId, ViewportState,
    ViewportTransform, VisibleRange,
};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{ContextMenuState, InteractionMode};
use crate::render::{DrawingSurface, LayerId, LayerRecomputeStats};

use super::{
    ChartEngineConfig, ChartStyle, OverlayRange, Selection, engine_core::EngineCore,
    render_coordinator::RenderCoordinator,
};

/// Main orchestration facade consumed by host applications.
///
/// `ChartEngine` owns the zoomable viewport, the markers, the hit-test
/// index and the four cached render layers of one chart, and drives them
/// from host pointer, keyboard and timer events. It is single-threaded:
/// every deferred effect is queued and executed by `run_pending_tasks`.
pub struct ChartEngine<S: DrawingSurface> {
    pub(super) surface: S,
    pub(super) core: EngineCore<S::Layer>,
}

impl<S: DrawingSurface> ChartEngine<S> {
    pub(super) fn ensure_alive(&self) -> ChartResult<()> {
        if self.core.runtime.disposed {
            return Err(ChartError::Disposed);
        }
        Ok(())
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.core.runtime.disposed
    }

    #[must_use]
    pub fn config(&self) -> ChartEngineConfig {
        self.core.behavior
    }

    #[must_use]
    pub fn style(&self) -> Arc<ChartStyle> {
        Arc::clone(&self.core.presentation.style)
    }

    #[must_use]
    pub fn size(&self) -> CanvasSize {
        self.core.model.size
    }

    #[must_use]
    pub fn data_model(&self) -> &ChartDataModel {
        &self.core.model.data
    }

    /// `false` while an empty model is shown as the no-graph state.
    #[must_use]
    pub fn has_graph(&self) -> bool {
        self.core.model.has_graph()
    }

    #[must_use]
    pub fn viewport_state(&self) -> ViewportState {
        self.core.model.viewport.state()
    }

    /// Value/device mapping of the current viewport.
    #[must_use]
    pub fn viewport(&self) -> &ViewportTransform {
        &self.core.model.viewport
    }

    #[must_use]
    pub fn zoom_ratio(&self) -> f64 {
        self.core.model.viewport.zoom_ratio()
    }

    #[must_use]
    pub fn left_border(&self) -> i64 {
        self.core.model.viewport.left_border()
    }

    #[must_use]
    pub fn markers(&self) -> &MarkerSet {
        &self.core.model.markers
    }

    #[must_use]
    pub fn graph_bands(&self) -> &[(SeriesId, DeviceRect)] {
        &self.core.model.graph_bands
    }

    #[must_use]
    pub fn visible_range(&self, series_id: SeriesId) -> Option<VisibleRange> {
        self.core.model.visible_ranges.get(&series_id).copied()
    }

    #[must_use]
    pub fn visible_ranges(&self) -> &IndexMap<SeriesId, VisibleRange> {
        &self.core.model.visible_ranges
    }

    #[must_use]
    pub fn overlay_range(&self) -> Option<OverlayRange> {
        self.core.model.overlay_range
    }

    #[must_use]
    pub fn selection(&self) -> Option<Selection> {
        self.core.model.selection
    }

    #[must_use]
    pub fn interaction_mode(&self) -> InteractionMode {
        self.core.model.interaction.mode()
    }

    #[must_use]
    pub fn context_menu(&self) -> Option<ContextMenuState> {
        self.core.model.interaction.context_menu()
    }

    #[must_use]
    pub fn layer_recompute_stats(&self) -> LayerRecomputeStats {
        self.core.presentation.render_cache.stats()
    }

    #[must_use]
    pub fn render_generation(&self) -> u64 {
        self.core.presentation.render_cache.generation()
    }

    #[must_use]
    pub fn is_render_pending(&self) -> bool {
        self.core.presentation.render_cache.is_pending()
    }

    /// Bitmap the host should present, once the first composition ran.
    #[must_use]
    pub fn presented_layer(&self) -> Option<&S::Layer> {
        self.core.presentation.render_cache.presented()
    }

    #[must_use]
    pub fn render_layer(&self, layer: LayerId) -> Option<&S::Layer> {
        self.core.presentation.render_cache.layer(layer)
    }

    /// Horizontal offset to apply when presenting the layer during a chart drag.
    #[must_use]
    pub fn presentation_offset(&self) -> f64 {
        self.core.presentation.render_cache.pan_offset()
    }

    /// Recomposes dirty layers immediately, bypassing the deferred queue.
    pub fn render_now(&mut self) -> ChartResult<()> {
        self.ensure_alive()?;
        RenderCoordinator::render_now(self)
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Releases every layer and queued task.
    ///
    /// Calling it twice is a no-op; every later mutating call fails with
    /// `ChartError::Disposed`.
    pub fn dispose(&mut self) {
        if self.core.runtime.disposed {
            return;
        }
        self.core.runtime.disposed = true;
        self.core.runtime.autoscroll.cancel();
        self.core.runtime.smooth_scroll.cancel();
        self.core.presentation.render_cache.cancel_pending();
        self.core
            .presentation
            .render_cache
            .dispose(&mut self.surface);
        self.core.runtime.tasks.clear();
        self.core.runtime.listeners.clear();
        self.core.presentation.custom_layers.clear();
        self.core.model.interaction.end_drag();
        debug!("chart engine disposed");
    }

    #[must_use]
    pub fn into_surface(mut self) -> S {
        self.dispose();
        self.surface
    }
}
