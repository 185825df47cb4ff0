use std::sync::Arc;

use crate::extensions::CustomLayer;
use crate::render::LayeredRenderCache;

use super::ChartStyle;

/// Render-side state grouped separately from the chart model.
pub(super) struct ChartPresentationState<L> {
    pub(super) style: Arc<ChartStyle>,
    pub(super) render_cache: LayeredRenderCache<L>,
    pub(super) custom_layers: Vec<Box<dyn CustomLayer>>,
}

impl<L> ChartPresentationState<L> {
    #[must_use]
    pub(super) fn new(style: Arc<ChartStyle>) -> Self {
        Self {
            style,
            render_cache: LayeredRenderCache::new(),
            custom_layers: Vec::new(),
        }
    }
}
