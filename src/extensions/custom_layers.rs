use serde::{Deserialize, Serialize};

use crate::core::{CanvasSize, DeviceRect, SeriesId, ViewportState};
use crate::render::Primitive;

/// Read-only state handed to custom foreground layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomLayerContext {
    pub size: CanvasSize,
    pub viewport: ViewportState,
    /// Device bands of the stacked graphs, top to bottom.
    pub graph_bands: Vec<(SeriesId, DeviceRect)>,
    /// Device x of every value index in the current viewport.
    pub value_positions: Vec<f64>,
}

/// Host-provided decoration drawn into the custom layer (layer 3), e.g.
/// photo or lap markers.
///
/// Layers are repainted only when layers 1-3 are recomposed or the host calls
/// `ChartEngine::invalidate_custom_layers`.
pub trait CustomLayer {
    fn id(&self) -> &str;
    fn paint(&self, context: &CustomLayerContext) -> Vec<Primitive>;
}
