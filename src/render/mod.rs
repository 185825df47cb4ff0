mod layered_cache;
mod primitives;
mod recording_surface;

pub use layered_cache::{LayerId, LayerRecomputeStats, LayeredRenderCache};
pub use primitives::{
    Color, GradientRectPrimitive, LinePrimitive, PathPrimitive, PolygonPrimitive, Primitive,
    RectPrimitive, TextHAlign, TextPrimitive,
};
pub use recording_surface::{RecordedLayer, RecordingSurface};

use crate::core::CanvasSize;
use crate::error::ChartResult;

/// Contract implemented by any drawing backend.
///
/// The engine owns exactly four raster layers allocated through this trait
/// and issues primitive draw calls and layer-to-layer blits against them.
/// Backends never see chart state.
pub trait DrawingSurface {
    type Layer;

    fn allocate_layer(&mut self, size: CanvasSize) -> ChartResult<Self::Layer>;

    fn dispose_layer(&mut self, layer: Self::Layer);

    fn clear_layer(&mut self, layer: &mut Self::Layer, color: Color) -> ChartResult<()>;

    fn draw(&mut self, layer: &mut Self::Layer, primitive: &Primitive) -> ChartResult<()>;

    /// Copies `source` onto `target`, shifted horizontally by `offset_x`.
    fn blit(
        &mut self,
        source: &Self::Layer,
        target: &mut Self::Layer,
        offset_x: f64,
    ) -> ChartResult<()>;

    /// Width and height of `text` rendered at `font_size_px`.
    fn measure_text(&self, text: &str, font_size_px: f64) -> (f64, f64);
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoDrawStats, CairoSurface};
