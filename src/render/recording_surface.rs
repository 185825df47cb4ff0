use crate::core::CanvasSize;
use crate::error::{ChartError, ChartResult};
use crate::render::{Color, DrawingSurface, Primitive};

/// In-memory layer produced by `RecordingSurface`.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedLayer {
    pub id: u64,
    pub size: CanvasSize,
    pub background: Option<Color>,
    pub primitives: Vec<Primitive>,
    /// `(source layer id, offset_x)` for every blit since the last clear.
    pub blits: Vec<(u64, f64)>,
}

impl RecordedLayer {
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        self.primitives
            .iter()
            .filter_map(|primitive| match primitive {
                Primitive::Text(text) => Some(text.text.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Headless surface that records draw calls instead of rasterizing.
///
/// It still validates every primitive so tests catch invalid geometry before
/// a real backend is involved.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    next_layer_id: u64,
    allocated: u64,
    disposed: u64,
    draw_calls: u64,
    blit_calls: u64,
}

impl RecordingSurface {
    #[must_use]
    pub fn allocated_layers(&self) -> u64 {
        self.allocated
    }

    #[must_use]
    pub fn disposed_layers(&self) -> u64 {
        self.disposed
    }

    #[must_use]
    pub fn draw_calls(&self) -> u64 {
        self.draw_calls
    }

    #[must_use]
    pub fn blit_calls(&self) -> u64 {
        self.blit_calls
    }
}

impl DrawingSurface for RecordingSurface {
    type Layer = RecordedLayer;

    fn allocate_layer(&mut self, size: CanvasSize) -> ChartResult<RecordedLayer> {
        if !size.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: size.width,
                height: size.height,
            });
        }
        self.next_layer_id += 1;
        self.allocated += 1;
        Ok(RecordedLayer {
            id: self.next_layer_id,
            size,
            background: None,
            primitives: Vec::new(),
            blits: Vec::new(),
        })
    }

    fn dispose_layer(&mut self, _layer: RecordedLayer) {
        self.disposed += 1;
    }

    fn clear_layer(&mut self, layer: &mut RecordedLayer, color: Color) -> ChartResult<()> {
        color.validate()?;
        layer.background = Some(color);
        layer.primitives.clear();
        layer.blits.clear();
        Ok(())
    }

    fn draw(&mut self, layer: &mut RecordedLayer, primitive: &Primitive) -> ChartResult<()> {
        primitive.validate()?;
        layer.primitives.push(primitive.clone());
        self.draw_calls += 1;
        Ok(())
    }

    fn blit(
        &mut self,
        source: &RecordedLayer,
        target: &mut RecordedLayer,
        offset_x: f64,
    ) -> ChartResult<()> {
        if !offset_x.is_finite() {
            return Err(ChartError::InvalidData(
                "blit offset must be finite".to_owned(),
            ));
        }
        target.blits.push((source.id, offset_x));
        self.blit_calls += 1;
        Ok(())
    }

    fn measure_text(&self, text: &str, font_size_px: f64) -> (f64, f64) {
        let width = text.chars().count() as f64 * font_size_px * 0.6;
        (width, font_size_px * 1.2)
    }
}
