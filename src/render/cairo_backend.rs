use cairo::{Context, Format, ImageSurface, LinearGradient};
use pango::FontDescription;

use crate::core::CanvasSize;
use crate::error::{ChartError, ChartResult};
use crate::render::{Color, DrawingSurface, Primitive, TextHAlign};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoDrawStats {
    pub layers_allocated: usize,
    pub primitives_drawn: usize,
    pub blits: usize,
}

/// Cairo + Pango + PangoCairo drawing surface.
///
/// Every render layer is an ARGB32 image surface; the host paints the
/// presented layer onto its own widget context.
#[derive(Debug)]
pub struct CairoSurface {
    /// 1x1 scratch surface used for text measurement.
    measure_surface: ImageSurface,
    stats: CairoDrawStats,
}

impl CairoSurface {
    pub fn new() -> ChartResult<Self> {
        let measure_surface = ImageSurface::create(Format::ARgb32, 1, 1)
            .map_err(|err| map_backend_error("failed to create measure surface", err))?;
        Ok(Self {
            measure_surface,
            stats: CairoDrawStats::default(),
        })
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        "cairo+pango+pangocairo"
    }

    #[must_use]
    pub fn stats(&self) -> CairoDrawStats {
        self.stats
    }
}

impl DrawingSurface for CairoSurface {
    type Layer = ImageSurface;

    fn allocate_layer(&mut self, size: CanvasSize) -> ChartResult<ImageSurface> {
        let width = i32::try_from(size.width).unwrap_or(i32::MAX);
        let height = i32::try_from(size.height).unwrap_or(i32::MAX);
        if width <= 0 || height <= 0 {
            return Err(ChartError::InvalidViewport {
                width: size.width,
                height: size.height,
            });
        }
        let surface = ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| map_backend_error("failed to create layer surface", err))?;
        self.stats.layers_allocated += 1;
        Ok(surface)
    }

    fn dispose_layer(&mut self, layer: ImageSurface) {
        layer.finish();
    }

    fn clear_layer(&mut self, layer: &mut ImageSurface, color: Color) -> ChartResult<()> {
        color.validate()?;
        let context = create_context(layer)?;
        apply_color(&context, color);
        context
            .paint()
            .map_err(|err| map_backend_error("failed to clear layer", err))
    }

    fn draw(&mut self, layer: &mut ImageSurface, primitive: &Primitive) -> ChartResult<()> {
        primitive.validate()?;
        let context = create_context(layer)?;
        match primitive {
            Primitive::Line(line) => {
                apply_color(&context, line.color);
                context.set_line_width(line.stroke_width);
                context.move_to(line.x1, line.y1);
                context.line_to(line.x2, line.y2);
                context
                    .stroke()
                    .map_err(|err| map_backend_error("failed to stroke line", err))?;
            }
            Primitive::Path(path) => {
                let mut points = path.points.iter();
                if let Some(first) = points.next() {
                    context.move_to(first.x, first.y);
                    for point in points {
                        context.line_to(point.x, point.y);
                    }
                    apply_color(&context, path.color);
                    context.set_line_width(path.stroke_width);
                    context
                        .stroke()
                        .map_err(|err| map_backend_error("failed to stroke path", err))?;
                }
            }
            Primitive::Polygon(polygon) => {
                let mut points = polygon.points.iter();
                if let Some(first) = points.next() {
                    context.move_to(first.x, first.y);
                    for point in points {
                        context.line_to(point.x, point.y);
                    }
                    context.close_path();
                    apply_color(&context, polygon.fill_color);
                    context
                        .fill()
                        .map_err(|err| map_backend_error("failed to fill polygon", err))?;
                }
            }
            Primitive::Rect(rect) => {
                context.rectangle(rect.x, rect.y, rect.width, rect.height);
                apply_color(&context, rect.fill_color);
                if rect.border_width > 0.0 {
                    context
                        .fill_preserve()
                        .map_err(|err| map_backend_error("failed to fill rectangle", err))?;
                    apply_color(&context, rect.border_color);
                    context.set_line_width(rect.border_width);
                    context.stroke().map_err(|err| {
                        map_backend_error("failed to stroke rectangle border", err)
                    })?;
                } else {
                    context
                        .fill()
                        .map_err(|err| map_backend_error("failed to fill rectangle", err))?;
                }
            }
            Primitive::GradientRect(rect) => {
                let gradient = LinearGradient::new(rect.x, rect.y, rect.x, rect.y + rect.height);
                let (top, bottom) = (rect.top_color, rect.bottom_color);
                gradient.add_color_stop_rgba(0.0, top.red, top.green, top.blue, top.alpha);
                gradient.add_color_stop_rgba(
                    1.0,
                    bottom.red,
                    bottom.green,
                    bottom.blue,
                    bottom.alpha,
                );
                context
                    .set_source(&gradient)
                    .map_err(|err| map_backend_error("failed to set gradient", err))?;
                context.rectangle(rect.x, rect.y, rect.width, rect.height);
                context
                    .fill()
                    .map_err(|err| map_backend_error("failed to fill gradient", err))?;
            }
            Primitive::Text(text) => {
                let layout = pangocairo::functions::create_layout(&context);
                let font_description =
                    FontDescription::from_string(&format!("Sans {}", text.font_size_px));
                layout.set_font_description(Some(&font_description));
                layout.set_text(&text.text);

                let (text_width, _text_height) = layout.pixel_size();
                let x = match text.h_align {
                    TextHAlign::Left => text.x,
                    TextHAlign::Center => text.x - f64::from(text_width) / 2.0,
                    TextHAlign::Right => text.x - f64::from(text_width),
                };

                apply_color(&context, text.color);
                context.move_to(x, text.y);
                pangocairo::functions::show_layout(&context, &layout);
            }
        }
        self.stats.primitives_drawn += 1;
        Ok(())
    }

    fn blit(
        &mut self,
        source: &ImageSurface,
        target: &mut ImageSurface,
        offset_x: f64,
    ) -> ChartResult<()> {
        let context = create_context(target)?;
        context
            .set_source_surface(source, offset_x, 0.0)
            .map_err(|err| map_backend_error("failed to set blit source", err))?;
        context
            .paint()
            .map_err(|err| map_backend_error("failed to blit layer", err))?;
        self.stats.blits += 1;
        Ok(())
    }

    fn measure_text(&self, text: &str, font_size_px: f64) -> (f64, f64) {
        let Ok(context) = Context::new(&self.measure_surface) else {
            return (text.chars().count() as f64 * font_size_px * 0.6, font_size_px * 1.2);
        };
        let layout = pangocairo::functions::create_layout(&context);
        let font_description = FontDescription::from_string(&format!("Sans {font_size_px}"));
        layout.set_font_description(Some(&font_description));
        layout.set_text(text);
        let (width, height) = layout.pixel_size();
        (f64::from(width), f64::from(height))
    }
}

fn create_context(surface: &ImageSurface) -> ChartResult<Context> {
    Context::new(surface).map_err(|err| map_backend_error("failed to create cairo context", err))
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> ChartError {
    ChartError::InvalidData(format!("{prefix}: {err}"))
}
