use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::render::Color;

/// Resolved theme colors and fonts.
///
/// The engine holds one immutable, shared instance; painters only read it.
/// A theme change swaps the whole value through
/// `ChartEngine::on_theme_changed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartStyle {
    pub background: Color,
    pub series_colors: Vec<Color>,
    pub grid_color: Color,
    pub axis_text_color: Color,
    pub title_color: Color,
    pub segment_color: Color,
    pub marker_a_color: Color,
    pub marker_b_color: Color,
    pub marker_range_fill: Color,
    pub marker_label_fill: Color,
    pub hover_color: Color,
    pub selection_color: Color,
    pub y_marker_color: Color,
    pub overlay_range_fill: Color,
    pub error_text_color: Color,
    pub font_size_px: f64,
    pub line_width_px: f64,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            background: Color::rgb(1.0, 1.0, 1.0),
            series_colors: vec![
                Color::rgb(0.20, 0.40, 0.80),
                Color::rgb(0.85, 0.35, 0.15),
                Color::rgb(0.15, 0.60, 0.30),
                Color::rgb(0.55, 0.30, 0.70),
            ],
            grid_color: Color::rgba(0.0, 0.0, 0.0, 0.12),
            axis_text_color: Color::rgb(0.25, 0.25, 0.25),
            title_color: Color::rgb(0.10, 0.10, 0.10),
            segment_color: Color::rgba(0.0, 0.0, 0.0, 0.35),
            marker_a_color: Color::rgb(0.90, 0.20, 0.20),
            marker_b_color: Color::rgb(0.20, 0.20, 0.90),
            marker_range_fill: Color::rgba(0.40, 0.40, 0.40, 0.10),
            marker_label_fill: Color::rgba(1.0, 1.0, 1.0, 0.85),
            hover_color: Color::rgba(0.0, 0.0, 0.0, 0.45),
            selection_color: Color::rgb(1.0, 0.65, 0.0),
            y_marker_color: Color::rgb(0.35, 0.35, 0.35),
            overlay_range_fill: Color::rgba(0.95, 0.75, 0.10, 0.25),
            error_text_color: Color::rgb(0.60, 0.10, 0.10),
            font_size_px: 11.0,
            line_width_px: 1.0,
        }
    }
}

impl ChartStyle {
    #[must_use]
    pub fn series_color(&self, graph_index: usize) -> Color {
        if self.series_colors.is_empty() {
            return self.axis_text_color;
        }
        self.series_colors[graph_index % self.series_colors.len()]
    }

    pub fn validate(&self) -> ChartResult<()> {
        for color in [
            self.background,
            self.grid_color,
            self.axis_text_color,
            self.title_color,
            self.segment_color,
            self.marker_a_color,
            self.marker_b_color,
            self.marker_range_fill,
            self.marker_label_fill,
            self.hover_color,
            self.selection_color,
            self.y_marker_color,
            self.overlay_range_fill,
            self.error_text_color,
        ]
        .into_iter()
        .chain(self.series_colors.iter().copied())
        {
            color.validate()?;
        }
        for (value, name) in [
            (self.font_size_px, "font_size_px"),
            (self.line_width_px, "line_width_px"),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "style `{name}` must be finite and > 0"
                )));
            }
        }
        Ok(())
    }
}
