use crate::render::{LinePrimitive, Primitive, TextHAlign, TextPrimitive};

use super::chart_model::ChartModel;
use super::series_projection::GraphProjection;
use super::{ChartStyle, GraphMargins};

const Y_GRID_DIVISIONS: usize = 4;
const NO_DATA_MESSAGE: &str = "No data";

/// Draw commands of the decoration layer (layer 2): title, segments, grid
/// and axis labels. Without graphs it only draws the error message.
#[must_use]
pub(super) fn build_decoration_primitives(
    model: &ChartModel,
    projections: &[GraphProjection],
    style: &ChartStyle,
    margins: GraphMargins,
) -> Vec<Primitive> {
    let width = model.visible_width();
    let height = model.height();
    let font = style.font_size_px;
    let mut primitives = Vec::new();

    if !model.has_graph() {
        let message = model
            .data
            .error_message
            .as_deref()
            .filter(|message| !message.is_empty())
            .unwrap_or(NO_DATA_MESSAGE);
        primitives.push(Primitive::Text(TextPrimitive::new(
            message,
            width / 2.0,
            (height - font) / 2.0,
            font,
            style.error_text_color,
            TextHAlign::Center,
        )));
        return primitives;
    }

    if !model.data.title.is_empty() {
        primitives.push(Primitive::Text(TextPrimitive::new(
            model.data.title.as_str(),
            width / 2.0,
            2.0,
            font,
            style.title_color,
            TextHAlign::Center,
        )));
    }

    let graph_top = model.graph_bands.first().map_or(0.0, |(_, band)| band.y);
    let graph_bottom = model
        .graph_bands
        .last()
        .map_or(height, |(_, band)| band.bottom());

    for segment in &model.data.segments {
        let (Some(start), Some(end)) = (
            model.data.x.value(segment.start_index),
            model.data.x.value(segment.end_index),
        ) else {
            continue;
        };
        let start_x = model.viewport.value_to_device(start);
        let end_x = model.viewport.value_to_device(end);
        if end_x < 0.0 || start_x > width {
            continue;
        }
        primitives.push(Primitive::Line(LinePrimitive::new(
            start_x,
            graph_top,
            start_x,
            graph_bottom,
            1.0,
            style.segment_color,
        )));
        if !segment.title.is_empty() {
            let center = (start_x.max(0.0) + end_x.min(width)) / 2.0;
            primitives.push(Primitive::Text(TextPrimitive::new(
                segment.title.as_str(),
                center,
                (margins.top_px - font - 2.0).max(0.0),
                font,
                style.segment_color.with_alpha(1.0),
                TextHAlign::Center,
            )));
        }
    }

    let axis_label_y = graph_bottom + 2.0;
    for unit in &model.data.x.units {
        let x = model.viewport.value_to_device(unit.value);
        if !(0.0..=width).contains(&x) {
            continue;
        }
        let grid_color = if unit.is_major {
            style.grid_color.with_alpha((style.grid_color.alpha * 2.0).min(1.0))
        } else {
            style.grid_color
        };
        primitives.push(Primitive::Line(LinePrimitive::new(
            x,
            graph_top,
            x,
            graph_bottom,
            1.0,
            grid_color,
        )));
        if !unit.label.is_empty() {
            primitives.push(Primitive::Text(TextPrimitive::new(
                unit.label.as_str(),
                x,
                axis_label_y,
                font,
                style.axis_text_color,
                TextHAlign::Center,
            )));
        }
    }
    if !model.data.x.unit_label.is_empty() {
        primitives.push(Primitive::Text(TextPrimitive::new(
            model.data.x.unit_label.as_str(),
            width - 2.0,
            axis_label_y,
            font,
            style.axis_text_color,
            TextHAlign::Right,
        )));
    }

    for projection in projections {
        let band = projection.band;
        let (min, max) = projection.scale.domain();
        for step in 0..=Y_GRID_DIVISIONS {
            let ratio = step as f64 / Y_GRID_DIVISIONS as f64;
            let y = band.bottom() - ratio * band.height;
            primitives.push(Primitive::Line(LinePrimitive::new(
                0.0,
                y,
                width,
                y,
                1.0,
                style.grid_color,
            )));
            let value = min + ratio * (max - min);
            primitives.push(Primitive::Text(TextPrimitive::new(
                format_axis_value(value, max - min),
                2.0,
                (y - font - 1.0).max(band.y),
                font,
                style.axis_text_color,
                TextHAlign::Left,
            )));
        }
        if let Some(series) = model.data.series(projection.series_id) {
            let caption = if series.unit_label.is_empty() {
                series.label.clone()
            } else {
                format!("{} [{}]", series.label, series.unit_label)
            };
            if !caption.is_empty() {
                primitives.push(Primitive::Text(TextPrimitive::new(
                    caption,
                    width - 2.0,
                    band.y,
                    font,
                    style.series_color(projection.graph_index),
                    TextHAlign::Right,
                )));
            }
        }
    }
    primitives
}

/// Formats a y axis value with as many decimals as the visible span needs.
#[must_use]
pub(super) fn format_axis_value(value: f64, span: f64) -> String {
    let span = span.abs();
    let decimals = if span >= 100.0 {
        0
    } else if span >= 1.0 {
        1
    } else if span >= 0.01 {
        3
    } else {
        6
    };
    format!("{value:.decimals$}")
}

#[cfg(test)]
mod tests {
    use super::format_axis_value;

    #[test]
    fn axis_values_follow_span_precision() {
        assert_eq!(format_axis_value(1234.56, 500.0), "1235");
        assert_eq!(format_axis_value(12.345, 20.0), "12.3");
        assert_eq!(format_axis_value(0.12345, 0.5), "0.123");
    }
}
