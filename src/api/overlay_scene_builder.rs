use crate::core::{
    LinearScale, Marker, MarkerKind, MarkerLabel, SeriesId, YMarkerPair,
};
use crate::error::ChartResult;
use crate::extensions::{LabelBounds, LabelRequest, PlacedLabel, place_marker_labels};
use crate::interaction::{DragTarget, InteractionMode};
use crate::render::{
    Color, DrawingSurface, LinePrimitive, Primitive, RectPrimitive, TextHAlign, TextPrimitive,
};

use super::chart_model::ChartModel;
use super::decoration_scene_builder::format_axis_value;
use super::{ChartEngineConfig, ChartStyle};

const MARKER_LINE_PX: f64 = 1.0;
const ACTIVE_MARKER_LINE_PX: f64 = 3.0;
const POINT_HIGHLIGHT_PX: f64 = 6.0;

/// Draw commands of the overlay layer (layer 4) plus the marker labels
/// placed while building them.
#[derive(Debug, Clone, PartialEq, Default)]
pub(super) struct OverlayScene {
    pub(super) primitives: Vec<Primitive>,
    pub(super) labels: Vec<(MarkerKind, Vec<MarkerLabel>)>,
}

pub(super) fn build_overlay_scene<S: DrawingSurface>(
    surface: &S,
    model: &ChartModel,
    style: &ChartStyle,
    config: &ChartEngineConfig,
) -> ChartResult<OverlayScene> {
    let mut scene = OverlayScene::default();
    if !model.has_graph() || model.graph_bands.is_empty() {
        return Ok(scene);
    }
    let width = model.visible_width();
    let top = model.graph_bands[0].1.y;
    let bottom = model.graph_bands[model.graph_bands.len() - 1].1.bottom();

    if let Some(range) = model.overlay_range {
        if let Some((left, right)) = index_span_to_device(model, range.start_index, range.end_index)
        {
            push_span(&mut scene.primitives, left, right, top, bottom, width, style.overlay_range_fill);
        }
    }

    let left_marker = model.markers.left();
    let right_marker = model.markers.right();
    push_span(
        &mut scene.primitives,
        left_marker.device_position as f64,
        right_marker.device_position as f64,
        top,
        bottom,
        width,
        style.marker_range_fill,
    );

    push_selected_bars(&mut scene.primitives, model, style);
    push_selection(&mut scene.primitives, model, style);

    if let Some(hover) = model.markers.hover() {
        let x = hover.device_position as f64;
        if (0.0..width).contains(&x) {
            scene.primitives.push(Primitive::Line(LinePrimitive::new(
                x,
                top,
                x,
                bottom,
                MARKER_LINE_PX,
                style.hover_color,
            )));
        }
    }

    let dragged = match model.interaction.drag().and_then(|drag| drag.target) {
        Some(DragTarget::XMarker(kind)) => Some(kind),
        _ => None,
    };
    let active = dragged.or(model.interaction.hovered_marker());

    let left_labels = place_labels(surface, model, style, config, left_marker, dragged)?;
    let mut right_labels = place_labels(surface, model, style, config, right_marker, dragged)?;
    push_below_overlaps(&mut right_labels, &left_labels, config.label_placement.overlap_gap_px);

    for (marker, labels) in [(left_marker, &left_labels), (right_marker, &right_labels)] {
        let color = match marker.kind {
            MarkerKind::RangeA => style.marker_a_color,
            _ => style.marker_b_color,
        };
        let stroke = if active == Some(marker.kind) {
            ACTIVE_MARKER_LINE_PX
        } else {
            MARKER_LINE_PX
        };
        let x = marker.device_position as f64;
        scene.primitives.push(Primitive::Line(LinePrimitive::new(
            x, top, x, bottom, stroke, color,
        )));
        for label in labels {
            push_label(&mut scene.primitives, label, color, style);
        }
        scene.labels.push((
            marker.kind,
            labels
                .iter()
                .map(|label| MarkerLabel {
                    series_id: label.series_id,
                    text: label.text.clone(),
                    rect: label.rect,
                })
                .collect(),
        ));
    }

    if config.show_y_markers {
        for pair in model.markers.y_markers().values() {
            push_y_markers(&mut scene.primitives, model, style, pair);
        }
    }

    Ok(scene)
}

fn index_span_to_device(model: &ChartModel, start: usize, end: usize) -> Option<(f64, f64)> {
    let start = model.data.x.value(start)?;
    let end = model.data.x.value(end)?;
    Some((
        model.viewport.value_to_device(start),
        model.viewport.value_to_device(end),
    ))
}

fn push_span(
    primitives: &mut Vec<Primitive>,
    a: f64,
    b: f64,
    top: f64,
    bottom: f64,
    width: f64,
    color: Color,
) {
    let left = a.min(b).max(0.0);
    let right = a.max(b).min(width);
    if right <= left || bottom <= top {
        return;
    }
    primitives.push(Primitive::Rect(RectPrimitive::filled(
        left,
        top,
        right - left,
        bottom - top,
        color,
    )));
}

/// Tints every rendered rectangle of the selected bars in each bar graph.
fn push_selected_bars(primitives: &mut Vec<Primitive>, model: &ChartModel, style: &ChartStyle) {
    if model.selected_bars.is_empty() {
        return;
    }
    let bar_graphs =
        (0..model.hit_index.graph_count()).filter(|index| model.hit_index.is_bar_graph(*index));
    for graph in bar_graphs {
        for value_index in &model.selected_bars {
            let Some(rect) = model.hit_index.rect(graph, *value_index) else {
                continue;
            };
            primitives.push(Primitive::Rect(RectPrimitive::filled(
                rect.x,
                rect.y,
                rect.width,
                rect.height,
                style.selection_color.with_alpha(0.25),
            )));
        }
    }
}

fn push_selection(primitives: &mut Vec<Primitive>, model: &ChartModel, style: &ChartStyle) {
    let Some(selection) = model.selection else {
        return;
    };
    if let Some(series_id) = selection.series_id {
        let graph_index = (0..model.hit_index.graph_count())
            .find(|index| model.hit_index.graph_series(*index) == Some(series_id));
        if let Some(rect) =
            graph_index.and_then(|index| model.hit_index.rect(index, selection.value_index))
        {
            primitives.push(Primitive::Rect(
                RectPrimitive::filled(
                    rect.x,
                    rect.y,
                    rect.width,
                    rect.height,
                    style.selection_color.with_alpha(0.25),
                )
                .with_border(style.selection_color, 2.0),
            ));
        }
        return;
    }

    for (series_id, band) in &model.graph_bands {
        let Some(y) = sample_band_y(model, *series_id, selection.value_index) else {
            continue;
        };
        let Some(value) = model.data.x.value(selection.value_index) else {
            continue;
        };
        let x = model.viewport.value_to_device(value);
        if !(0.0..model.visible_width()).contains(&x) || !band.contains(x, y) {
            continue;
        }
        let half = POINT_HIGHLIGHT_PX / 2.0;
        primitives.push(Primitive::Rect(
            RectPrimitive::filled(
                x - half,
                y - half,
                POINT_HIGHLIGHT_PX,
                POINT_HIGHLIGHT_PX,
                style.selection_color,
            )
            .with_border(style.selection_color, 1.0),
        ));
    }
}

fn sample_band_y(model: &ChartModel, series_id: SeriesId, value_index: usize) -> Option<f64> {
    let series = model.data.series(series_id)?;
    let value = series.high_at(value_index)?;
    let range = model.visible_ranges.get(&series_id)?;
    let band = model
        .graph_bands
        .iter()
        .find(|(id, _)| *id == series_id)
        .map(|(_, band)| *band)?;
    let scale = LinearScale::from_range(*range).ok()?;
    Some(scale.value_to_band_y(value, band))
}

/// Measures and places the per-graph value labels of one range marker.
///
/// A dragged marker keeps its labels inside the viewport; a static marker
/// may push them off screen together with the content.
fn place_labels<S: DrawingSurface>(
    surface: &S,
    model: &ChartModel,
    style: &ChartStyle,
    config: &ChartEngineConfig,
    marker: &Marker,
    dragged: Option<MarkerKind>,
) -> ChartResult<Vec<PlacedLabel>> {
    let mut requests = Vec::with_capacity(model.graph_bands.len());
    for (series_id, band) in &model.graph_bands {
        if band.height <= 0.0 {
            continue;
        }
        let Some(series) = model.data.series(*series_id) else {
            continue;
        };
        let Some(value) = series.high_at(marker.value_index) else {
            continue;
        };
        let span = model
            .visible_ranges
            .get(series_id)
            .map_or(1.0, |range| range.max - range.min);
        let mut text = format_axis_value(value, span);
        if !series.unit_label.is_empty() {
            text.push(' ');
            text.push_str(&series.unit_label);
        }
        let (text_width, text_height) = surface.measure_text(&text, style.font_size_px);
        requests.push(LabelRequest {
            series_id: *series_id,
            text,
            text_width,
            text_height,
            graph_top: band.y,
        });
    }

    let bounds = if dragged == Some(marker.kind) {
        LabelBounds::viewport(model.visible_width())
    } else {
        LabelBounds::virtual_content(
            model.viewport.left_border(),
            model.viewport.virtual_width(),
        )
    };
    place_marker_labels(
        marker.device_position as f64,
        &requests,
        bounds,
        config.label_placement,
    )
}

/// Pushes a label below the label of the other marker in the same graph
/// when both boxes overlap.
fn push_below_overlaps(labels: &mut [PlacedLabel], others: &[PlacedLabel], gap: f64) {
    for label in labels.iter_mut() {
        let Some(other) = others
            .iter()
            .find(|other| other.series_id == label.series_id)
        else {
            continue;
        };
        if label.rect.intersects(other.rect) {
            label.rect.y = other.rect.bottom() + gap;
            label.pushed = true;
        }
    }
}

fn push_label(primitives: &mut Vec<Primitive>, label: &PlacedLabel, color: Color, style: &ChartStyle) {
    let rect = label.rect;
    primitives.push(Primitive::Rect(
        RectPrimitive::filled(rect.x, rect.y, rect.width, rect.height, style.marker_label_fill)
            .with_border(color, 1.0),
    ));
    primitives.push(Primitive::Text(TextPrimitive::new(
        label.text.as_str(),
        rect.x + rect.width / 2.0,
        rect.y + (rect.height - style.font_size_px) / 2.0,
        style.font_size_px,
        color,
        TextHAlign::Center,
    )));
}

fn push_y_markers(
    primitives: &mut Vec<Primitive>,
    model: &ChartModel,
    style: &ChartStyle,
    pair: &YMarkerPair,
) {
    let band = pair.band;
    if band.height <= 0.0 {
        return;
    }
    let dragging = model.interaction.mode() == InteractionMode::DraggingYMarker
        && matches!(
            model.interaction.drag().and_then(|drag| drag.target),
            Some(DragTarget::YMarker { series_id, .. }) if series_id == pair.series_id
        );
    let scale = model
        .visible_ranges
        .get(&pair.series_id)
        .and_then(|range| LinearScale::from_range(*range).ok());

    for marker in [pair.high, pair.low] {
        let y = marker.device_position as f64;
        let stroke = if dragging {
            ACTIVE_MARKER_LINE_PX
        } else {
            MARKER_LINE_PX
        };
        primitives.push(Primitive::Line(LinePrimitive::new(
            band.x,
            y,
            band.right(),
            y,
            stroke,
            style.y_marker_color,
        )));
        if !dragging {
            continue;
        }
        if let Some(scale) = scale {
            let (min, max) = scale.domain();
            let value = scale.band_y_to_value(y, band);
            primitives.push(Primitive::Text(TextPrimitive::new(
                format_axis_value(value, max - min),
                band.right() - 2.0,
                (y - style.font_size_px - 1.0).max(band.y),
                style.font_size_px,
                style.y_marker_color,
                TextHAlign::Right,
            )));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::push_below_overlaps;
    use crate::core::{DeviceRect, SeriesId};
    use crate::extensions::PlacedLabel;

    fn label(x: f64) -> PlacedLabel {
        PlacedLabel {
            series_id: SeriesId(1),
            text: "1.0".to_owned(),
            rect: DeviceRect::new(x, 10.0, 30.0, 12.0),
            pushed: false,
        }
    }

    #[test]
    fn overlapping_right_label_moves_below_left_label() {
        let left = [label(100.0)];
        let mut right = [label(110.0)];
        push_below_overlaps(&mut right, &left, 2.0);
        assert!(right[0].pushed);
        assert_eq!(right[0].rect.y, 24.0);

        let mut apart = [label(200.0)];
        push_below_overlaps(&mut apart, &left, 2.0);
        assert!(!apart[0].pushed);
    }
}
