use crate::core::{DevicePoint, GraphKind};
use crate::render::{
    LinePrimitive, PathPrimitive, PolygonPrimitive, Primitive, RectPrimitive,
};

use super::ChartStyle;
use super::series_projection::{GraphProjection, ProjectedSample};

const AREA_FILL_ALPHA: f64 = 0.15;
const COMBINED_BAR_ALPHA: f64 = 0.35;
const DOT_SIZE_PX: f64 = 3.0;

/// Draw commands of the series layer (layer 1).
#[must_use]
pub(super) fn build_series_primitives(
    projections: &[GraphProjection],
    style: &ChartStyle,
) -> Vec<Primitive> {
    let mut primitives = Vec::new();
    for projection in projections {
        match projection.kind {
            GraphKind::Line => push_line_graph(&mut primitives, projection, style),
            GraphKind::Dot => push_dots(&mut primitives, projection, style),
            GraphKind::History => push_history(&mut primitives, projection, style),
            GraphKind::Bar => push_bars(&mut primitives, projection, style, 1.0),
            GraphKind::LineWithBar => {
                push_bars(&mut primitives, projection, style, COMBINED_BAR_ALPHA);
                push_line_graph(&mut primitives, projection, style);
            }
        }
    }
    primitives
}

/// Splits samples into runs of consecutive value indices; a missing sample
/// breaks the line.
fn contiguous_runs(samples: &[ProjectedSample]) -> Vec<&[ProjectedSample]> {
    let mut runs = Vec::new();
    let mut start = 0;
    for position in 1..=samples.len() {
        let breaks = position == samples.len()
            || samples[position].index != samples[position - 1].index + 1;
        if breaks {
            runs.push(&samples[start..position]);
            start = position;
        }
    }
    runs
}

fn push_line_graph(primitives: &mut Vec<Primitive>, projection: &GraphProjection, style: &ChartStyle) {
    let color = style.series_color(projection.graph_index);
    let bottom = projection.band.bottom();
    for run in contiguous_runs(&projection.samples) {
        if run.len() < 2 {
            continue;
        }
        let high: Vec<DevicePoint> = run
            .iter()
            .map(|sample| DevicePoint::new(sample.x, sample.high_y))
            .collect();
        let low: Option<Vec<DevicePoint>> = run
            .iter()
            .map(|sample| sample.low_y.map(|y| DevicePoint::new(sample.x, y)))
            .collect();

        let mut fill = high.clone();
        match &low {
            Some(low) => fill.extend(low.iter().rev().copied()),
            None => {
                fill.push(DevicePoint::new(high[high.len() - 1].x, bottom));
                fill.push(DevicePoint::new(high[0].x, bottom));
            }
        }
        primitives.push(Primitive::Polygon(PolygonPrimitive {
            points: fill,
            fill_color: color.with_alpha(AREA_FILL_ALPHA),
        }));
        if let Some(low) = low {
            primitives.push(Primitive::Path(PathPrimitive {
                points: low,
                stroke_width: style.line_width_px,
                color,
            }));
        }
        primitives.push(Primitive::Path(PathPrimitive {
            points: high,
            stroke_width: style.line_width_px,
            color,
        }));
    }
}

fn push_dots(primitives: &mut Vec<Primitive>, projection: &GraphProjection, style: &ChartStyle) {
    let color = style.series_color(projection.graph_index);
    let half = DOT_SIZE_PX / 2.0;
    primitives.extend(projection.samples.iter().map(|sample| {
        Primitive::Rect(RectPrimitive::filled(
            sample.x - half,
            sample.high_y - half,
            DOT_SIZE_PX,
            DOT_SIZE_PX,
            color,
        ))
    }));
}

fn push_history(primitives: &mut Vec<Primitive>, projection: &GraphProjection, style: &ChartStyle) {
    let color = style.series_color(projection.graph_index);
    let bottom = projection.band.bottom();
    primitives.extend(projection.samples.iter().map(|sample| {
        Primitive::Line(LinePrimitive::new(
            sample.x,
            sample.low_y.unwrap_or(bottom),
            sample.x,
            sample.high_y,
            style.line_width_px,
            color,
        ))
    }));
}

fn push_bars(
    primitives: &mut Vec<Primitive>,
    projection: &GraphProjection,
    style: &ChartStyle,
    alpha: f64,
) {
    let color = style.series_color(projection.graph_index);
    primitives.extend(projection.samples.iter().map(|sample| {
        let rect = projection.bar_rect(sample);
        Primitive::Rect(
            RectPrimitive::filled(
                rect.x,
                rect.y,
                rect.width,
                rect.height,
                color.with_alpha(alpha * 0.8),
            )
            .with_border(color.with_alpha(alpha), 1.0),
        )
    }));
}
