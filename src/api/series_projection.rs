use std::ops::Range;

use tracing::warn;

use crate::core::{
    DeviceRect, GraphKind, HitTestIndex, LinearScale, SeriesId, ViewportTransform, XSeries,
};
use crate::render::DrawingSurface;

use super::{ChartEngine, chart_model::ChartModel};

const BAR_WIDTH_RATIO: f64 = 0.7;
const MAX_BAR_WIDTH_PX: f64 = 40.0;

/// One sample mapped into device space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct ProjectedSample {
    pub(super) index: usize,
    pub(super) x: f64,
    pub(super) high_y: f64,
    pub(super) low_y: Option<f64>,
}

/// Device geometry of one graph band for the current viewport.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct GraphProjection {
    pub(super) series_id: SeriesId,
    pub(super) graph_index: usize,
    pub(super) kind: GraphKind,
    pub(super) band: DeviceRect,
    pub(super) scale: LinearScale,
    pub(super) samples: Vec<ProjectedSample>,
    pub(super) bar_width: f64,
}

impl GraphProjection {
    /// Bar bounds of a sample, from its value down to the low value or the
    /// band bottom.
    #[must_use]
    pub(super) fn bar_rect(&self, sample: &ProjectedSample) -> DeviceRect {
        let base = sample.low_y.unwrap_or(self.band.bottom());
        DeviceRect::from_edges(
            sample.x - self.bar_width / 2.0,
            sample.high_y.min(base),
            sample.x + self.bar_width / 2.0,
            sample.high_y.max(base),
        )
    }
}

/// Index window covering the viewport plus one sample on each side, so
/// lines leaving the viewport are drawn up to the edge.
#[must_use]
pub(super) fn visible_index_window(viewport: &ViewportTransform, x: &XSeries) -> Range<usize> {
    let visible = viewport.visible_width() as f64;
    let values = &x.values;
    let start = values
        .partition_point(|value| viewport.value_to_device(*value) < 0.0)
        .saturating_sub(1);
    let end = (values.partition_point(|value| viewport.value_to_device(*value) <= visible) + 1)
        .min(values.len());
    start..end.max(start)
}

/// Projects every series with a drawable band into device space.
pub(super) fn project_graphs(model: &ChartModel) -> Vec<GraphProjection> {
    if !model.has_graph() {
        return Vec::new();
    }
    let data = &model.data;
    let window = visible_index_window(&model.viewport, &data.x);
    let spacing = model.visible_width() / window.len().max(1) as f64;
    let bar_width = (spacing * BAR_WIDTH_RATIO).clamp(1.0, MAX_BAR_WIDTH_PX);

    let mut projections = Vec::with_capacity(model.graph_bands.len());
    for (graph_index, (series_id, band)) in model.graph_bands.iter().enumerate() {
        if band.height <= 0.0 {
            continue;
        }
        let Some(series) = data.series(*series_id) else {
            continue;
        };
        let Some(range) = model.visible_ranges.get(series_id) else {
            continue;
        };
        let scale = match LinearScale::from_range(*range) {
            Ok(scale) => scale,
            Err(err) => {
                warn!(series = series_id.0, error = %err, "skipping graph with invalid y range");
                continue;
            }
        };
        let to_band_y =
            |value: f64| scale.value_to_band_y(value, *band).clamp(band.y, band.bottom());

        let samples = window
            .clone()
            .filter_map(|index| {
                let high = series.high_at(index)?;
                let x = model.viewport.value_to_device(data.x.value(index)?);
                Some(ProjectedSample {
                    index,
                    x,
                    high_y: to_band_y(high),
                    low_y: series.low_at(index).map(to_band_y),
                })
            })
            .collect();

        projections.push(GraphProjection {
            series_id: *series_id,
            graph_index,
            kind: series.kind,
            band: *band,
            scale,
            samples,
            bar_width,
        });
    }
    projections
}

/// Builds the focus rectangles matching the projected geometry.
#[must_use]
pub(super) fn build_hit_index(
    projections: &[GraphProjection],
    series_len: usize,
    visible_width: f64,
    bar_margin: f64,
) -> HitTestIndex {
    let mut index = HitTestIndex::new(visible_width);
    for projection in projections {
        if projection.kind.uses_bar_hit_areas() {
            let mut bars = vec![None; series_len];
            for sample in &projection.samples {
                bars[sample.index] = Some(projection.bar_rect(sample));
            }
            index.push_bar_graph(projection.series_id, projection.band, &bars, bar_margin);
        } else {
            let mut device_xs = vec![None; series_len];
            for sample in &projection.samples {
                device_xs[sample.index] = Some(sample.x);
            }
            index.push_tiled_graph(projection.series_id, projection.band, &device_xs);
        }
    }
    index
}

impl<S: DrawingSurface> ChartEngine<S> {
    /// Rebuilds the hit-test index when graphs moved since the last build.
    ///
    /// Pointer events can arrive before the next composition, so they must
    /// not depend on the series layer having been painted.
    pub(super) fn ensure_hit_index(&mut self) {
        if !self.core.model.hit_index_stale {
            return;
        }
        let projections = project_graphs(&self.core.model);
        self.store_hit_index(&projections);
    }

    pub(super) fn store_hit_index(&mut self, projections: &[GraphProjection]) {
        let model = &mut self.core.model;
        model.hit_index = build_hit_index(
            projections,
            model.data.len(),
            model.visible_width(),
            self.core.behavior.bar_hit_margin_px,
        );
        model.hit_index_stale = false;
    }
}
