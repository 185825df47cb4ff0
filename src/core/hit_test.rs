use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::series::SeriesId;
use crate::core::types::DeviceRect;

/// Result of resolving a pointer against the focus rectangles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitResult {
    pub series_id: SeriesId,
    pub graph_index: usize,
    pub value_index: usize,
    pub rect: DeviceRect,
    pub is_bar: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AreaKind {
    Tiled,
    Bars,
}

#[derive(Debug, Clone, PartialEq)]
struct GraphHitAreas {
    series_id: SeriesId,
    kind: AreaKind,
    band: DeviceRect,
    /// Focus rectangle per value index, `None` for skipped points.
    slots: Vec<Option<DeviceRect>>,
    /// Value indices that own a rectangle, ascending by device x.
    ordered: Vec<usize>,
}

impl GraphHitAreas {
    fn resolve(&self, x: f64, y: f64) -> Option<usize> {
        match self.kind {
            AreaKind::Tiled => {
                if y < self.band.y || y >= self.band.bottom() {
                    return None;
                }
                let position = self.ordered.partition_point(|index| {
                    self.slots[*index].is_some_and(|rect| rect.right() <= x)
                });
                let index = *self.ordered.get(position)?;
                let rect = self.slots[index]?;
                rect.contains_x(x).then_some(index)
            }
            AreaKind::Bars => self.ordered.iter().copied().find(|index| {
                self.slots[*index].is_some_and(|rect| rect.contains(x, y))
            }),
        }
    }
}

/// Per-point focus rectangles of every rendered graph.
///
/// Line-like graphs tile `[0, visible_width)` with one rectangle per rendered
/// point, split at the midpoints between neighbors. Bar graphs keep the
/// expanded bar bounds instead.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HitTestIndex {
    visible_width: f64,
    graphs: SmallVec<[GraphHitAreas; 4]>,
}

impl HitTestIndex {
    #[must_use]
    pub fn new(visible_width: f64) -> Self {
        Self {
            visible_width: visible_width.max(0.0),
            graphs: SmallVec::new(),
        }
    }

    pub fn clear(&mut self, visible_width: f64) {
        self.visible_width = visible_width.max(0.0);
        self.graphs.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }

    #[must_use]
    pub fn graph_count(&self) -> usize {
        self.graphs.len()
    }

    #[must_use]
    pub fn visible_width(&self) -> f64 {
        self.visible_width
    }

    /// Adds a line-like graph from the device x of each value index.
    ///
    /// `None` marks a point that is not rendered. A point landing on the same
    /// device pixel as the previously kept one is skipped as well.
    pub fn push_tiled_graph(
        &mut self,
        series_id: SeriesId,
        band: DeviceRect,
        device_xs: &[Option<f64>],
    ) {
        let mut kept: Vec<(usize, f64)> = Vec::with_capacity(device_xs.len());
        for (index, device_x) in device_xs.iter().enumerate() {
            let Some(device_x) = device_x.filter(|value| value.is_finite()) else {
                continue;
            };
            if let Some((_, previous)) = kept.last() {
                if device_x.round() <= previous.round() {
                    continue;
                }
            }
            kept.push((index, device_x));
        }

        let mut slots = vec![None; device_xs.len()];
        let mut ordered = Vec::with_capacity(kept.len());
        for (position, (index, device_x)) in kept.iter().enumerate() {
            let left = if position == 0 {
                0.0
            } else {
                0.5 * (kept[position - 1].1 + device_x)
            };
            let right = match kept.get(position + 1) {
                Some((_, next)) => 0.5 * (device_x + next),
                None => self.visible_width,
            };
            let left = left.clamp(0.0, self.visible_width);
            let right = right.clamp(0.0, self.visible_width);
            if right <= left {
                continue;
            }
            slots[*index] = Some(DeviceRect::from_edges(left, band.y, right, band.bottom()));
            ordered.push(*index);
        }

        self.graphs.push(GraphHitAreas {
            series_id,
            kind: AreaKind::Tiled,
            band,
            slots,
            ordered,
        });
    }

    /// Adds a bar graph, expanding every bar by `margin` pixels.
    pub fn push_bar_graph(
        &mut self,
        series_id: SeriesId,
        band: DeviceRect,
        bars: &[Option<DeviceRect>],
        margin: f64,
    ) {
        let slots: Vec<Option<DeviceRect>> = bars
            .iter()
            .map(|bar| bar.map(|rect| rect.expanded(margin)))
            .collect();
        let ordered = slots
            .iter()
            .enumerate()
            .filter_map(|(index, rect)| rect.map(|_| index))
            .collect();
        self.graphs.push(GraphHitAreas {
            series_id,
            kind: AreaKind::Bars,
            band,
            slots,
            ordered,
        });
    }

    /// Resolves a pointer to the first graph containing it.
    #[must_use]
    pub fn resolve(&self, x: f64, y: f64) -> Option<HitResult> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        self.graphs
            .iter()
            .enumerate()
            .find_map(|(graph_index, graph)| {
                let value_index = graph.resolve(x, y)?;
                Some(HitResult {
                    series_id: graph.series_id,
                    graph_index,
                    value_index,
                    rect: graph.slots[value_index]?,
                    is_bar: graph.kind == AreaKind::Bars,
                })
            })
    }

    /// Resolves only against bar graphs.
    #[must_use]
    pub fn resolve_bar(&self, x: f64, y: f64) -> Option<HitResult> {
        self.resolve(x, y).filter(|hit| hit.is_bar)
    }

    #[must_use]
    pub fn rect(&self, graph_index: usize, value_index: usize) -> Option<DeviceRect> {
        self.graphs
            .get(graph_index)
            .and_then(|graph| graph.slots.get(value_index).copied().flatten())
    }

    /// Nearest index at or after `value_index` owning a rectangle, then the
    /// nearest one before it.
    #[must_use]
    pub fn nearest_with_rect(&self, graph_index: usize, value_index: usize) -> Option<usize> {
        let graph = self.graphs.get(graph_index)?;
        if graph.slots.is_empty() {
            return None;
        }
        let start = value_index.min(graph.slots.len() - 1);
        (start..graph.slots.len())
            .find(|index| graph.slots[*index].is_some())
            .or_else(|| (0..start).rev().find(|index| graph.slots[*index].is_some()))
    }

    /// All rectangles of one graph in device x order.
    #[must_use]
    pub fn graph_rects(&self, graph_index: usize) -> Vec<(usize, DeviceRect)> {
        let Some(graph) = self.graphs.get(graph_index) else {
            return Vec::new();
        };
        graph
            .ordered
            .iter()
            .filter_map(|index| graph.slots[*index].map(|rect| (*index, rect)))
            .collect()
    }

    #[must_use]
    pub fn graph_series(&self, graph_index: usize) -> Option<SeriesId> {
        self.graphs.get(graph_index).map(|graph| graph.series_id)
    }

    #[must_use]
    pub fn is_bar_graph(&self, graph_index: usize) -> bool {
        self.graphs
            .get(graph_index)
            .is_some_and(|graph| graph.kind == AreaKind::Bars)
    }
}

#[cfg(test)]
mod tests {
    use super::HitTestIndex;
    use crate::core::series::SeriesId;
    use crate::core::types::DeviceRect;

    fn band() -> DeviceRect {
        DeviceRect::new(0.0, 10.0, 100.0, 50.0)
    }

    #[test]
    fn gapped_point_falls_back_forward_then_backward() {
        let mut index = HitTestIndex::new(100.0);
        index.push_tiled_graph(
            SeriesId(1),
            band(),
            &[Some(0.0), None, Some(50.0), None, None],
        );
        assert_eq!(index.nearest_with_rect(0, 1), Some(2));
        assert_eq!(index.nearest_with_rect(0, 4), Some(2));
    }

    #[test]
    fn same_pixel_points_are_skipped() {
        let mut index = HitTestIndex::new(100.0);
        index.push_tiled_graph(SeriesId(1), band(), &[Some(10.0), Some(10.2), Some(60.0)]);
        assert!(index.rect(0, 1).is_none());
        assert_eq!(index.resolve(34.0, 20.0).map(|hit| hit.value_index), Some(0));
        assert_eq!(index.resolve(35.0, 20.0).map(|hit| hit.value_index), Some(2));
    }

    #[test]
    fn pointer_outside_band_misses() {
        let mut index = HitTestIndex::new(100.0);
        index.push_tiled_graph(SeriesId(1), band(), &[Some(10.0), Some(60.0)]);
        assert!(index.resolve(20.0, 5.0).is_none());
        assert!(index.resolve(20.0, 60.0).is_none());
    }

    #[test]
    fn bars_are_expanded_by_margin() {
        let mut index = HitTestIndex::new(100.0);
        index.push_bar_graph(
            SeriesId(2),
            band(),
            &[Some(DeviceRect::new(20.0, 30.0, 10.0, 20.0)), None],
            3.0,
        );
        let hit = index.resolve(18.0, 28.0).expect("expanded bar hit");
        assert!(hit.is_bar);
        assert_eq!(hit.value_index, 0);
        assert!(index.resolve(16.0, 28.0).is_none());
    }
}
