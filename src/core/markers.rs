use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::scale::{LinearScale, VisibleRange};
use crate::core::series::{SeriesId, XSeries};
use crate::core::types::DeviceRect;
use crate::core::viewport::ViewportTransform;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerKind {
    RangeA,
    RangeB,
    HoverValue,
    YHigh,
    YLow,
}

/// Label text and placed bounds for one graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerLabel {
    pub series_id: SeriesId,
    pub text: String,
    pub rect: DeviceRect,
}

/// A vertical marker bound to a value index.
///
/// `device_position` is a cache derived from `value_index` through the
/// viewport; it is refreshed by `MarkerSet::reposition` and never read back
/// into the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub kind: MarkerKind,
    pub value_index: usize,
    pub device_position: i64,
    pub labels: Vec<MarkerLabel>,
}

impl Marker {
    #[must_use]
    pub fn new(kind: MarkerKind, value_index: usize) -> Self {
        Self {
            kind,
            value_index,
            device_position: 0,
            labels: Vec::new(),
        }
    }

    /// Hit rectangle: the marker line widened by `margin` on both sides.
    #[must_use]
    pub fn hit_rect(&self, height: f64, margin: f64) -> DeviceRect {
        DeviceRect::new(
            self.device_position as f64 - margin,
            0.0,
            2.0 * margin + 1.0,
            height,
        )
    }

    fn reposition(&mut self, viewport: &ViewportTransform, x: &XSeries) {
        if let Some(value) = x.value(self.value_index) {
            self.device_position = viewport.value_to_device(value).round() as i64;
        }
    }
}

/// The two draggable range markers.
///
/// Neither marker is permanently left or right; `left` and `right` compare
/// device positions on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeMarkers {
    a: Marker,
    b: Marker,
}

impl RangeMarkers {
    #[must_use]
    pub fn new(a_index: usize, b_index: usize) -> Self {
        Self {
            a: Marker::new(MarkerKind::RangeA, a_index),
            b: Marker::new(MarkerKind::RangeB, b_index),
        }
    }

    fn a_is_left(&self) -> bool {
        (self.a.device_position, self.a.value_index) <= (self.b.device_position, self.b.value_index)
    }

    #[must_use]
    pub fn left(&self) -> &Marker {
        if self.a_is_left() { &self.a } else { &self.b }
    }

    #[must_use]
    pub fn right(&self) -> &Marker {
        if self.a_is_left() { &self.b } else { &self.a }
    }

    #[must_use]
    pub fn get(&self, kind: MarkerKind) -> Option<&Marker> {
        match kind {
            MarkerKind::RangeA => Some(&self.a),
            MarkerKind::RangeB => Some(&self.b),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, kind: MarkerKind) -> Option<&mut Marker> {
        match kind {
            MarkerKind::RangeA => Some(&mut self.a),
            MarkerKind::RangeB => Some(&mut self.b),
            _ => None,
        }
    }

    #[must_use]
    pub fn other(kind: MarkerKind) -> MarkerKind {
        match kind {
            MarkerKind::RangeB => MarkerKind::RangeA,
            _ => MarkerKind::RangeB,
        }
    }

    /// Index span `(left, right)` resolved by position.
    #[must_use]
    pub fn index_span(&self) -> (usize, usize) {
        (self.left().value_index, self.right().value_index)
    }

    fn iter_mut(&mut self) -> impl Iterator<Item = &mut Marker> {
        [&mut self.a, &mut self.b].into_iter()
    }
}

/// Horizontal marker bounding one side of a series' visible y range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YMarker {
    pub kind: MarkerKind,
    pub device_position: i64,
}

/// The y marker pair of one graph band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YMarkerPair {
    pub series_id: SeriesId,
    pub band: DeviceRect,
    pub high: YMarker,
    pub low: YMarker,
}

impl YMarkerPair {
    #[must_use]
    pub fn new(series_id: SeriesId, band: DeviceRect) -> Self {
        let mut pair = Self {
            series_id,
            band,
            high: YMarker {
                kind: MarkerKind::YHigh,
                device_position: 0,
            },
            low: YMarker {
                kind: MarkerKind::YLow,
                device_position: 0,
            },
        };
        pair.reset_to_band();
        pair
    }

    /// Upper marker on the band top, lower marker on the band bottom.
    pub fn reset_to_band(&mut self) {
        self.high.device_position = self.band.y.round() as i64;
        self.low.device_position = self.band.bottom().round() as i64;
    }

    #[must_use]
    pub fn get(&self, kind: MarkerKind) -> Option<YMarker> {
        match kind {
            MarkerKind::YHigh => Some(self.high),
            MarkerKind::YLow => Some(self.low),
            _ => None,
        }
    }

    /// Moves one marker, clamped to the band.
    pub fn move_to(&mut self, kind: MarkerKind, device_y: f64) {
        let device_y = device_y
            .clamp(self.band.y, self.band.bottom())
            .round() as i64;
        match kind {
            MarkerKind::YHigh => self.high.device_position = device_y,
            MarkerKind::YLow => self.low.device_position = device_y,
            _ => {}
        }
    }

    /// Converts both marker lines into a visible range.
    ///
    /// Whichever marker sits lower on screen yields the minimum, so a drag
    /// that crossed its partner swaps roles instead of inverting the range.
    #[must_use]
    pub fn resolve_range(&self, scale: LinearScale) -> VisibleRange {
        let first = scale.band_y_to_value(self.high.device_position as f64, self.band);
        let second = scale.band_y_to_value(self.low.device_position as f64, self.band);
        VisibleRange::normalized(first, second)
    }

    #[must_use]
    pub fn hit(&self, x: f64, y: f64, width: f64, margin: f64) -> Option<MarkerKind> {
        if x < 0.0 || x >= width {
            return None;
        }
        let high = (y - self.high.device_position as f64).abs();
        let low = (y - self.low.device_position as f64).abs();
        match (high <= margin, low <= margin) {
            (true, true) if low < high => Some(MarkerKind::YLow),
            (true, _) => Some(MarkerKind::YHigh),
            (false, true) => Some(MarkerKind::YLow),
            (false, false) => None,
        }
    }
}

/// All markers of one chart: the range pair, the hover marker and the y
/// marker pairs keyed by series.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSet {
    range: RangeMarkers,
    hover: Option<Marker>,
    y_markers: IndexMap<SeriesId, YMarkerPair>,
    series_len: usize,
}

impl Default for MarkerSet {
    fn default() -> Self {
        Self::new(0)
    }
}

impl MarkerSet {
    /// Markers for a freshly loaded series: A on the first sample, B on the last.
    #[must_use]
    pub fn new(series_len: usize) -> Self {
        Self {
            range: RangeMarkers::new(0, series_len.saturating_sub(1)),
            hover: None,
            y_markers: IndexMap::new(),
            series_len,
        }
    }

    #[must_use]
    pub fn series_len(&self) -> usize {
        self.series_len
    }

    #[must_use]
    pub fn range(&self) -> &RangeMarkers {
        &self.range
    }

    #[must_use]
    pub fn left(&self) -> &Marker {
        self.range.left()
    }

    #[must_use]
    pub fn right(&self) -> &Marker {
        self.range.right()
    }

    #[must_use]
    pub fn marker(&self, kind: MarkerKind) -> Option<&Marker> {
        match kind {
            MarkerKind::HoverValue => self.hover.as_ref(),
            _ => self.range.get(kind),
        }
    }

    #[must_use]
    pub fn clamp_index(&self, index: usize) -> usize {
        index.min(self.series_len.saturating_sub(1))
    }

    /// Re-clamps all indices after the series length changed.
    pub fn set_series_len(&mut self, series_len: usize) {
        self.series_len = series_len;
        let last = series_len.saturating_sub(1);
        for marker in self.range.iter_mut() {
            marker.value_index = marker.value_index.min(last);
        }
        if let Some(hover) = self.hover.as_mut() {
            hover.value_index = hover.value_index.min(last);
        }
    }

    /// Sets a range marker index and derives its device position.
    ///
    /// Returns `false` for a kind that is not a range marker.
    pub fn set_range_index(
        &mut self,
        kind: MarkerKind,
        value_index: usize,
        viewport: &ViewportTransform,
        x: &XSeries,
    ) -> bool {
        let value_index = self.clamp_index(value_index);
        let Some(marker) = self.range.get_mut(kind) else {
            return false;
        };
        marker.value_index = value_index;
        marker.reposition(viewport, x);
        true
    }

    /// Maps a device x to the nearest sample index.
    ///
    /// The pointer is snapped to the x resolution of the series, so the
    /// marker always lands on a real sample.
    #[must_use]
    pub fn quantize(device_x: f64, viewport: &ViewportTransform, x: &XSeries) -> Option<usize> {
        x.nearest_index(viewport.device_to_value(device_x))
    }

    /// Moves a dragged range marker to the sample nearest `device_x`.
    ///
    /// Returns the new index when it changed.
    pub fn drag_range_marker(
        &mut self,
        kind: MarkerKind,
        device_x: f64,
        viewport: &ViewportTransform,
        x: &XSeries,
    ) -> Option<usize> {
        let index = Self::quantize(device_x, viewport, x)?;
        let previous = self.range.get(kind)?.value_index;
        self.set_range_index(kind, index, viewport, x);
        (index != previous).then_some(index)
    }

    #[must_use]
    pub fn hover(&self) -> Option<&Marker> {
        self.hover.as_ref()
    }

    /// Mirrors the hovered index. Returns `true` when it changed.
    pub fn set_hover(
        &mut self,
        value_index: Option<usize>,
        viewport: &ViewportTransform,
        x: &XSeries,
    ) -> bool {
        let value_index = value_index.map(|index| self.clamp_index(index));
        if self.hover.as_ref().map(|marker| marker.value_index) == value_index {
            return false;
        }
        self.hover = value_index.map(|index| {
            let mut marker = Marker::new(MarkerKind::HoverValue, index);
            marker.reposition(viewport, x);
            marker
        });
        true
    }

    /// Refreshes every derived device position after zoom, pan or resize.
    pub fn reposition(&mut self, viewport: &ViewportTransform, x: &XSeries) {
        for marker in self.range.iter_mut() {
            marker.reposition(viewport, x);
        }
        if let Some(hover) = self.hover.as_mut() {
            hover.reposition(viewport, x);
        }
    }

    /// Range marker whose hit rectangle contains `device_x`, nearest first.
    #[must_use]
    pub fn hit_range_marker(&self, device_x: f64, height: f64, margin: f64) -> Option<MarkerKind> {
        [&self.range.a, &self.range.b]
            .into_iter()
            .filter(|marker| marker.hit_rect(height, margin).contains_x(device_x))
            .min_by_key(|marker| (marker.device_position as f64 - device_x).abs() as i64)
            .map(|marker| marker.kind)
    }

    pub fn set_labels(&mut self, kind: MarkerKind, labels: Vec<MarkerLabel>) {
        let marker = match kind {
            MarkerKind::HoverValue => self.hover.as_mut(),
            _ => self.range.get_mut(kind),
        };
        if let Some(marker) = marker {
            marker.labels = labels;
        }
    }

    #[must_use]
    pub fn y_markers(&self) -> &IndexMap<SeriesId, YMarkerPair> {
        &self.y_markers
    }

    #[must_use]
    pub fn y_pair(&self, series_id: SeriesId) -> Option<&YMarkerPair> {
        self.y_markers.get(&series_id)
    }

    pub fn y_pair_mut(&mut self, series_id: SeriesId) -> Option<&mut YMarkerPair> {
        self.y_markers.get_mut(&series_id)
    }

    pub fn y_pairs_mut(&mut self) -> impl Iterator<Item = &mut YMarkerPair> {
        self.y_markers.values_mut()
    }

    /// Rebuilds the y marker pairs for the current graph bands.
    pub fn layout_y_markers(&mut self, bands: &[(SeriesId, DeviceRect)]) {
        self.y_markers = bands
            .iter()
            .map(|(series_id, band)| (*series_id, YMarkerPair::new(*series_id, *band)))
            .collect();
    }

    #[must_use]
    pub fn hit_y_marker(
        &self,
        x: f64,
        y: f64,
        width: f64,
        margin: f64,
    ) -> Option<(SeriesId, MarkerKind)> {
        self.y_markers
            .values()
            .find_map(|pair| pair.hit(x, y, width, margin).map(|kind| (pair.series_id, kind)))
    }
}

#[cfg(test)]
mod tests {
    use super::{MarkerKind, MarkerSet, YMarkerPair};
    use crate::core::scale::LinearScale;
    use crate::core::series::{SeriesId, XSeries};
    use crate::core::types::DeviceRect;
    use crate::core::viewport::ViewportTransform;

    fn fixture() -> (ViewportTransform, XSeries) {
        let x = XSeries::new((0..=100).map(f64::from).collect());
        let mut viewport = ViewportTransform::new(1000);
        viewport.set_value_range(0.0, 100.0);
        (viewport, x)
    }

    #[test]
    fn drag_snaps_to_sample_positions() {
        let (viewport, x) = fixture();
        let mut markers = MarkerSet::new(x.len());
        let changed = markers.drag_range_marker(MarkerKind::RangeA, 243.0, &viewport, &x);
        assert_eq!(changed, Some(24));
        let marker = markers.marker(MarkerKind::RangeA).expect("marker a");
        assert_eq!(marker.device_position, 240);
    }

    #[test]
    fn series_shrink_reclamps_indices() {
        let (viewport, x) = fixture();
        let mut markers = MarkerSet::new(x.len());
        markers.set_hover(Some(90), &viewport, &x);
        markers.set_series_len(10);
        assert_eq!(markers.right().value_index, 9);
        assert_eq!(markers.hover().map(|m| m.value_index), Some(9));
    }

    #[test]
    fn crossed_y_markers_swap_roles() {
        let band = DeviceRect::new(0.0, 0.0, 200.0, 100.0);
        let mut pair = YMarkerPair::new(SeriesId(3), band);
        let scale = LinearScale::new(0.0, 50.0).expect("scale");
        pair.move_to(MarkerKind::YHigh, 80.0);
        pair.move_to(MarkerKind::YLow, 20.0);
        let range = pair.resolve_range(scale);
        assert!(range.min < range.max);
        assert!((range.min - 10.0).abs() < 1e-9);
        assert!((range.max - 40.0).abs() < 1e-9);
    }
}
