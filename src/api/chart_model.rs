use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{
    CanvasSize, ChartDataModel, DeviceRect, HitTestIndex, MarkerSet, SeriesId, ViewportTransform,
    VisibleRange,
};
use crate::interaction::InteractionState;

/// Index span highlighted on top of the graph, e.g. a tour segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayRange {
    pub start_index: usize,
    pub end_index: usize,
}

impl OverlayRange {
    #[must_use]
    pub fn new(start_index: usize, end_index: usize) -> Self {
        Self {
            start_index: start_index.min(end_index),
            end_index: start_index.max(end_index),
        }
    }
}

/// Selected sample. `series_id` is set when a bar of that series was clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub series_id: Option<SeriesId>,
    pub value_index: usize,
}

/// Page zoom set by `ChartEngine::zoom_with_parts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoomParts {
    pub parts: u32,
    /// Zero-based page, at most `parts - 1`.
    pub position: u32,
}

/// Mutable chart state: data, zoom, markers and pointer interaction.
pub(super) struct ChartModel {
    pub(super) data: ChartDataModel,
    pub(super) size: CanvasSize,
    pub(super) viewport: ViewportTransform,
    pub(super) visible_ranges: IndexMap<SeriesId, VisibleRange>,
    pub(super) graph_bands: Vec<(SeriesId, DeviceRect)>,
    pub(super) markers: MarkerSet,
    pub(super) hit_index: HitTestIndex,
    pub(super) hit_index_stale: bool,
    pub(super) overlay_range: Option<OverlayRange>,
    pub(super) selection: Option<Selection>,
    /// Highlighted bar indices, shared by every bar series.
    pub(super) selected_bars: BTreeSet<usize>,
    /// Set while the chart is zoomed by pages; resize re-applies it.
    pub(super) zoom_parts: Option<ZoomParts>,
    /// Point under a pan grab, selected if the pointer is released in place.
    pub(super) pending_click: Option<Selection>,
    pub(super) interaction: InteractionState,
}

impl ChartModel {
    #[must_use]
    pub(super) fn new(size: CanvasSize) -> Self {
        Self {
            data: ChartDataModel::default(),
            size,
            viewport: ViewportTransform::new(size.width),
            visible_ranges: IndexMap::new(),
            graph_bands: Vec::new(),
            markers: MarkerSet::default(),
            hit_index: HitTestIndex::new(f64::from(size.width)),
            hit_index_stale: true,
            overlay_range: None,
            selection: None,
            selected_bars: BTreeSet::new(),
            zoom_parts: None,
            pending_click: None,
            interaction: InteractionState::default(),
        }
    }

    /// `false` while the chart shows the no-graph state.
    #[must_use]
    pub(super) fn has_graph(&self) -> bool {
        !self.data.is_empty()
    }

    #[must_use]
    pub(super) fn height(&self) -> f64 {
        f64::from(self.size.height)
    }

    #[must_use]
    pub(super) fn visible_width(&self) -> f64 {
        self.viewport.visible_width() as f64
    }

    /// `true` when every series is drawn with bars, which makes the arrow
    /// keys step through bars instead of moving a marker.
    #[must_use]
    pub(super) fn is_bar_chart(&self) -> bool {
        !self.data.y_series.is_empty()
            && self
                .data
                .y_series
                .iter()
                .all(|series| series.kind.uses_bar_hit_areas())
    }

    pub(super) fn reposition_markers(&mut self) {
        self.markers.reposition(&self.viewport, &self.data.x);
    }
}
