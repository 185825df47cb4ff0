use serde::{Deserialize, Serialize};

use crate::core::{CanvasSize, SeriesId, ViewportState};
use crate::interaction::InteractionMode;
use crate::render::LayerRecomputeStats;

use super::{OverlayRange, Selection, ZoomParts};

/// Visible y range of one series at snapshot time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesRangeSnapshot {
    pub series_id: SeriesId,
    pub min: f64,
    pub max: f64,
}

/// Serializable deterministic state snapshot used by regression tests and
/// debugging tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub size: CanvasSize,
    pub viewport: ViewportState,
    pub zoom_pivot_ratio: f64,
    pub has_graph: bool,
    pub point_count: usize,
    pub left_marker_index: usize,
    pub right_marker_index: usize,
    pub left_marker_position: i64,
    pub right_marker_position: i64,
    pub hover_index: Option<usize>,
    pub selection: Option<Selection>,
    pub selected_bars: Vec<usize>,
    pub zoom_parts: Option<ZoomParts>,
    pub overlay_range: Option<OverlayRange>,
    pub interaction_mode: InteractionMode,
    pub series_ranges: Vec<SeriesRangeSnapshot>,
    pub layer_stats: LayerRecomputeStats,
    pub render_generation: u64,
    pub disposed: bool,
}
