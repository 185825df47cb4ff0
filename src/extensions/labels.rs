use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::{DeviceRect, SeriesId};
use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelPlacementConfig {
    pub horizontal_padding_px: f64,
    pub vertical_padding_px: f64,
    /// Extra gap applied when a label is pushed below an overlapping one.
    pub overlap_gap_px: f64,
    /// Distance between the graph top and the first label.
    pub top_offset_px: f64,
}

impl Default for LabelPlacementConfig {
    fn default() -> Self {
        Self {
            horizontal_padding_px: 3.0,
            vertical_padding_px: 1.0,
            overlap_gap_px: 2.0,
            top_offset_px: 2.0,
        }
    }
}

impl LabelPlacementConfig {
    pub fn validate(self) -> ChartResult<Self> {
        for (value, name) in [
            (self.horizontal_padding_px, "horizontal_padding_px"),
            (self.vertical_padding_px, "vertical_padding_px"),
            (self.overlap_gap_px, "overlap_gap_px"),
            (self.top_offset_px, "top_offset_px"),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "label config `{name}` must be finite and >= 0"
                )));
            }
        }
        Ok(self)
    }
}

/// Measured label waiting for placement on a marker line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelRequest {
    pub series_id: SeriesId,
    pub text: String,
    pub text_width: f64,
    pub text_height: f64,
    /// Top of the graph band the label belongs to.
    pub graph_top: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedLabel {
    pub series_id: SeriesId,
    pub text: String,
    pub rect: DeviceRect,
    pub pushed: bool,
}

/// Horizontal clip range applied to marker labels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelBounds {
    pub min_x: f64,
    pub max_x: f64,
}

impl LabelBounds {
    /// Bounds of the visible viewport, used while the marker is dragged.
    #[must_use]
    pub fn viewport(visible_width: f64) -> Self {
        Self {
            min_x: 0.0,
            max_x: visible_width,
        }
    }

    /// Bounds of the full virtual content in device coordinates, used for
    /// static markers.
    #[must_use]
    pub fn virtual_content(left_border: i64, virtual_width: i64) -> Self {
        Self {
            min_x: -(left_border as f64),
            max_x: (virtual_width - left_border) as f64,
        }
    }
}

/// Places one label per graph centered on a marker line.
///
/// Labels are clipped horizontally into `bounds`. Walking from top to bottom,
/// a label whose box overlaps the previously placed one is pushed down by
/// its own height plus `overlap_gap_px`.
pub fn place_marker_labels(
    line_x: f64,
    requests: &[LabelRequest],
    bounds: LabelBounds,
    config: LabelPlacementConfig,
) -> ChartResult<Vec<PlacedLabel>> {
    let config = config.validate()?;
    if !line_x.is_finite() {
        return Err(ChartError::InvalidData(
            "marker line position must be finite".to_owned(),
        ));
    }

    let mut prepared: Vec<(usize, &LabelRequest)> = requests.iter().enumerate().collect();
    prepared.sort_by(|(a_index, a), (b_index, b)| {
        OrderedFloat(a.graph_top)
            .cmp(&OrderedFloat(b.graph_top))
            .then_with(|| a_index.cmp(b_index))
    });

    let mut placed: Vec<PlacedLabel> = Vec::with_capacity(prepared.len());
    for (_, request) in prepared {
        let width = request.text_width + 2.0 * config.horizontal_padding_px;
        let height = request.text_height + 2.0 * config.vertical_padding_px;
        let left = clamp_left(line_x - 0.5 * width, width, bounds);
        let mut rect = DeviceRect::new(left, request.graph_top + config.top_offset_px, width, height);

        let mut pushed = false;
        if let Some(previous) = placed.last() {
            if rect.intersects(previous.rect) {
                rect.y += height + config.overlap_gap_px;
                pushed = true;
            }
        }

        placed.push(PlacedLabel {
            series_id: request.series_id,
            text: request.text.clone(),
            rect,
            pushed,
        });
    }

    Ok(placed)
}

fn clamp_left(left: f64, width: f64, bounds: LabelBounds) -> f64 {
    if bounds.max_x - bounds.min_x <= width {
        bounds.min_x
    } else {
        left.clamp(bounds.min_x, bounds.max_x - width)
    }
}
