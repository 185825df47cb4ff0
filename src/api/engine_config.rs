use serde::{Deserialize, Serialize};

use crate::core::{CanvasSize, DEFAULT_ZOOM_FACTOR, FINE_ZOOM_FACTOR};
use crate::error::{ChartError, ChartResult};
use crate::extensions::LabelPlacementConfig;
use crate::interaction::{AUTOSCROLL_INTERVAL_MS, SMOOTH_SCROLL_INTERVAL_MS, SMOOTH_SCROLL_STEP_PX};

/// What the mouse wheel does over the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WheelMode {
    /// Zoom at the pointer; Ctrl or Shift scroll the zoomed chart instead.
    Zoom,
    /// Step the keyboard-focused range marker.
    MoveMarker,
}

/// Vertical space around the stacked graph bands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GraphMargins {
    /// Room for the title and segment captions.
    pub top_px: f64,
    /// Room for the x axis labels.
    pub bottom_px: f64,
    /// Gap between two stacked graphs.
    pub graph_spacing_px: f64,
}

impl Default for GraphMargins {
    fn default() -> Self {
        Self {
            top_px: 20.0,
            bottom_px: 20.0,
            graph_spacing_px: 10.0,
        }
    }
}

/// Public engine bootstrap configuration.
///
/// This type is serializable so hosts can persist and reload chart behavior
/// without inventing their own format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartEngineConfig {
    pub size: CanvasSize,
    #[serde(default = "default_zoom_factor")]
    pub zoom_factor: f64,
    #[serde(default = "default_fine_zoom_factor")]
    pub fine_zoom_factor: f64,
    #[serde(default = "default_marker_hit_margin_px")]
    pub marker_hit_margin_px: f64,
    #[serde(default = "default_bar_hit_margin_px")]
    pub bar_hit_margin_px: f64,
    #[serde(default)]
    pub label_placement: LabelPlacementConfig,
    #[serde(default = "default_autoscroll_interval_ms")]
    pub autoscroll_interval_ms: u64,
    #[serde(default = "default_smooth_scroll_interval_ms")]
    pub smooth_scroll_interval_ms: u64,
    #[serde(default = "default_smooth_scroll_step_px")]
    pub smooth_scroll_step_px: u32,
    #[serde(default = "default_page_step")]
    pub page_step: usize,
    /// Zoom to the range markers after one of them was dragged.
    #[serde(default)]
    pub auto_zoom_to_markers: bool,
    /// Move the range markers to the viewport edges after a zoom.
    #[serde(default)]
    pub auto_move_markers_to_border: bool,
    /// Let a zoomed chart be grabbed anywhere, ahead of y markers.
    #[serde(default)]
    pub pan_anywhere_when_zoomed: bool,
    #[serde(default = "default_show_y_markers")]
    pub show_y_markers: bool,
    #[serde(default = "default_wheel_mode")]
    pub wheel_mode: WheelMode,
    #[serde(default)]
    pub margins: GraphMargins,
}

impl ChartEngineConfig {
    /// Creates a config with default interaction tuning.
    #[must_use]
    pub fn new(size: CanvasSize) -> Self {
        Self {
            size,
            zoom_factor: default_zoom_factor(),
            fine_zoom_factor: default_fine_zoom_factor(),
            marker_hit_margin_px: default_marker_hit_margin_px(),
            bar_hit_margin_px: default_bar_hit_margin_px(),
            label_placement: LabelPlacementConfig::default(),
            autoscroll_interval_ms: default_autoscroll_interval_ms(),
            smooth_scroll_interval_ms: default_smooth_scroll_interval_ms(),
            smooth_scroll_step_px: default_smooth_scroll_step_px(),
            page_step: default_page_step(),
            auto_zoom_to_markers: false,
            auto_move_markers_to_border: false,
            pan_anywhere_when_zoomed: false,
            show_y_markers: default_show_y_markers(),
            wheel_mode: default_wheel_mode(),
            margins: GraphMargins::default(),
        }
    }

    #[must_use]
    pub fn with_zoom_factor(mut self, zoom_factor: f64) -> Self {
        self.zoom_factor = zoom_factor;
        self
    }

    #[must_use]
    pub fn with_auto_zoom_to_markers(mut self, enabled: bool) -> Self {
        self.auto_zoom_to_markers = enabled;
        self
    }

    #[must_use]
    pub fn with_auto_move_markers_to_border(mut self, enabled: bool) -> Self {
        self.auto_move_markers_to_border = enabled;
        self
    }

    #[must_use]
    pub fn with_pan_anywhere_when_zoomed(mut self, enabled: bool) -> Self {
        self.pan_anywhere_when_zoomed = enabled;
        self
    }

    #[must_use]
    pub fn with_show_y_markers(mut self, enabled: bool) -> Self {
        self.show_y_markers = enabled;
        self
    }

    #[must_use]
    pub fn with_wheel_mode(mut self, mode: WheelMode) -> Self {
        self.wheel_mode = mode;
        self
    }

    #[must_use]
    pub fn with_margins(mut self, margins: GraphMargins) -> Self {
        self.margins = margins;
        self
    }

    #[must_use]
    pub fn with_page_step(mut self, page_step: usize) -> Self {
        self.page_step = page_step;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.size.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.size.width,
                height: self.size.height,
            });
        }
        for (value, name) in [
            (self.zoom_factor, "zoom_factor"),
            (self.fine_zoom_factor, "fine_zoom_factor"),
        ] {
            if !value.is_finite() || value <= 1.0 {
                return Err(ChartError::InvalidData(format!(
                    "config `{name}` must be finite and > 1"
                )));
            }
        }
        for (value, name) in [
            (self.marker_hit_margin_px, "marker_hit_margin_px"),
            (self.bar_hit_margin_px, "bar_hit_margin_px"),
            (self.margins.top_px, "margins.top_px"),
            (self.margins.bottom_px, "margins.bottom_px"),
            (self.margins.graph_spacing_px, "margins.graph_spacing_px"),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "config `{name}` must be finite and >= 0"
                )));
            }
        }
        for (value, name) in [
            (self.autoscroll_interval_ms, "autoscroll_interval_ms"),
            (self.smooth_scroll_interval_ms, "smooth_scroll_interval_ms"),
            (u64::from(self.smooth_scroll_step_px), "smooth_scroll_step_px"),
        ] {
            if value == 0 {
                return Err(ChartError::InvalidData(format!(
                    "config `{name}` must be > 0"
                )));
            }
        }
        if self.page_step == 0 {
            return Err(ChartError::InvalidData(
                "config `page_step` must be > 0".to_owned(),
            ));
        }
        self.label_placement.validate()?;
        Ok(())
    }

    /// Serializes config to pretty JSON.
    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize config: {e}")))
    }

    /// Deserializes config from JSON.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse config: {e}")))
    }
}

fn default_zoom_factor() -> f64 {
    DEFAULT_ZOOM_FACTOR
}

fn default_fine_zoom_factor() -> f64 {
    FINE_ZOOM_FACTOR
}

fn default_marker_hit_margin_px() -> f64 {
    8.0
}

fn default_bar_hit_margin_px() -> f64 {
    2.0
}

fn default_autoscroll_interval_ms() -> u64 {
    AUTOSCROLL_INTERVAL_MS
}

fn default_smooth_scroll_interval_ms() -> u64 {
    SMOOTH_SCROLL_INTERVAL_MS
}

fn default_smooth_scroll_step_px() -> u32 {
    SMOOTH_SCROLL_STEP_PX
}

fn default_page_step() -> usize {
    10
}

fn default_show_y_markers() -> bool {
    true
}

fn default_wheel_mode() -> WheelMode {
    WheelMode::Zoom
}
