use serde::{Deserialize, Serialize};
use tracing::trace;

/// Upper bound for the virtual graph width in device pixels.
///
/// Years of second-resolution samples can be zoomed far past `i32` range, so
/// every virtual coordinate is carried as `i64`.
pub const MAX_VIRTUAL_WIDTH: i64 = 1_000_000_000_000;

/// Default multiplicative zoom step.
pub const DEFAULT_ZOOM_FACTOR: f64 = 1.3;

/// Zoom step used for fine-grained keyboard zooming.
pub const FINE_ZOOM_FACTOR: f64 = 1.01;

/// Share of `parts` visible widths used as virtual width by
/// [`ViewportTransform::zoom_with_parts`], so neighbouring parts stay in view.
pub const ZOOM_WITH_PARTS_RATIO: f64 = 0.8;

const UNZOOMED_EPSILON: f64 = 1e-9;

/// Serializable view of the current zoom/pan state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    pub zoom_ratio: f64,
    pub virtual_width: i64,
    pub left_border: i64,
    pub visible_width: i64,
}

/// Maps x values to device pixels for a zoomable, horizontally scrolled graph.
///
/// The fully zoomed content is `virtual_width` pixels wide and the visible
/// window starts `left_border` pixels into it. `zoom_ratio` is the
/// authoritative zoom level; `virtual_width` is derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportTransform {
    zoom_ratio: f64,
    virtual_width: i64,
    left_border: i64,
    visible_width: i64,
    value_start: f64,
    value_end: f64,
    zoom_pivot_ratio: f64,
}

impl ViewportTransform {
    #[must_use]
    pub fn new(visible_width: u32) -> Self {
        let visible_width = i64::from(visible_width);
        Self {
            zoom_ratio: 1.0,
            virtual_width: visible_width,
            left_border: 0,
            visible_width,
            value_start: 0.0,
            value_end: 1.0,
            zoom_pivot_ratio: 0.5,
        }
    }

    /// Sets the x value range spanned by the virtual width.
    ///
    /// A degenerate or non-finite range falls back to a unit span so a single
    /// sample still maps to the left edge instead of producing NaN.
    pub fn set_value_range(&mut self, start: f64, end: f64) {
        if start.is_finite() && end.is_finite() && end > start {
            self.value_start = start;
            self.value_end = end;
        } else if start.is_finite() {
            self.value_start = start;
            self.value_end = start + 1.0;
        } else {
            self.value_start = 0.0;
            self.value_end = 1.0;
        }
    }

    #[must_use]
    pub fn value_range(&self) -> (f64, f64) {
        (self.value_start, self.value_end)
    }

    #[must_use]
    pub fn zoom_ratio(&self) -> f64 {
        self.zoom_ratio
    }

    #[must_use]
    pub fn virtual_width(&self) -> i64 {
        self.virtual_width
    }

    #[must_use]
    pub fn left_border(&self) -> i64 {
        self.left_border
    }

    #[must_use]
    pub fn visible_width(&self) -> i64 {
        self.visible_width
    }

    #[must_use]
    pub fn max_left_border(&self) -> i64 {
        (self.virtual_width - self.visible_width).max(0)
    }

    #[must_use]
    pub fn is_zoomed(&self) -> bool {
        self.zoom_ratio > 1.0
    }

    #[must_use]
    pub fn state(&self) -> ViewportState {
        ViewportState {
            zoom_ratio: self.zoom_ratio,
            virtual_width: self.virtual_width,
            left_border: self.left_border,
            visible_width: self.visible_width,
        }
    }

    /// Last recorded zoom pivot, as a ratio of the virtual width.
    #[must_use]
    pub fn zoom_pivot_ratio(&self) -> f64 {
        self.zoom_pivot_ratio
    }

    pub fn record_zoom_pivot(&mut self, device_x: f64) {
        if let Some(ratio) = self.device_to_ratio(device_x) {
            self.zoom_pivot_ratio = ratio.clamp(0.0, 1.0);
        }
    }

    /// Position of `value` inside the value range, `0.0` at the first sample.
    #[must_use]
    pub fn position_ratio(&self, value: f64) -> f64 {
        (value - self.value_start) / (self.value_end - self.value_start)
    }

    #[must_use]
    pub fn value_to_virtual(&self, value: f64) -> f64 {
        self.position_ratio(value) * self.virtual_width as f64
    }

    #[must_use]
    pub fn value_to_device(&self, value: f64) -> f64 {
        self.value_to_virtual(value) - self.left_border as f64
    }

    #[must_use]
    pub fn device_to_value(&self, device_x: f64) -> f64 {
        match self.device_to_ratio(device_x) {
            Some(ratio) => self.value_start + ratio * (self.value_end - self.value_start),
            None => self.value_start,
        }
    }

    fn device_to_ratio(&self, device_x: f64) -> Option<f64> {
        if self.virtual_width <= 0 || !device_x.is_finite() {
            return None;
        }
        Some((device_x + self.left_border as f64) / self.virtual_width as f64)
    }

    #[must_use]
    pub fn left_border_ratio(&self) -> f64 {
        if self.virtual_width <= 0 {
            return 0.0;
        }
        self.left_border as f64 / self.virtual_width as f64
    }

    /// Zooms in by `factor`, keeping the value under `pivot` in place.
    ///
    /// Without a pivot the last recorded zoom pivot is used. Returns `true`
    /// when the zoom ratio or left border changed.
    pub fn zoom_in(&mut self, pivot: Option<f64>, factor: f64) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            return false;
        }
        self.apply_zoom_ratio(self.zoom_ratio * factor, pivot)
    }

    pub fn zoom_out(&mut self, pivot: Option<f64>, factor: f64) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            return false;
        }
        self.apply_zoom_ratio(self.zoom_ratio / factor, pivot)
    }

    /// Sets an absolute zoom ratio around a pivot.
    pub fn set_zoom_ratio(&mut self, zoom_ratio: f64, pivot: Option<f64>) -> bool {
        if !zoom_ratio.is_finite() {
            return false;
        }
        self.apply_zoom_ratio(zoom_ratio, pivot)
    }

    /// Zooms so that `[start, end]` spans exactly the visible width and the
    /// viewport starts at `start`.
    pub fn zoom_to_range(&mut self, start: f64, end: f64) -> bool {
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        let start_ratio = self.position_ratio(start);
        let range_ratio = self.position_ratio(end) - start_ratio;
        if !range_ratio.is_finite() || range_ratio <= 0.0 {
            return self.fit_to_content();
        }

        let before = self.state();
        self.set_ratio_and_width(1.0 / range_ratio);
        self.set_left_border_ratio(start_ratio);
        trace!(
            zoom_ratio = self.zoom_ratio,
            left_border = self.left_border,
            "viewport zoomed to range"
        );
        before != self.state()
    }

    pub fn fit_to_content(&mut self) -> bool {
        let before = self.state();
        self.zoom_ratio = 1.0;
        self.virtual_width = self.visible_width;
        self.left_border = 0;
        before != self.state()
    }

    /// Splits the content into `parts` pages and shows page `position`.
    ///
    /// `parts` is raised to one and `position` clamped to the last page.
    /// Returns `true` when zoom or scroll changed.
    pub fn zoom_with_parts(&mut self, parts: u32, position: u32) -> bool {
        let before = self.state();
        let parts = i64::from(parts.max(1));
        let position = i64::from(position).min(parts - 1);
        let visible = self.visible_width.max(0);
        if visible == 0 {
            return false;
        }

        let graph_width = visible.saturating_mul(parts).min(MAX_VIRTUAL_WIDTH);
        self.set_ratio_and_width(graph_width as f64 * ZOOM_WITH_PARTS_RATIO / visible as f64);
        if position == 0 {
            self.left_border = 0;
        } else {
            let part_width = self.virtual_width / parts;
            let part_border = visible - part_width;
            self.set_left_border(part_width * position - 1 - part_border / 2);
        }

        trace!(
            parts,
            position,
            left_border = self.left_border,
            "viewport zoomed to part"
        );
        before != self.state()
    }

    /// Scrolls the viewport by `delta` device pixels, positive to the right.
    ///
    /// Returns the delta that was actually applied after clamping.
    pub fn pan_by(&mut self, delta: i64) -> i64 {
        let before = self.left_border;
        self.set_left_border(before.saturating_add(delta));
        self.left_border - before
    }

    pub fn set_left_border(&mut self, left_border: i64) {
        self.left_border = left_border.clamp(0, self.max_left_border());
    }

    pub fn set_left_border_ratio(&mut self, ratio: f64) {
        if !ratio.is_finite() {
            return;
        }
        let left_border = (ratio * self.virtual_width as f64).round() as i64;
        self.set_left_border(left_border);
    }

    /// Applies a new visible width while keeping zoom ratio and the relative
    /// scroll position.
    pub fn resize(&mut self, visible_width: u32) {
        let left_ratio = self.left_border_ratio();
        self.visible_width = i64::from(visible_width);
        self.set_ratio_and_width(self.zoom_ratio);
        self.set_left_border_ratio(left_ratio);
    }

    fn apply_zoom_ratio(&mut self, requested: f64, pivot: Option<f64>) -> bool {
        let before = self.state();

        let (pivot_ratio, pivot_device) = self.resolve_pivot(pivot);
        self.set_ratio_and_width(requested);

        if self.zoom_ratio <= 1.0 {
            self.left_border = 0;
        } else {
            let left = pivot_ratio * self.virtual_width as f64 - pivot_device;
            self.set_left_border(left.round() as i64);
        }

        trace!(
            zoom_ratio = self.zoom_ratio,
            virtual_width = self.virtual_width,
            left_border = self.left_border,
            "viewport zoom applied"
        );
        before != self.state()
    }

    /// Resolves the pivot as (ratio of virtual width, device x).
    ///
    /// A stored pivot that scrolled out of view is replaced by the visible
    /// center.
    fn resolve_pivot(&mut self, pivot: Option<f64>) -> (f64, f64) {
        let visible = self.visible_width as f64;
        match pivot {
            Some(device_x) if device_x.is_finite() => {
                let device_x = device_x.clamp(0.0, visible);
                self.record_zoom_pivot(device_x);
                (self.zoom_pivot_ratio, device_x)
            }
            _ => {
                let ratio = self.zoom_pivot_ratio;
                let device_x = ratio * self.virtual_width as f64 - self.left_border as f64;
                if (0.0..=visible).contains(&device_x) {
                    return (ratio, device_x);
                }
                let center = visible / 2.0;
                if self.virtual_width <= 0 {
                    return (0.5, center);
                }
                (
                    (center + self.left_border as f64) / self.virtual_width as f64,
                    center,
                )
            }
        }
    }

    fn set_ratio_and_width(&mut self, requested: f64) {
        let mut ratio = if requested.is_finite() { requested } else { 1.0 };
        if ratio < 1.0 + UNZOOMED_EPSILON {
            ratio = 1.0;
        }

        let visible = self.visible_width.max(0);
        if visible == 0 {
            self.zoom_ratio = ratio;
            self.virtual_width = 0;
            self.left_border = 0;
            return;
        }

        let max_ratio = MAX_VIRTUAL_WIDTH as f64 / visible as f64;
        if ratio > max_ratio {
            ratio = max_ratio.max(1.0);
        }

        self.zoom_ratio = ratio;
        self.virtual_width = ((visible as f64 * ratio).round() as i64).clamp(visible, MAX_VIRTUAL_WIDTH);
        self.left_border = self.left_border.clamp(0, self.max_left_border());
    }
}
