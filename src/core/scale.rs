use serde::{Deserialize, Serialize};

use crate::core::types::DeviceRect;
use crate::error::{ChartError, ChartResult};

/// Visible min/max of one y series. Engine view state, never part of the data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisibleRange {
    pub min: f64,
    pub max: f64,
}

impl VisibleRange {
    /// Orders the bounds and widens a flat range so it always has a span.
    #[must_use]
    pub fn normalized(a: f64, b: f64) -> Self {
        let (min, max) = if a <= b { (a, b) } else { (b, a) };
        if max - min > f64::EPSILON {
            return Self { min, max };
        }
        let pad = if min.abs() > 1.0 { min.abs() * 0.05 } else { 1.0 };
        Self {
            min: min - pad,
            max: max + pad,
        }
    }
}

/// Linear value to pixel mapping along one axis of a graph band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
}

impl LinearScale {
    pub fn new(domain_start: f64, domain_end: f64) -> ChartResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(ChartError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
        })
    }

    pub fn from_range(range: VisibleRange) -> ChartResult<Self> {
        Self::new(range.min, range.max)
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    /// Maps a value into `[0, extent]`.
    #[must_use]
    pub fn domain_to_pixel(self, value: f64, extent: f64) -> f64 {
        let span = self.domain_end - self.domain_start;
        (value - self.domain_start) / span * extent
    }

    #[must_use]
    pub fn pixel_to_domain(self, pixel: f64, extent: f64) -> f64 {
        if extent <= 0.0 {
            return self.domain_start;
        }
        let span = self.domain_end - self.domain_start;
        self.domain_start + pixel / extent * span
    }

    /// Device y of `value` inside a graph band; larger values sit higher.
    #[must_use]
    pub fn value_to_band_y(self, value: f64, band: DeviceRect) -> f64 {
        band.bottom() - self.domain_to_pixel(value, band.height)
    }

    #[must_use]
    pub fn band_y_to_value(self, device_y: f64, band: DeviceRect) -> f64 {
        self.pixel_to_domain(band.bottom() - device_y, band.height)
    }
}
