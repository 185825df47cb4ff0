use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ChartError, ChartResult};

/// Stable identifier of one y series inside a data model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeriesId(pub u32);

impl SeriesId {
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GraphKind {
    Line,
    Dot,
    /// Sparse samples drawn as isolated strokes, e.g. a multi-year history.
    History,
    Bar,
    LineWithBar,
}

impl GraphKind {
    /// Bar-like graphs are hit-tested with explicit per-bar rectangles.
    #[must_use]
    pub fn uses_bar_hit_areas(self) -> bool {
        matches!(self, Self::Bar | Self::LineWithBar)
    }
}

/// One precomputed axis tick supplied by the data-model collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisUnit {
    pub value: f64,
    pub label: String,
    pub is_major: bool,
}

impl AxisUnit {
    #[must_use]
    pub fn new(value: f64, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
            is_major: false,
        }
    }

    #[must_use]
    pub fn major(mut self) -> Self {
        self.is_major = true;
        self
    }
}

/// Titled index range drawn above the graphs, e.g. one tour inside a multi-tour chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleSegment {
    pub start_index: usize,
    pub end_index: usize,
    pub title: String,
}

impl TitleSegment {
    #[must_use]
    pub fn new(start_index: usize, end_index: usize, title: impl Into<String>) -> Self {
        Self {
            start_index,
            end_index,
            title: title.into(),
        }
    }
}

/// Ascending x values shared by all y series.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct XSeries {
    pub values: Vec<f64>,
    pub unit_label: String,
    pub units: Vec<AxisUnit>,
}

impl XSeries {
    #[must_use]
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            unit_label: String::new(),
            units: Vec::new(),
        }
    }

    /// Builds x values as unix seconds from UTC timestamps.
    #[must_use]
    pub fn from_datetimes(times: &[DateTime<Utc>]) -> Self {
        Self::new(times.iter().map(|time| datetime_to_unix_seconds(*time)).collect())
    }

    #[must_use]
    pub fn with_unit_label(mut self, label: impl Into<String>) -> Self {
        self.unit_label = label.into();
        self
    }

    #[must_use]
    pub fn with_units(mut self, units: Vec<AxisUnit>) -> Self {
        self.units = units;
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn value(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Index of the sample closest to `value`.
    ///
    /// Ties resolve to the lower index.
    #[must_use]
    pub fn nearest_index(&self, value: f64) -> Option<usize> {
        if self.values.is_empty() || !value.is_finite() {
            return None;
        }
        let upper = self.values.partition_point(|candidate| *candidate < value);
        if upper == 0 {
            return Some(0);
        }
        if upper >= self.values.len() {
            return Some(self.values.len() - 1);
        }
        let below = value - self.values[upper - 1];
        let above = self.values[upper] - value;
        Some(if above < below { upper } else { upper - 1 })
    }
}

/// One y series of a chart. `low` is set for range-style graphs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YSeries {
    pub id: SeriesId,
    pub label: String,
    pub unit_label: String,
    pub high: Vec<f64>,
    pub low: Option<Vec<f64>>,
    pub kind: GraphKind,
    pub min_override: Option<f64>,
    pub max_override: Option<f64>,
}

impl YSeries {
    #[must_use]
    pub fn new(id: SeriesId, label: impl Into<String>, high: Vec<f64>) -> Self {
        Self {
            id,
            label: label.into(),
            unit_label: String::new(),
            high,
            low: None,
            kind: GraphKind::Line,
            min_override: None,
            max_override: None,
        }
    }

    pub fn from_decimals(
        id: SeriesId,
        label: impl Into<String>,
        values: &[Decimal],
    ) -> ChartResult<Self> {
        let high = values
            .iter()
            .map(|value| decimal_to_f64(*value, "y value"))
            .collect::<ChartResult<Vec<_>>>()?;
        Ok(Self::new(id, label, high))
    }

    #[must_use]
    pub fn with_kind(mut self, kind: GraphKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn with_low(mut self, low: Vec<f64>) -> Self {
        self.low = Some(low);
        self
    }

    #[must_use]
    pub fn with_unit_label(mut self, label: impl Into<String>) -> Self {
        self.unit_label = label.into();
        self
    }

    #[must_use]
    pub fn with_min_override(mut self, min: f64) -> Self {
        self.min_override = Some(min);
        self
    }

    #[must_use]
    pub fn with_max_override(mut self, max: f64) -> Self {
        self.max_override = Some(max);
        self
    }

    /// Value at `index` when it exists and is finite.
    ///
    /// A y array shorter than the x array simply yields `None` for the
    /// missing tail.
    #[must_use]
    pub fn high_at(&self, index: usize) -> Option<f64> {
        self.high.get(index).copied().filter(|value| value.is_finite())
    }

    #[must_use]
    pub fn low_at(&self, index: usize) -> Option<f64> {
        self.low
            .as_ref()
            .and_then(|low| low.get(index).copied())
            .filter(|value| value.is_finite())
    }

    /// Min/max over the first `len` samples of both value arrays.
    #[must_use]
    pub fn data_range(&self, len: usize) -> Option<(f64, f64)> {
        let mut range: Option<(f64, f64)> = None;
        for index in 0..len {
            for value in [self.high_at(index), self.low_at(index)].into_iter().flatten() {
                range = Some(match range {
                    Some((min, max)) => (min.min(value), max.max(value)),
                    None => (value, value),
                });
            }
        }
        range
    }
}

/// Read-only chart input supplied by the host.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartDataModel {
    pub title: String,
    pub x: XSeries,
    pub y_series: Vec<YSeries>,
    pub segments: Vec<TitleSegment>,
    /// Message shown instead of graphs when the host has nothing to display.
    pub error_message: Option<String>,
}

impl ChartDataModel {
    #[must_use]
    pub fn new(x: XSeries) -> Self {
        Self {
            title: String::new(),
            x,
            y_series: Vec::new(),
            segments: Vec::new(),
            error_message: None,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_series(mut self, series: YSeries) -> Self {
        self.y_series.push(series);
        self
    }

    #[must_use]
    pub fn with_segment(mut self, segment: TitleSegment) -> Self {
        self.segments.push(segment);
        self
    }

    #[must_use]
    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    /// Number of samples addressable by a value index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// A model without samples or without any y series cannot be drawn.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty() || self.y_series.is_empty()
    }

    #[must_use]
    pub fn x_range(&self) -> Option<(f64, f64)> {
        let first = *self.x.values.first()?;
        let last = *self.x.values.last()?;
        Some((first, last))
    }

    #[must_use]
    pub fn series(&self, id: SeriesId) -> Option<&YSeries> {
        self.y_series.iter().find(|series| series.id == id)
    }

    #[must_use]
    pub fn clamp_index(&self, index: usize) -> usize {
        index.min(self.len().saturating_sub(1))
    }

    /// Drops the samples and series the engine cannot draw.
    ///
    /// Non-finite x values and x values below their predecessor are removed
    /// together with the y samples at the same index, and a repeated series
    /// id keeps only its first series. When no x value survives, the model
    /// falls back to the no-graph state with an error message.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        let mut seen: Vec<SeriesId> = Vec::with_capacity(self.y_series.len());
        self.y_series.retain(|series| {
            if seen.contains(&series.id) {
                warn!(series = series.id.0, "duplicate series id dropped");
                return false;
            }
            seen.push(series.id);
            true
        });

        let mut last = f64::NEG_INFINITY;
        let keep: Vec<bool> = self
            .x
            .values
            .iter()
            .map(|&value| {
                let usable = value.is_finite() && value >= last;
                if usable {
                    last = value;
                }
                usable
            })
            .collect();
        let dropped = keep.iter().filter(|usable| !**usable).count();
        if dropped == 0 {
            return self;
        }
        warn!(
            dropped,
            total = keep.len(),
            "x values that are not finite or not ascending were skipped"
        );

        retain_kept(&mut self.x.values, &keep);
        for series in &mut self.y_series {
            retain_kept(&mut series.high, &keep);
            if let Some(low) = series.low.as_mut() {
                retain_kept(low, &keep);
            }
        }
        let kept_before = |index: usize| keep.iter().take(index).filter(|usable| **usable).count();
        let last_index = self.x.len().saturating_sub(1);
        for segment in &mut self.segments {
            segment.start_index = kept_before(segment.start_index).min(last_index);
            segment.end_index = kept_before(segment.end_index.saturating_add(1))
                .saturating_sub(1)
                .max(segment.start_index)
                .min(last_index);
        }
        if self.x.is_empty() && self.error_message.is_none() {
            self.error_message = Some(NO_VALID_X_MESSAGE.to_owned());
        }
        self
    }
}

const NO_VALID_X_MESSAGE: &str = "No valid x values";

/// Keeps the items whose index is marked usable; items past `keep` stay.
fn retain_kept(values: &mut Vec<f64>, keep: &[bool]) {
    let mut index = 0;
    values.retain(|_| {
        let usable = keep.get(index).copied().unwrap_or(true);
        index += 1;
        usable
    });
}

pub fn decimal_to_f64(value: Decimal, field_name: &str) -> ChartResult<f64> {
    value.to_f64().ok_or_else(|| {
        ChartError::InvalidData(format!("{field_name} cannot be represented as f64"))
    })
}

#[must_use]
pub fn datetime_to_unix_seconds(time: DateTime<Utc>) -> f64 {
    time.timestamp_millis() as f64 / 1000.0
}
