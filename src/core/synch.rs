use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::scale::VisibleRange;
use crate::core::series::SeriesId;

/// Min/max table shared between companion charts so that a y range adjusted
/// in one chart is kept when another chart with the same series is rebuilt.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SynchedMinMaxKeeper {
    min_values: IndexMap<SeriesId, f64>,
    max_values: IndexMap<SeriesId, f64>,
}

pub type SharedMinMaxKeeper = Rc<RefCell<SynchedMinMaxKeeper>>;

impl SynchedMinMaxKeeper {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn shared() -> SharedMinMaxKeeper {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Seeds or replaces an entry. Only the owning chart calls this.
    pub fn insert(&mut self, series_id: SeriesId, range: VisibleRange) {
        self.min_values.insert(series_id, range.min);
        self.max_values.insert(series_id, range.max);
    }

    /// Overwrites an entry that is already present; never inserts.
    ///
    /// Returns `true` when the entry existed.
    pub fn update_existing(&mut self, series_id: SeriesId, range: VisibleRange) -> bool {
        let mut updated = false;
        if let Some(min) = self.min_values.get_mut(&series_id) {
            *min = range.min;
            updated = true;
        }
        if let Some(max) = self.max_values.get_mut(&series_id) {
            *max = range.max;
            updated = true;
        }
        updated
    }

    #[must_use]
    pub fn get(&self, series_id: SeriesId) -> Option<VisibleRange> {
        let min = *self.min_values.get(&series_id)?;
        let max = *self.max_values.get(&series_id)?;
        Some(VisibleRange { min, max })
    }

    #[must_use]
    pub fn contains(&self, series_id: SeriesId) -> bool {
        self.min_values.contains_key(&series_id) || self.max_values.contains_key(&series_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.min_values.len().max(self.max_values.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min_values.is_empty() && self.max_values.is_empty()
    }

    pub fn clear(&mut self) {
        self.min_values.clear();
        self.max_values.clear();
    }
}

/// Zoom and marker position of a chart, applied to a companion chart so both
/// show the same section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SynchConfiguration {
    pub zoom_ratio: f64,
    pub left_border_ratio: f64,
    /// Range marker positions as ratios of the x value range.
    pub left_marker_ratio: f64,
    pub right_marker_ratio: f64,
}
