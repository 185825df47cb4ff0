use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};

use crate::core::{SeriesId, ViewportState};

/// Range markers were moved; indices are resolved left/right by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerMoved {
    pub left_index: usize,
    pub right_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointSelected {
    pub series_id: Option<SeriesId>,
    pub value_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoveredValueChanged {
    pub value_index: Option<usize>,
}

/// Zoom, scroll position or visible width changed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportResized {
    pub state: ViewportState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayRangeMoved {
    pub start_index: usize,
    pub end_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointDoubleClicked {
    pub series_id: SeriesId,
    pub value_index: usize,
}

type Callback<E> = Rc<dyn Fn(&E)>;
type Entries<E> = Rc<RefCell<Vec<(u64, Callback<E>)>>>;

/// Typed subscriber list for one event type.
///
/// Dispatch iterates a snapshot taken before the first callback runs, so a
/// listener may unsubscribe itself or others while being notified; removed
/// listeners still receive the event that was already in flight.
pub struct ListenerRegistry<E> {
    entries: Entries<E>,
    next_id: Cell<u64>,
}

impl<E> Default for ListenerRegistry<E> {
    fn default() -> Self {
        Self {
            entries: Rc::new(RefCell::new(Vec::new())),
            next_id: Cell::new(1),
        }
    }
}

impl<E> fmt::Debug for ListenerRegistry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.entries.borrow().len())
            .finish()
    }
}

impl<E: 'static> ListenerRegistry<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, callback: impl Fn(&E) + 'static) -> Subscription<E> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let callback: Callback<E> = Rc::new(callback);
        self.entries.borrow_mut().push((id, callback));
        Subscription {
            id,
            entries: Rc::downgrade(&self.entries),
        }
    }

    /// Notifies every listener registered when dispatch started.
    pub fn dispatch(&self, event: &E) {
        let snapshot: Vec<Callback<E>> = self
            .entries
            .borrow()
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();
        for callback in snapshot {
            callback(event);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

/// Handle returned by `subscribe`; dropping it keeps the listener alive.
pub struct Subscription<E> {
    id: u64,
    entries: Weak<RefCell<Vec<(u64, Callback<E>)>>>,
}

impl<E> Clone for Subscription<E> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            entries: Weak::clone(&self.entries),
        }
    }
}

impl<E> fmt::Debug for Subscription<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl<E> Subscription<E> {
    /// Removes the listener. Returns `false` when it was already removed or
    /// the registry is gone.
    pub fn unsubscribe(&self) -> bool {
        let Some(entries) = self.entries.upgrade() else {
            return false;
        };
        let Ok(mut entries) = entries.try_borrow_mut() else {
            return false;
        };
        let before = entries.len();
        entries.retain(|(id, _)| *id != self.id);
        before != entries.len()
    }
}

/// All event registries of one chart.
#[derive(Debug, Default)]
pub struct ChartListeners {
    pub marker_moved: ListenerRegistry<MarkerMoved>,
    pub point_selected: ListenerRegistry<PointSelected>,
    pub hovered_value_changed: ListenerRegistry<HoveredValueChanged>,
    pub viewport_resized: ListenerRegistry<ViewportResized>,
    pub overlay_range_moved: ListenerRegistry<OverlayRangeMoved>,
    pub point_double_clicked: ListenerRegistry<PointDoubleClicked>,
}

impl ChartListeners {
    pub fn clear(&self) {
        self.marker_moved.clear();
        self.point_selected.clear();
        self.hovered_value_changed.clear();
        self.viewport_resized.clear();
        self.overlay_range_moved.clear();
        self.point_double_clicked.clear();
    }
}
