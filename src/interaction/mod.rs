mod autoscroll;
mod smooth_scroll;

pub use autoscroll::{
    AUTOSCROLL_INTERVAL_MS, AutoscrollController, LEFT_EDGE_STEPS, RIGHT_EDGE_STEPS, ScrollEdge,
    TickOutcome, autoscroll_step, edge_penetration,
};
pub use smooth_scroll::{SMOOTH_SCROLL_INTERVAL_MS, SMOOTH_SCROLL_STEP_PX, SmoothScroller};

use serde::{Deserialize, Serialize};

use crate::core::{DevicePoint, MarkerKind, SeriesId};

/// Mutually exclusive pointer modes, listed from highest to lowest
/// pointer-down priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionMode {
    Idle,
    DraggingXMarker,
    DraggingChartPan,
    DraggingYMarker,
    DraggingOverlayRangeMarker,
}

/// What a live drag session moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragTarget {
    XMarker(MarkerKind),
    YMarker { series_id: SeriesId, kind: MarkerKind },
    OverlayRange,
}

/// The single live drag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragSession {
    pub mode: InteractionMode,
    pub target: Option<DragTarget>,
    pub start_device_pos: DevicePoint,
    pub current_device_pos: DevicePoint,
    /// Distance between the pointer and the dragged line at pointer-down.
    pub click_offset: f64,
    /// Index state at pointer-down, used by whole-range drags.
    pub start_indices: (usize, usize),
}

impl DragSession {
    #[must_use]
    pub fn new(mode: InteractionMode, target: Option<DragTarget>, position: DevicePoint) -> Self {
        Self {
            mode,
            target,
            start_device_pos: position,
            current_device_pos: position,
            click_offset: 0.0,
            start_indices: (0, 0),
        }
    }

    #[must_use]
    pub fn with_click_offset(mut self, click_offset: f64) -> Self {
        self.click_offset = click_offset;
        self
    }

    #[must_use]
    pub fn with_start_indices(mut self, start: usize, end: usize) -> Self {
        self.start_indices = (start, end);
        self
    }

    #[must_use]
    pub fn delta_x(&self) -> f64 {
        self.current_device_pos.x - self.start_device_pos.x
    }

    /// Pointer x corrected by the click offset.
    #[must_use]
    pub fn line_x(&self) -> f64 {
        self.current_device_pos.x - self.click_offset
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
    };

    #[must_use]
    pub const fn ctrl() -> Self {
        Self {
            shift: false,
            ctrl: true,
            alt: false,
        }
    }

    #[must_use]
    pub const fn shift() -> Self {
        Self {
            shift: true,
            ctrl: false,
            alt: false,
        }
    }

    #[must_use]
    pub fn count(self) -> u32 {
        u32::from(self.shift) + u32::from(self.ctrl) + u32::from(self.alt)
    }

    /// Step multiplier, ×10 per held modifier.
    #[must_use]
    pub fn step_multiplier(self) -> usize {
        10usize.pow(self.count())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    PageUp,
    PageDown,
    Home,
    End,
    Plus,
    Minus,
    Escape,
}

/// Chart state captured at a secondary click, consumed by context menu actions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContextMenuState {
    pub position: DevicePoint,
    pub value_index: Option<usize>,
    pub hovered_marker: Option<MarkerKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InteractionState {
    drag: Option<DragSession>,
    pointer: Option<DevicePoint>,
    keyboard_marker: MarkerKind,
    hovered_marker: Option<MarkerKind>,
    context_menu: Option<ContextMenuState>,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self {
            drag: None,
            pointer: None,
            keyboard_marker: MarkerKind::RangeA,
            hovered_marker: None,
            context_menu: None,
        }
    }
}

impl InteractionState {
    #[must_use]
    pub fn mode(&self) -> InteractionMode {
        self.drag.map_or(InteractionMode::Idle, |drag| drag.mode)
    }

    #[must_use]
    pub fn drag(&self) -> Option<DragSession> {
        self.drag
    }

    pub fn drag_mut(&mut self) -> Option<&mut DragSession> {
        self.drag.as_mut()
    }

    /// Starts a drag session, replacing none: callers end the previous one first.
    pub fn begin_drag(&mut self, session: DragSession) {
        self.drag = Some(session);
        if let Some(DragTarget::XMarker(kind)) = session.target {
            self.keyboard_marker = kind;
        }
    }

    pub fn end_drag(&mut self) -> Option<DragSession> {
        self.drag.take()
    }

    #[must_use]
    pub fn pointer(&self) -> Option<DevicePoint> {
        self.pointer
    }

    pub fn on_pointer_move(&mut self, position: DevicePoint) {
        self.pointer = Some(position);
        if let Some(drag) = self.drag.as_mut() {
            drag.current_device_pos = position;
        }
    }

    pub fn on_pointer_leave(&mut self) {
        self.pointer = None;
        self.hovered_marker = None;
    }

    #[must_use]
    pub fn keyboard_marker(&self) -> MarkerKind {
        self.keyboard_marker
    }

    pub fn set_keyboard_marker(&mut self, kind: MarkerKind) {
        if matches!(kind, MarkerKind::RangeA | MarkerKind::RangeB) {
            self.keyboard_marker = kind;
        }
    }

    #[must_use]
    pub fn hovered_marker(&self) -> Option<MarkerKind> {
        self.hovered_marker
    }

    /// Returns `true` when the highlighted marker changed.
    pub fn set_hovered_marker(&mut self, kind: Option<MarkerKind>) -> bool {
        let changed = self.hovered_marker != kind;
        self.hovered_marker = kind;
        changed
    }

    #[must_use]
    pub fn context_menu(&self) -> Option<ContextMenuState> {
        self.context_menu
    }

    pub fn set_context_menu(&mut self, state: Option<ContextMenuState>) {
        self.context_menu = state;
    }
}
