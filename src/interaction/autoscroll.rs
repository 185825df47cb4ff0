use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::{TaskHandle, ViewportTransform};

/// Tick cadence while a dragged marker is outside the viewport (50 ticks/s).
pub const AUTOSCROLL_INTERVAL_MS: u64 = 20;

/// `(minimum penetration depth px, scroll step px)`, deepest row first.
///
/// Each tick scrolls by the penetration depth rounded down to the row
/// threshold, capped at 200 px. The left edge ignores the first pixel past
/// the border, so its shallowest row starts at 2 px.
pub const LEFT_EDGE_STEPS: [(i64, i64); 7] = [
    (200, 200),
    (100, 100),
    (50, 50),
    (20, 20),
    (10, 10),
    (5, 5),
    (2, 2),
];

/// Right edge rows; scrolling starts one pixel past the last visible column.
pub const RIGHT_EDGE_STEPS: [(i64, i64); 7] = [
    (200, 200),
    (100, 100),
    (50, 50),
    (20, 20),
    (10, 10),
    (5, 5),
    (1, 1),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScrollEdge {
    Left,
    Right,
}

/// Step size for a position `depth` pixels past `edge`.
#[must_use]
pub fn autoscroll_step(edge: ScrollEdge, depth: i64) -> i64 {
    let table: &[(i64, i64)] = match edge {
        ScrollEdge::Left => &LEFT_EDGE_STEPS,
        ScrollEdge::Right => &RIGHT_EDGE_STEPS,
    };
    table
        .iter()
        .find(|(threshold, _)| depth >= *threshold)
        .map_or(0, |(_, step)| *step)
}

/// Edge and penetration depth of `device_x`.
///
/// Left depth is measured from device x 0 and starts below -1; right depth
/// is measured from `visible_width` and starts above it. Anything in
/// `[-1, visible_width]` does not scroll.
#[must_use]
pub fn edge_penetration(device_x: f64, visible_width: i64) -> Option<(ScrollEdge, i64)> {
    if !device_x.is_finite() {
        return None;
    }
    let device_x = device_x.floor() as i64;
    if device_x < -1 {
        Some((ScrollEdge::Left, -device_x))
    } else if device_x > visible_width {
        Some((ScrollEdge::Right, device_x - visible_width))
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The viewport moved by the contained signed delta; schedule another tick.
    Scrolled(i64),
    /// The viewport reached its border; the session is finished.
    Halted,
}

/// Generation-guarded edge scrolling.
///
/// Every session bumps the generation; a tick carrying an older generation
/// is stale and must be ignored. The pending handle is kept so callers can
/// also cancel the queued tick outright.
#[derive(Debug, Clone, Default)]
pub struct AutoscrollController {
    generation: u64,
    active: bool,
    pending: Option<TaskHandle>,
    ticks: u64,
}

impl AutoscrollController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub fn is_current(&self, generation: u64) -> bool {
        self.active && self.generation == generation
    }

    /// Total ticks that scrolled the viewport, for diagnostics.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    /// Starts a session and returns its generation.
    pub fn begin(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.active = true;
        self.pending = None;
        debug!(generation = self.generation, "autoscroll started");
        self.generation
    }

    pub fn set_pending(&mut self, handle: TaskHandle) {
        self.pending = Some(handle);
    }

    /// Ends the session; queued ticks become stale. Returns the handle of the
    /// queued tick, if any, so it can be cancelled.
    pub fn cancel(&mut self) -> Option<TaskHandle> {
        if self.active {
            debug!(generation = self.generation, "autoscroll stopped");
        }
        self.generation = self.generation.wrapping_add(1);
        self.active = false;
        self.pending.take()
    }

    /// Applies one step for a position `depth` pixels past `edge`.
    pub fn step(
        &mut self,
        viewport: &mut ViewportTransform,
        edge: ScrollEdge,
        depth: i64,
    ) -> TickOutcome {
        let step = autoscroll_step(edge, depth);
        let delta = match edge {
            ScrollEdge::Left => -step,
            ScrollEdge::Right => step,
        };
        let applied = viewport.pan_by(delta);
        let at_border = match edge {
            ScrollEdge::Left => viewport.left_border() == 0,
            ScrollEdge::Right => viewport.left_border() == viewport.max_left_border(),
        };
        trace!(?edge, depth, step, applied, "autoscroll tick");
        if applied != 0 {
            self.ticks += 1;
        }
        if at_border {
            TickOutcome::Halted
        } else {
            TickOutcome::Scrolled(applied)
        }
    }
}
