use tracing::{debug, trace};

use crate::core::{TaskHandle, ViewportTransform};

use super::TickOutcome;

/// Tick cadence of an animated scroll.
pub const SMOOTH_SCROLL_INTERVAL_MS: u64 = 10;

/// Pixels moved per smooth scroll tick.
pub const SMOOTH_SCROLL_STEP_PX: u32 = 5;

/// Generation-guarded animated scroll towards a target left border.
///
/// Each tick moves a fixed step; the last step snaps onto the target once the
/// remaining distance is no larger than one step.
#[derive(Debug, Clone, Default)]
pub struct SmoothScroller {
    generation: u64,
    target: Option<i64>,
    pending: Option<TaskHandle>,
}

impl SmoothScroller {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.target.is_some()
    }

    #[must_use]
    pub fn is_current(&self, generation: u64) -> bool {
        self.target.is_some() && self.generation == generation
    }

    /// Left border the running animation ends on.
    #[must_use]
    pub fn target(&self) -> Option<i64> {
        self.target
    }

    /// Starts an animation, replacing a running one. Returns its generation.
    pub fn begin(&mut self, target: i64) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.target = Some(target);
        self.pending = None;
        debug!(generation = self.generation, target, "smooth scroll started");
        self.generation
    }

    pub fn set_pending(&mut self, handle: TaskHandle) {
        self.pending = Some(handle);
    }

    /// Ends the animation where it is. Returns the queued tick, if any.
    pub fn cancel(&mut self) -> Option<TaskHandle> {
        if self.target.take().is_some() {
            debug!(generation = self.generation, "smooth scroll stopped");
        }
        self.generation = self.generation.wrapping_add(1);
        self.pending.take()
    }

    /// Moves `viewport` one step towards the target.
    pub fn step(&mut self, viewport: &mut ViewportTransform, step_px: u32) -> TickOutcome {
        let Some(target) = self.target else {
            return TickOutcome::Halted;
        };
        let target = target.clamp(0, viewport.max_left_border());
        let step = i64::from(step_px.max(1));
        let remaining = target - viewport.left_border();
        if remaining.abs() <= step {
            viewport.set_left_border(target);
            self.target = None;
            self.pending = None;
            trace!(target, "smooth scroll reached target");
            return TickOutcome::Halted;
        }
        let applied = viewport.pan_by(remaining.signum() * step);
        trace!(applied, remaining, "smooth scroll tick");
        TickOutcome::Scrolled(applied)
    }
}
