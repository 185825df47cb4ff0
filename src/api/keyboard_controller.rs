use tracing::trace;

use crate::core::MarkerKind;
use crate::error::ChartResult;
use crate::interaction::{Key, Modifiers};
use crate::render::DrawingSurface;

use super::{ChartEngine, MarkerCoordinator, MarkerPositionOptions, WheelMode};

/// Wheel scroll distance without and with Shift held.
const WHEEL_PAN_PX: i64 = 10;
const WHEEL_PAN_FAST_PX: i64 = 100;

impl<S: DrawingSurface> ChartEngine<S> {
    /// Handles a key press. Returns `true` when the key was consumed.
    ///
    /// Marker steps are multiplied by ten per held modifier and stop at the
    /// first and last sample. In a chart drawn only with bars the arrow keys
    /// select the next or previous bar instead, wrapping at both ends.
    pub fn key_down(&mut self, key: Key, modifiers: Modifiers) -> ChartResult<bool> {
        self.ensure_alive()?;
        trace!(?key, ?modifiers, "key down");
        let steps = modifiers.step_multiplier() as i64;
        let page = self.core.behavior.page_step as i64;
        let bar_chart = self.core.model.is_bar_chart();
        let handled = match key {
            Key::Left if bar_chart => self.select_previous_bar()?.is_some(),
            Key::Right if bar_chart => self.select_next_bar()?.is_some(),
            Key::Left => self.step_keyboard_marker(-steps),
            Key::Right => self.step_keyboard_marker(steps),
            Key::PageUp => self.step_keyboard_marker(-page.saturating_mul(steps)),
            Key::PageDown => self.step_keyboard_marker(page.saturating_mul(steps)),
            Key::Home => self.move_keyboard_marker_to(0),
            Key::End => self.move_keyboard_marker_to(usize::MAX),
            Key::Plus => {
                self.apply_zoom(None, self.key_zoom_factor(modifiers));
                true
            }
            Key::Minus => {
                self.apply_zoom(None, 1.0 / self.key_zoom_factor(modifiers));
                true
            }
            Key::Escape => self.cancel_drag()?,
        };
        Ok(handled)
    }

    /// Handles one wheel notch; positive `delta` scrolls away from the user.
    pub fn wheel(&mut self, x: f64, delta: f64, modifiers: Modifiers) -> ChartResult<bool> {
        self.ensure_alive()?;
        if !delta.is_finite() || delta == 0.0 || !self.core.model.has_graph() {
            return Ok(false);
        }
        let handled = match self.core.behavior.wheel_mode {
            WheelMode::Zoom if modifiers.ctrl || modifiers.shift => {
                let step = if modifiers.shift {
                    WHEEL_PAN_FAST_PX
                } else {
                    WHEEL_PAN_PX
                };
                let delta_px = if delta > 0.0 { -step } else { step };
                self.apply_pan(delta_px) != 0
            }
            WheelMode::Zoom => {
                let pivot = x.is_finite().then_some(x);
                let factor = self.core.behavior.zoom_factor;
                if delta > 0.0 {
                    self.apply_zoom(pivot, factor)
                } else {
                    self.apply_zoom(pivot, 1.0 / factor)
                }
            }
            WheelMode::MoveMarker => {
                let steps = modifiers.step_multiplier() as i64;
                self.step_keyboard_marker(if delta > 0.0 { -steps } else { steps })
            }
        };
        Ok(handled)
    }

    /// Range marker that keyboard and wheel steps move.
    #[must_use]
    pub fn keyboard_marker(&self) -> MarkerKind {
        self.core.model.interaction.keyboard_marker()
    }

    fn key_zoom_factor(&self, modifiers: Modifiers) -> f64 {
        if modifiers.ctrl {
            self.core.behavior.fine_zoom_factor
        } else {
            self.core.behavior.zoom_factor
        }
    }

    fn step_keyboard_marker(&mut self, delta: i64) -> bool {
        let kind = self.core.model.interaction.keyboard_marker();
        let Some(current) = self.marker_index(kind) else {
            return false;
        };
        let last = self.core.model.data.len().saturating_sub(1) as i64;
        let target = (current as i64).saturating_add(delta).clamp(0, last.max(0));
        self.move_keyboard_marker_to(target as usize)
    }

    fn move_keyboard_marker_to(&mut self, value_index: usize) -> bool {
        if !self.core.model.has_graph() {
            return false;
        }
        let kind = self.core.model.interaction.keyboard_marker();
        MarkerCoordinator::set_position(self, kind, value_index, MarkerPositionOptions::default());
        true
    }
}
