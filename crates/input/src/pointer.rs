use crate::action::Action;
use glam::Vec2;

/// Mouse buttons the controls care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Turns button and cursor updates into drag actions.
///
/// Primary drag rotates, secondary or middle drag pans.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    held: Option<PointerButton>,
    last: Option<Vec2>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.held.is_some()
    }

    pub fn button(&mut self, button: PointerButton, pressed: bool) {
        if pressed {
            if self.held.is_none() {
                self.held = Some(button);
            }
        } else if self.held == Some(button) {
            self.held = None;
        }
    }

    /// Record a cursor position. Returns a drag action while a button is held.
    pub fn moved(&mut self, position: Vec2) -> Option<Action> {
        let previous = self.last.replace(position);
        let delta = position - previous?;
        let action = match self.held? {
            PointerButton::Primary => Action::Rotate(delta),
            PointerButton::Secondary | PointerButton::Middle => Action::Pan(delta),
        };
        (!action.is_noop()).then_some(action)
    }

    /// Cursor left the window; the next move starts a fresh delta.
    pub fn left(&mut self) {
        self.last = None;
        self.held = None;
    }

    pub fn scrolled(&mut self, lines: f32) -> Option<Action> {
        let action = Action::Zoom(lines);
        (!action.is_noop()).then_some(action)
    }
}
