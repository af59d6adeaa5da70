use glam::Vec2;

/// A camera-control request produced from pointer input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Orbit around the target by a pointer delta in pixels.
    Rotate(Vec2),
    /// Slide the target in the view plane by a pointer delta in pixels.
    Pan(Vec2),
    /// Dolly toward (positive) or away from (negative) the target, in scroll lines.
    Zoom(f32),
    /// Return to the initial view.
    Reset,
}

impl Action {
    /// Whether applying this action would change nothing.
    pub fn is_noop(&self) -> bool {
        match self {
            Action::Rotate(d) | Action::Pan(d) => *d == Vec2::ZERO,
            Action::Zoom(z) => *z == 0.0,
            Action::Reset => false,
        }
    }
}
