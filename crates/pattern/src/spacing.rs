use serde::{Deserialize, Serialize};

/// Gap parameter between neighbouring boxes, kept within [-1, 1].
///
/// Zero places box centers one unit apart; -1 collapses every row onto its
/// plane origin; 1 doubles the distance.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Spacing(f32);

impl Spacing {
    pub const MIN: f32 = -1.0;
    pub const MAX: f32 = 1.0;

    /// Clamp `value` into range. NaN is treated as zero.
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self(0.0);
        }
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn value(self) -> f32 {
        self.0
    }

    /// Distance between adjacent box centers.
    pub fn step(self) -> f32 {
        step(self.0)
    }
}

impl From<f32> for Spacing {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

/// Distance between adjacent box centers for a raw spacing value.
pub fn step(spacing: f32) -> f32 {
    1.0 + spacing
}
