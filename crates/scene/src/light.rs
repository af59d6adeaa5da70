use crossfield_common::rgb_from_hex;
use glam::Vec3;

/// Uniform light applied to every surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: Vec3,
    pub intensity: f32,
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self {
            color: rgb_from_hex(0xffffff),
            intensity: 2.0,
        }
    }
}

impl AmbientLight {
    /// Color premultiplied by intensity.
    pub fn radiance(&self) -> Vec3 {
        self.color * self.intensity
    }
}

/// Rectangular area light facing a target point. Hidden by default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectLight {
    pub position: Vec3,
    pub target: Vec3,
    pub color: Vec3,
    pub intensity: f32,
    pub width: f32,
    pub height: f32,
    pub visible: bool,
}

impl Default for RectLight {
    fn default() -> Self {
        Self {
            position: Vec3::new(5.0, 5.0, 5.0),
            target: Vec3::ZERO,
            color: rgb_from_hex(0x0000ff),
            intensity: 10.0,
            width: 10.0,
            height: 10.0,
            visible: false,
        }
    }
}

impl RectLight {
    /// Unit vector the emitting face points along.
    pub fn direction(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }
}
