use glam::Vec3;
use std::fmt;
use std::ops::RangeInclusive;

/// Tunable material property exposed in the control panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialParam {
    Roughness,
    Metalness,
    EnvMapIntensity,
}

impl MaterialParam {
    pub const ALL: [MaterialParam; 3] = [
        MaterialParam::Roughness,
        MaterialParam::Metalness,
        MaterialParam::EnvMapIntensity,
    ];

    /// Accepted values; assignments outside are clamped.
    pub fn range(self) -> RangeInclusive<f32> {
        match self {
            MaterialParam::Roughness | MaterialParam::Metalness => 0.0..=1.0,
            MaterialParam::EnvMapIntensity => 0.0..=2.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MaterialParam::Roughness => "Roughness",
            MaterialParam::Metalness => "Metalness",
            MaterialParam::EnvMapIntensity => "Env Map Intensity",
        }
    }
}

impl fmt::Display for MaterialParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Physically based material shared by every box.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub color: Vec3,
    pub roughness: f32,
    pub metalness: f32,
    pub env_map_intensity: f32,
    /// Source of the environment map bound to this material, if any.
    pub env_map: Option<String>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            roughness: 0.09,
            metalness: 1.0,
            env_map_intensity: 0.9,
            env_map: None,
        }
    }
}

impl Material {
    pub fn get(&self, param: MaterialParam) -> f32 {
        match param {
            MaterialParam::Roughness => self.roughness,
            MaterialParam::Metalness => self.metalness,
            MaterialParam::EnvMapIntensity => self.env_map_intensity,
        }
    }

    /// Assign a clamped value and return the previous one.
    pub fn set(&mut self, param: MaterialParam, value: f32) -> f32 {
        let range = param.range();
        let value = value.clamp(*range.start(), *range.end());
        let slot = match param {
            MaterialParam::Roughness => &mut self.roughness,
            MaterialParam::Metalness => &mut self.metalness,
            MaterialParam::EnvMapIntensity => &mut self.env_map_intensity,
        };
        std::mem::replace(slot, value)
    }

    pub fn has_env_map(&self) -> bool {
        self.env_map.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_polished_metal() {
        let m = Material::default();
        assert_eq!(m.get(MaterialParam::Metalness), 1.0);
        assert_eq!(m.get(MaterialParam::Roughness), 0.09);
        assert_eq!(m.get(MaterialParam::EnvMapIntensity), 0.9);
        assert!(!m.has_env_map());
    }

    #[test]
    fn set_returns_previous_and_clamps() {
        let mut m = Material::default();
        assert_eq!(m.set(MaterialParam::Roughness, 0.5), 0.09);
        assert_eq!(m.roughness, 0.5);
        m.set(MaterialParam::EnvMapIntensity, 5.0);
        assert_eq!(m.env_map_intensity, 2.0);
        m.set(MaterialParam::Metalness, -1.0);
        assert_eq!(m.metalness, 0.0);
    }
}
