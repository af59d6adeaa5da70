use glam::{Mat4, Vec3};

/// Perspective camera looking at a target point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 10.0),
            target: Vec3::ZERO,
            fov_degrees: 75.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 2000.0,
        }
    }
}

impl Camera {
    /// Update the aspect ratio from surface dimensions. Zero sizes are ignored.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        )
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera_looks_down_negative_z() {
        let cam = Camera::default();
        assert_eq!(cam.position.z, 10.0);
        let origin = cam.view_projection().project_point3(Vec3::ZERO);
        assert!(origin.x.abs() < 1e-5);
        assert!(origin.y.abs() < 1e-5);
    }

    #[test]
    fn viewport_sets_aspect() {
        let mut cam = Camera::default();
        cam.set_viewport(800, 400);
        assert_eq!(cam.aspect, 2.0);
        cam.set_viewport(0, 400);
        assert_eq!(cam.aspect, 2.0);
    }
}
