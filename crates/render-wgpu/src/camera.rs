use crossfield_input::Action;
use crossfield_scene::Camera;
use glam::{Vec2, Vec3};
use std::f32::consts::{PI, TAU};

/// Keeps the polar angle away from the poles so `look_at` stays defined.
const POLE_EPSILON: f32 = 1e-4;

/// Orbit camera controls with optional damping (inertia).
///
/// Input accumulates pending rotation and pan; each [`OrbitControls::update`]
/// applies a `damping_factor` share of it to the camera and keeps the rest for
/// the next frame. Controls run outside the scene's own state: they only
/// rewrite the camera's position and target.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub pan_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Pending azimuth change in radians.
    delta_theta: f32,
    /// Pending polar change in radians.
    delta_phi: f32,
    pan_offset: Vec3,
    scale: f32,
    home: Option<(Vec3, Vec3)>,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: 0.25,
            rotate_speed: 1.0,
            pan_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 0.1,
            max_distance: 1000.0,
            delta_theta: 0.0,
            delta_phi: 0.0,
            pan_offset: Vec3::ZERO,
            scale: 1.0,
            home: None,
        }
    }
}

impl OrbitControls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember the camera's current view as the reset target.
    pub fn save_state(&mut self, camera: &Camera) {
        self.home = Some((camera.position, camera.target));
    }

    /// Queue an action. `viewport_height` converts pixel deltas into angles.
    pub fn apply(&mut self, action: Action, camera: &mut Camera, viewport_height: f32) {
        let height = viewport_height.max(1.0);
        match action {
            Action::Rotate(d) => {
                self.delta_theta -= TAU * d.x / height * self.rotate_speed;
                self.delta_phi -= TAU * d.y / height * self.rotate_speed;
            }
            Action::Pan(d) => self.pan(d, camera, height),
            Action::Zoom(lines) => {
                self.scale *= 0.95_f32.powf(lines * self.zoom_speed);
            }
            Action::Reset => {
                if let Some((position, target)) = self.home {
                    camera.position = position;
                    camera.target = target;
                }
                self.delta_theta = 0.0;
                self.delta_phi = 0.0;
                self.pan_offset = Vec3::ZERO;
                self.scale = 1.0;
            }
        }
    }

    fn pan(&mut self, delta: Vec2, camera: &Camera, height: f32) {
        let offset = camera.position - camera.target;
        let forward = -offset.normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward).normalize_or_zero();
        // Visible half-height at the target distance.
        let target_distance = offset.length() * (camera.fov_degrees.to_radians() / 2.0).tan();
        let per_pixel = 2.0 * target_distance / height * self.pan_speed;
        self.pan_offset += -right * delta.x * per_pixel + up * delta.y * per_pixel;
    }

    /// Advance one frame. Returns true when the camera moved.
    pub fn update(&mut self, camera: &mut Camera) -> bool {
        let offset = camera.position - camera.target;
        let mut radius = offset.length();
        if radius <= f32::EPSILON {
            radius = self.min_distance;
        }
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

        let share = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };
        theta += self.delta_theta * share;
        phi = (phi + self.delta_phi * share).clamp(POLE_EPSILON, PI - POLE_EPSILON);
        radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);

        let target = camera.target + self.pan_offset * share;
        let position = target
            + Vec3::new(
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
                radius * phi.sin() * theta.cos(),
            );

        if self.enable_damping {
            self.delta_theta *= 1.0 - self.damping_factor;
            self.delta_phi *= 1.0 - self.damping_factor;
            self.pan_offset *= 1.0 - self.damping_factor;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;

        let moved = position.distance_squared(camera.position) > 1e-8
            || target.distance_squared(camera.target) > 1e-8;
        camera.position = position;
        camera.target = target;
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settle(controls: &mut OrbitControls, camera: &mut Camera) {
        for _ in 0..200 {
            controls.update(camera);
        }
    }

    #[test]
    fn idle_update_keeps_camera() {
        let mut cam = Camera::default();
        let mut controls = OrbitControls::new();
        assert!(!controls.update(&mut cam));
        assert!((cam.position - Vec3::new(0.0, 0.0, 10.0)).length() < 1e-4);
    }

    #[test]
    fn damped_rotation_converges_to_full_angle() {
        let mut cam = Camera::default();
        let mut controls = OrbitControls::new();
        // Quarter turn of azimuth.
        let height = 400.0;
        let dx = -(PI / 2.0) * height / TAU;
        controls.apply(Action::Rotate(Vec2::new(dx, 0.0)), &mut cam, height);

        controls.update(&mut cam);
        let first = cam.position;
        assert!(first.x > 0.0 && first.x < 10.0);

        settle(&mut controls, &mut cam);
        assert!((cam.position - Vec3::new(10.0, 0.0, 0.0)).length() < 1e-2);
        assert!((cam.position.length() - 10.0).abs() < 1e-3);
    }

    #[test]
    fn undamped_rotation_applies_at_once() {
        let mut cam = Camera::default();
        let mut controls = OrbitControls {
            enable_damping: false,
            ..OrbitControls::default()
        };
        let height = 400.0;
        let dx = -(PI / 2.0) * height / TAU;
        controls.apply(Action::Rotate(Vec2::new(dx, 0.0)), &mut cam, height);
        controls.update(&mut cam);
        assert!((cam.position - Vec3::new(10.0, 0.0, 0.0)).length() < 1e-3);
        assert!(!controls.update(&mut cam));
    }

    #[test]
    fn pitch_stops_short_of_pole() {
        let mut cam = Camera::default();
        let mut controls = OrbitControls::new();
        controls.apply(Action::Rotate(Vec2::new(0.0, 10_000.0)), &mut cam, 100.0);
        settle(&mut controls, &mut cam);
        assert!(cam.position.y > 9.9);
        assert!(cam.position.x.is_finite() && cam.position.z.is_finite());
        assert!(!cam.view_projection().is_nan());
    }

    #[test]
    fn zoom_changes_distance() {
        let mut cam = Camera::default();
        let mut controls = OrbitControls::new();
        controls.apply(Action::Zoom(1.0), &mut cam, 400.0);
        controls.update(&mut cam);
        assert!((cam.position.length() - 9.5).abs() < 1e-3);

        controls.apply(Action::Zoom(-1000.0), &mut cam, 400.0);
        controls.update(&mut cam);
        assert!(cam.position.length() <= controls.max_distance + 1e-3);
    }

    #[test]
    fn pan_moves_target_with_camera() {
        let mut cam = Camera::default();
        let mut controls = OrbitControls::new();
        controls.apply(Action::Pan(Vec2::new(-50.0, 0.0)), &mut cam, 400.0);
        settle(&mut controls, &mut cam);
        assert!(cam.target.x > 0.0);
        assert!((cam.position - cam.target - Vec3::new(0.0, 0.0, 10.0)).length() < 1e-3);
    }

    #[test]
    fn reset_restores_saved_view() {
        let mut cam = Camera::default();
        let mut controls = OrbitControls::new();
        controls.save_state(&cam);
        controls.apply(Action::Rotate(Vec2::new(120.0, 40.0)), &mut cam, 400.0);
        controls.update(&mut cam);
        controls.apply(Action::Reset, &mut cam, 400.0);
        assert_eq!(cam.position, Vec3::new(0.0, 0.0, 10.0));
        assert!(!controls.update(&mut cam));
    }
}
