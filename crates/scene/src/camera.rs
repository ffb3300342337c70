use glam::{Mat4, Vec3};
use viewer_common::{deg_to_rad, wrap_degrees};

use crate::entity::Entity;

/// Pitch is clamped to this many degrees either side of the horizon so the
/// view basis never flips at the poles.
pub const PITCH_LIMIT: f32 = 89.0;

/// First-person camera in a Z-up world.
///
/// Yaw rotates about +Z, pitch tilts toward +Z. Both are stored in degrees.
/// `forward`, `right` and the view matrix are cached by `update` and used for
/// movement until the next update.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    yaw: f32,
    pitch: f32,
    forward: Vec3,
    right: Vec3,
    up: Vec3,
    view: Mat4,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(-5.0, 3.5, 5.0), -30.0, -20.0)
    }
}

impl Camera {
    pub fn new(position: Vec3, yaw: f32, pitch: f32) -> Self {
        let mut camera = Self {
            position,
            yaw: wrap_degrees(yaw),
            pitch: pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            forward: Vec3::X,
            right: Vec3::NEG_Y,
            up: Vec3::Z,
            view: Mat4::IDENTITY,
        };
        camera.update();
        camera
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    /// Turn by `d_yaw` and tilt by `d_pitch` degrees. Yaw wraps into `[0, 360)`,
    /// pitch is clamped to `[-PITCH_LIMIT, PITCH_LIMIT]`.
    pub fn rotate(&mut self, d_yaw: f32, d_pitch: f32) {
        self.yaw = wrap_degrees(self.yaw + d_yaw);
        self.pitch = (self.pitch + d_pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Translate along the cached basis.
    pub fn translate(&mut self, forward: f32, right: f32) {
        self.position += self.forward * forward;
        self.position += self.right * right;
    }
}

impl Entity for Camera {
    fn update(&mut self) {
        let (sy, cy) = deg_to_rad(self.yaw).sin_cos();
        let (sp, cp) = deg_to_rad(self.pitch).sin_cos();
        self.forward = Vec3::new(cy * cp, sy * cp, sp);
        self.right = self.forward.cross(Vec3::Z).normalize();
        self.up = self.right.cross(self.forward).normalize();
        self.view = Mat4::look_at_rh(self.position, self.position + self.forward, self.up);
    }

    /// Camera-to-world transform: the inverse of the view matrix.
    fn model(&self) -> Mat4 {
        self.view.inverse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn default_camera() {
        let cam = Camera::default();
        assert!(cam.position.z > 0.0);
        assert_eq!(cam.yaw(), 330.0);
        assert_eq!(cam.pitch(), -20.0);
        assert!(!cam.view_matrix().col(0).x.is_nan());
    }

    #[test]
    fn basis_is_orthonormal() {
        let cam = Camera::new(Vec3::ZERO, 123.0, 40.0);
        assert!((cam.forward().length() - 1.0).abs() < 1e-5);
        assert!((cam.right().length() - 1.0).abs() < 1e-5);
        assert!(cam.forward().dot(cam.right()).abs() < 1e-5);
        assert!(cam.up().dot(cam.forward()).abs() < 1e-5);
        assert!(cam.up().z > 0.0);
    }

    #[test]
    fn zero_angles_look_down_positive_x() {
        let cam = Camera::new(Vec3::ZERO, 0.0, 0.0);
        assert!(close(cam.forward(), Vec3::X));
        assert!(close(cam.right(), Vec3::NEG_Y));
        assert!(close(cam.up(), Vec3::Z));
    }

    #[test]
    fn model_is_inverse_of_view() {
        let cam = Camera::new(Vec3::new(-5.0, 3.5, 5.0), 10.0, -20.0);
        let origin = cam.model().transform_point3(Vec3::ZERO);
        assert!(close(origin, cam.position));
        let product = cam.model() * cam.view_matrix();
        assert!(product.abs_diff_eq(Mat4::IDENTITY, 1e-4));
    }

    #[test]
    fn view_maps_forward_to_negative_z() {
        let cam = Camera::new(Vec3::new(1.0, 2.0, 3.0), 45.0, 10.0);
        let ahead = cam.position + cam.forward() * 2.0;
        let in_view = cam.view_matrix().transform_point3(ahead);
        assert!(close(in_view, Vec3::new(0.0, 0.0, -2.0)));
    }

    #[test]
    fn rotate_clamps_and_wraps() {
        let mut cam = Camera::new(Vec3::ZERO, 350.0, 0.0);
        cam.rotate(20.0, 500.0);
        assert!((cam.yaw() - 10.0).abs() < 1e-4);
        assert_eq!(cam.pitch(), PITCH_LIMIT);
        cam.rotate(-30.0, -1000.0);
        assert!((cam.yaw() - 340.0).abs() < 1e-4);
        assert_eq!(cam.pitch(), -PITCH_LIMIT);
    }
}
