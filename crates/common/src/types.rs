use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::math::{euler_model_matrix, wrap_degrees};

/// Spatial transform: position and Euler angles in degrees (X, Y, Z).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub eulers: Vec3,
}

impl Transform {
    pub fn new(position: Vec3, eulers: Vec3) -> Self {
        Self { position, eulers }
    }

    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            eulers: Vec3::ZERO,
        }
    }

    /// Advance the orientation by `delta` degrees, wrapping each angle modulo 360.
    pub fn rotate_by(&mut self, delta: Vec3) {
        self.eulers = Vec3::new(
            wrap_degrees(self.eulers.x + delta.x),
            wrap_degrees(self.eulers.y + delta.y),
            wrap_degrees(self.eulers.z + delta.z),
        );
    }

    pub fn model_matrix(&self) -> Mat4 {
        euler_model_matrix(self.position, self.eulers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.eulers, Vec3::ZERO);
        assert_eq!(t.model_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn rotate_by_wraps() {
        let mut t = Transform::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 359.0));
        t.rotate_by(Vec3::new(0.0, 0.0, 2.0));
        assert!((t.eulers.z - 1.0).abs() < 1e-4);
        t.rotate_by(Vec3::new(-5.0, 0.0, 0.0));
        assert!((t.eulers.x - 355.0).abs() < 1e-4);
    }

    #[test]
    fn model_matrix_places_origin_at_position() {
        let t = Transform::new(Vec3::new(1.0, -2.0, 3.0), Vec3::new(30.0, 60.0, 90.0));
        let origin = t.model_matrix().transform_point3(Vec3::ZERO);
        assert!((origin - t.position).length() < 1e-6);
    }
}
