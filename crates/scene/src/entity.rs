use glam::{Mat4, Vec3};
use viewer_common::Transform;

/// Anything in the scene that advances once per frame and has a world transform.
pub trait Entity {
    /// Advance by one frame and recompute the cached matrix.
    fn update(&mut self);

    /// The matrix cached by the last `update`.
    fn model(&self) -> Mat4;
}

/// Renderable object variants. Each variant maps to one mesh and one draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectKind {
    Triangle,
    Quad,
    Subject,
}

impl ObjectKind {
    /// Per-frame rotation applied to every object of this kind, in degrees.
    /// The subject's spin comes from configuration instead.
    pub fn default_spin(self) -> Vec3 {
        match self {
            Self::Triangle => Vec3::new(0.0, 0.0, 1.0),
            Self::Quad | Self::Subject => Vec3::ZERO,
        }
    }
}

/// A renderable object: a tagged transform with a per-frame spin.
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub kind: ObjectKind,
    pub transform: Transform,
    /// Rotation added each update, in degrees.
    pub spin: Vec3,
    model: Mat4,
}

impl SceneObject {
    pub fn new(kind: ObjectKind, transform: Transform) -> Self {
        Self::with_spin(kind, transform, kind.default_spin())
    }

    pub fn with_spin(kind: ObjectKind, transform: Transform, spin: Vec3) -> Self {
        Self {
            kind,
            transform,
            spin,
            model: transform.model_matrix(),
        }
    }

    pub fn triangle(position: Vec3) -> Self {
        Self::new(ObjectKind::Triangle, Transform::at(position))
    }

    pub fn quad(position: Vec3) -> Self {
        Self::new(ObjectKind::Quad, Transform::at(position))
    }

    pub fn subject(transform: Transform, spin: Vec3) -> Self {
        Self::with_spin(ObjectKind::Subject, transform, spin)
    }
}

impl Entity for SceneObject {
    fn update(&mut self) {
        if self.spin != Vec3::ZERO {
            self.transform.rotate_by(self.spin);
        }
        self.model = self.transform.model_matrix();
    }

    fn model(&self) -> Mat4 {
        self.model
    }
}

/// Point light. Holds a position only; nothing about it animates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: Vec3,
}

impl Light {
    pub fn new(position: Vec3) -> Self {
        Self { position }
    }
}

impl Entity for Light {
    fn update(&mut self) {}

    fn model(&self) -> Mat4 {
        Mat4::from_translation(self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_spins_about_z_each_update() {
        let mut tri = SceneObject::triangle(Vec3::new(2.0, 0.0, 0.0));
        tri.update();
        tri.update();
        assert!((tri.transform.eulers.z - 2.0).abs() < 1e-5);
        assert_eq!(tri.transform.eulers.x, 0.0);
        assert_eq!(tri.model(), tri.transform.model_matrix());
    }

    #[test]
    fn quad_is_static() {
        let mut quad = SceneObject::quad(Vec3::new(-3.0, 4.0, 0.0));
        let before = quad.model();
        quad.update();
        assert_eq!(quad.model(), before);
        assert_eq!(quad.model(), Mat4::from_translation(Vec3::new(-3.0, 4.0, 0.0)));
    }

    #[test]
    fn subject_uses_configured_spin() {
        let mut subject = SceneObject::subject(
            Transform::new(Vec3::new(0.0, 0.0, -2.0), Vec3::new(90.0, 55.0, 0.0)),
            Vec3::new(0.0, 0.0, 0.5),
        );
        for _ in 0..4 {
            subject.update();
        }
        assert!((subject.transform.eulers.z - 2.0).abs() < 1e-5);
        assert_eq!(subject.transform.eulers.x, 90.0);
    }

    #[test]
    fn light_model_is_translation() {
        let mut light = Light::new(Vec3::new(0.0, -5.0, 1.0));
        light.update();
        assert_eq!(light.position, Vec3::new(0.0, -5.0, 1.0));
        assert_eq!(
            light.model().transform_point3(Vec3::ZERO),
            Vec3::new(0.0, -5.0, 1.0)
        );
    }
}
