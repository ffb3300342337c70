use glam::{Mat4, Vec3};
use viewer_common::Transform;

use crate::SceneError;
use crate::buffer::{MAX_OBJECTS, TransformBuffer};
use crate::camera::Camera;
use crate::config::SceneConfig;
use crate::entity::{Entity, Light, ObjectKind, SceneObject};

/// Instanced object groups reported to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Triangle,
    Quad,
}

/// Per-group instance counts. The subject is always exactly one instance and
/// follows the quads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObjectCounts {
    pub triangle: u32,
    pub quad: u32,
}

impl ObjectCounts {
    pub fn get(&self, ty: ObjectType) -> u32 {
        match ty {
            ObjectType::Triangle => self.triangle,
            ObjectType::Quad => self.quad,
        }
    }
}

/// Per-frame snapshot handed from the scene to the renderer.
///
/// `model_transforms` borrows the scene's buffer, so the snapshot cannot
/// outlive the frame: the next `Scene::update` needs the buffer mutably.
#[derive(Debug, Clone, Copy)]
pub struct RenderData<'a> {
    pub view_transform: Mat4,
    pub model_transforms: &'a [f32],
    pub light_position: Vec3,
    pub object_counts: ObjectCounts,
}

/// Collects scene contents in any order and lays them out by group on `build`.
#[derive(Debug, Clone)]
pub struct SceneBuilder {
    triangles: Vec<Vec3>,
    quads: Vec<Vec3>,
    subject: Transform,
    subject_spin: Vec3,
    camera: Camera,
    light: Light,
    capacity: usize,
}

impl Default for SceneBuilder {
    fn default() -> Self {
        Self {
            triangles: Vec::new(),
            quads: Vec::new(),
            subject: Transform::default(),
            subject_spin: Vec3::ZERO,
            camera: Camera::default(),
            light: Light::new(Vec3::ZERO),
            capacity: MAX_OBJECTS,
        }
    }
}

impl SceneBuilder {
    pub fn triangle(mut self, position: Vec3) -> Self {
        self.triangles.push(position);
        self
    }

    pub fn quad(mut self, position: Vec3) -> Self {
        self.quads.push(position);
        self
    }

    pub fn subject(mut self, transform: Transform, spin: Vec3) -> Self {
        self.subject = transform;
        self.subject_spin = spin;
        self
    }

    pub fn camera(mut self, camera: Camera) -> Self {
        self.camera = camera;
        self
    }

    pub fn light(mut self, light: Light) -> Self {
        self.light = light;
        self
    }

    /// Override the transform buffer capacity (defaults to `MAX_OBJECTS`).
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn build(self) -> Result<Scene, SceneError> {
        let requested = self.triangles.len() + self.quads.len() + 1;
        if requested > self.capacity {
            return Err(SceneError::Capacity {
                requested,
                capacity: self.capacity,
            });
        }

        let mut objects = Vec::with_capacity(requested);
        objects.extend(self.triangles.into_iter().map(SceneObject::triangle));
        objects.extend(self.quads.into_iter().map(SceneObject::quad));
        objects.push(SceneObject::subject(self.subject, self.subject_spin));

        let mut object_data = TransformBuffer::with_capacity(self.capacity);
        for _ in &objects {
            object_data.push(Mat4::IDENTITY)?;
        }

        let counts = ObjectCounts {
            triangle: count_kind(&objects, ObjectKind::Triangle),
            quad: count_kind(&objects, ObjectKind::Quad),
        };
        tracing::debug!(
            triangles = counts.triangle,
            quads = counts.quad,
            capacity = self.capacity,
            "scene built"
        );

        Ok(Scene {
            objects,
            object_data,
            counts,
            player: self.camera,
            light: self.light,
        })
    }
}

fn count_kind(objects: &[SceneObject], kind: ObjectKind) -> u32 {
    objects.iter().filter(|o| o.kind == kind).count() as u32
}

/// Owns every entity and the packed transform buffer.
///
/// Objects are stored in one list ordered triangles, quads, subject; slot `i`
/// of the transform buffer always belongs to `objects[i]`.
#[derive(Debug, Clone)]
pub struct Scene {
    objects: Vec<SceneObject>,
    object_data: TransformBuffer,
    counts: ObjectCounts,
    player: Camera,
    light: Light,
}

impl Scene {
    pub fn builder() -> SceneBuilder {
        SceneBuilder::default()
    }

    /// Build the scene described by `config`.
    ///
    /// The layout size is checked against `MAX_OBJECTS` before any position is
    /// generated, so oversized floors fail fast instead of allocating.
    pub fn new(config: &SceneConfig) -> Result<Self, SceneError> {
        let requested = config.object_count();
        if requested > MAX_OBJECTS {
            return Err(SceneError::Capacity {
                requested,
                capacity: MAX_OBJECTS,
            });
        }
        let mut builder = Self::builder()
            .subject(
                Transform::new(config.subject_position, config.subject_eulers),
                config.subject_spin,
            )
            .camera(Camera::new(
                config.camera_position,
                config.camera_yaw,
                config.camera_pitch,
            ))
            .light(Light::new(config.light_position));
        for position in config.triangle_positions() {
            builder = builder.triangle(position);
        }
        for position in config.quad_positions() {
            builder = builder.quad(position);
        }
        builder.build()
    }

    /// Advance every entity one frame and repack the model matrices.
    pub fn update(&mut self) {
        // `build` claims exactly one slot per object, so the zip is exhaustive.
        for (object, slot) in self.objects.iter_mut().zip(self.object_data.live_slots_mut()) {
            object.update();
            slot.copy_from_slice(&object.model().to_cols_array());
        }
        self.player.update();
        self.light.update();
    }

    /// Move the camera along its cached forward and right vectors.
    pub fn move_player(&mut self, forward: f32, right: f32) {
        self.player.translate(forward, right);
    }

    /// Turn the camera. Positive `dx` turns right, positive `dy` looks down.
    pub fn spin_player(&mut self, dx: f32, dy: f32) {
        self.player.rotate(-dx, -dy);
    }

    pub fn get_renderables(&self) -> RenderData<'_> {
        RenderData {
            view_transform: self.player.view_matrix(),
            model_transforms: self.object_data.as_slice(),
            light_position: self.light.position,
            object_counts: self.counts,
        }
    }

    pub fn player(&self) -> &Camera {
        &self.player
    }

    pub fn light(&self) -> &Light {
        &self.light
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn object_counts(&self) -> ObjectCounts {
        self.counts
    }

    pub fn transforms(&self) -> &TransformBuffer {
        &self.object_data
    }
}
