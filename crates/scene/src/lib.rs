//! Scene state: owns every entity and packs model matrices for rendering.
//!
//! # Invariants
//! - Entity counts are fixed when the scene is built.
//! - The transform buffer is laid out triangles, then quads, then the subject.
//! - The renderer only ever sees a borrowed snapshot (`RenderData`).

pub mod buffer;
pub mod camera;
pub mod config;
pub mod entity;
pub mod scene;

pub use buffer::{MATRIX_FLOATS, MAX_OBJECTS, TransformBuffer};
pub use camera::{Camera, PITCH_LIMIT};
pub use config::SceneConfig;
pub use entity::{Entity, Light, ObjectKind, SceneObject};
pub use scene::{ObjectCounts, ObjectType, RenderData, Scene, SceneBuilder};

/// Errors from scene construction and configuration.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("scene needs {requested} object slots but the transform buffer holds {capacity}")]
    Capacity { requested: usize, capacity: usize },
    #[error("transform slot {slot} is out of range (live objects: {len})")]
    SlotOutOfRange { slot: usize, len: usize },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn crate_info() -> &'static str {
    "viewer-scene v0.1.0"
}
