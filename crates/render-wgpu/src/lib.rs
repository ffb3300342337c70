//! wgpu render backend for the scene viewer.
//!
//! Draws the floor quads, the triangle column and the subject mesh from a
//! per-frame `RenderData` snapshot, using one uniform buffer (view, projection,
//! light) and one storage buffer of per-instance model matrices.
//!
//! # Invariants
//! - Renderer never mutates scene state and never keeps `RenderData` past `render`.
//! - Setup runs its stages strictly in order and yields no renderer on failure.
//! - Surface resizes are applied at frame boundaries, at most once per frame.

mod batch;
mod context;
mod depth;
mod error;
mod material;
mod mesh;
mod overlay;
mod renderer;
mod resize;
mod shaders;

pub use batch::{DrawBatch, draw_batches};
pub use context::GpuContext;
pub use depth::{DEPTH_FORMAT, DepthTarget};
pub use error::{RenderError, SetupFailure, SetupStage};
pub use overlay::Overlay;
pub use renderer::{CameraUniforms, Renderer, projection_matrix};
pub use resize::{ResizeTracker, SurfaceSize};

pub fn crate_info() -> &'static str {
    "viewer-render-wgpu v0.1.0"
}
