//! Shared math utilities and the transform type used by every entity.
//!
//! # Conventions
//! - Angles are stored in degrees and converted at matrix build time.
//! - Matrices are column-major (`glam`), matching the GPU upload layout.

pub mod math;
pub mod types;

pub use math::{deg_to_rad, euler_model_matrix, wrap_degrees};
pub use types::Transform;

pub fn crate_info() -> &'static str {
    "viewer-common v0.1.0"
}
