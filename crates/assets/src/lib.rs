//! Asset loading: manifest, OBJ meshes, image textures.
//!
//! Loaders produce plain CPU-side data. The renderer uploads it; nothing in
//! this crate touches the GPU.
//!
//! # Layout
//! ```text
//! <asset root>/
//!   manifest.json        - optional, overrides the default paths below
//!   models/subject.obj
//!   textures/subject.ppm
//!   textures/floor.ppm
//! ```

mod manifest;
mod obj;
mod texture;

pub use manifest::{AssetManifest, LoadedAssets};
pub use obj::{MeshData, MeshVertex};
pub use texture::TextureData;

use std::path::PathBuf;

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("OBJ parse error at line {line}: {message}")]
    ObjParse { line: usize, message: String },
    #[error("mesh {0} has no faces")]
    EmptyMesh(String),
    #[error("image decode error in {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("manifest error: {0}")]
    Manifest(#[from] serde_json::Error),
}

pub fn crate_info() -> &'static str {
    "viewer-assets v0.1.0"
}
