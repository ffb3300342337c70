use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::obj::MeshData;
use crate::texture::TextureData;
use crate::AssetError;

const MANIFEST_FILE: &str = "manifest.json";

/// Asset paths, relative to the asset root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetManifest {
    pub subject_mesh: PathBuf,
    /// Used by the subject and the triangles.
    pub subject_texture: PathBuf,
    pub floor_texture: PathBuf,
}

impl Default for AssetManifest {
    fn default() -> Self {
        Self {
            subject_mesh: "models/subject.obj".into(),
            subject_texture: "textures/subject.ppm".into(),
            floor_texture: "textures/floor.ppm".into(),
        }
    }
}

impl AssetManifest {
    /// Read `manifest.json` from `root`, or fall back to the default layout
    /// when the file does not exist.
    pub fn load(root: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = root.as_ref().join(MANIFEST_FILE);
        if !path.exists() {
            tracing::debug!(root = %root.as_ref().display(), "no manifest, using default layout");
            return Ok(Self::default());
        }
        let file = std::fs::File::open(&path).map_err(|source| AssetError::Io {
            path: path.clone(),
            source,
        })?;
        let manifest: Self = serde_json::from_reader(file)?;
        Ok(manifest)
    }

    /// Save the manifest to `root/manifest.json`.
    pub fn save(&self, root: impl AsRef<Path>) -> Result<(), AssetError> {
        let path = root.as_ref().join(MANIFEST_FILE);
        let file = std::fs::File::create(&path).map_err(|source| AssetError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

/// Everything the renderer needs from disk, decoded.
#[derive(Debug, Clone)]
pub struct LoadedAssets {
    pub subject_mesh: MeshData,
    pub subject_texture: TextureData,
    pub floor_texture: TextureData,
}

impl LoadedAssets {
    /// Load the manifest under `root` and every asset it names. Stops at the
    /// first failure.
    pub fn load(root: impl AsRef<Path>) -> Result<Self, AssetError> {
        let root = root.as_ref();
        let manifest = AssetManifest::load(root)?;
        let assets = Self {
            subject_mesh: MeshData::load_obj(root.join(&manifest.subject_mesh))?,
            subject_texture: TextureData::load(root.join(&manifest.subject_texture))?,
            floor_texture: TextureData::load(root.join(&manifest.floor_texture))?,
        };
        tracing::info!(
            root = %root.display(),
            subject_vertices = assets.subject_mesh.vertices.len(),
            "assets loaded"
        );
        Ok(assets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRI: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
    const PPM: &[u8] = b"P3\n1 1\n255\n10 20 30\n";

    fn write_layout(root: &Path, manifest: &AssetManifest) {
        for rel in [
            &manifest.subject_mesh,
            &manifest.subject_texture,
            &manifest.floor_texture,
        ] {
            if let Some(parent) = root.join(rel).parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
        }
        std::fs::write(root.join(&manifest.subject_mesh), TRI).unwrap();
        std::fs::write(root.join(&manifest.subject_texture), PPM).unwrap();
        std::fs::write(root.join(&manifest.floor_texture), PPM).unwrap();
    }

    #[test]
    fn missing_manifest_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = AssetManifest::load(dir.path()).unwrap();
        assert_eq!(manifest, AssetManifest::default());
    }

    #[test]
    fn save_and_load_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = AssetManifest {
            subject_mesh: "mdls/pot.obj".into(),
            ..AssetManifest::default()
        };
        manifest.save(dir.path()).unwrap();
        let loaded = AssetManifest::load(dir.path()).unwrap();
        assert_eq!(loaded, manifest);
    }

    #[test]
    fn partial_manifest_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(MANIFEST_FILE),
            r#"{ "floor_texture": "img/floor.png" }"#,
        )
        .unwrap();
        let manifest = AssetManifest::load(dir.path()).unwrap();
        assert_eq!(manifest.floor_texture, PathBuf::from("img/floor.png"));
        assert_eq!(manifest.subject_mesh, PathBuf::from("models/subject.obj"));
    }

    #[test]
    fn load_full_layout() {
        let dir = tempfile::tempdir().unwrap();
        write_layout(dir.path(), &AssetManifest::default());
        let assets = LoadedAssets::load(dir.path()).unwrap();
        assert_eq!(assets.subject_mesh.vertex_count(), 3);
        assert_eq!(assets.floor_texture.rgba, vec![10, 20, 30, 255]);
    }

    #[test]
    fn missing_texture_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = AssetManifest::default();
        write_layout(dir.path(), &manifest);
        std::fs::remove_file(dir.path().join(&manifest.floor_texture)).unwrap();
        let err = LoadedAssets::load(dir.path()).unwrap_err();
        assert!(matches!(err, AssetError::Io { path, .. } if path.ends_with("floor.ppm")));
    }

    #[test]
    fn bundled_assets_load() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets");
        let assets = LoadedAssets::load(&root).unwrap();
        assert!(assets.subject_mesh.vertex_count() >= 3);
        assert!(assets.floor_texture.width > 0);
        assert!(assets.subject_texture.width > 0);
    }
}
