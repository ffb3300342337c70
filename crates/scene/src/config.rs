use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::SceneError;

/// Triangles in the optional column at x = 2, y in [-5, 5].
const TRIANGLE_COLUMN: usize = 11;

/// Scene layout configuration. Every field has a default, so a JSON file only
/// needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Spawn a column of spinning triangles at x = 2, y in [-5, 5].
    pub triangles: bool,
    /// Floor is a (2n+1) x (2n+1) grid of unit quads centred on the origin.
    /// `None` disables the floor.
    pub floor_half_extent: Option<u32>,
    pub subject_position: Vec3,
    /// Degrees about X, Y, Z.
    pub subject_eulers: Vec3,
    /// Degrees added to the subject's Euler angles every frame.
    pub subject_spin: Vec3,
    pub camera_position: Vec3,
    pub camera_yaw: f32,
    pub camera_pitch: f32,
    pub light_position: Vec3,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            triangles: false,
            floor_half_extent: Some(10),
            subject_position: Vec3::new(0.0, 0.0, -2.0),
            subject_eulers: Vec3::new(90.0, 55.0, 0.0),
            subject_spin: Vec3::new(0.0, 0.5, 0.0),
            camera_position: Vec3::new(-5.0, 3.5, 5.0),
            camera_yaw: -30.0,
            camera_pitch: -20.0,
            light_position: Vec3::new(0.0, -5.0, 1.0),
        }
    }
}

impl SceneConfig {
    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let file = std::fs::File::open(path)?;
        let config: Self = serde_json::from_reader(file)?;
        Ok(config)
    }

    /// Triangle positions for the optional triangle column.
    pub fn triangle_positions(&self) -> Vec<Vec3> {
        if !self.triangles {
            return Vec::new();
        }
        (-5..=5).map(|y| Vec3::new(2.0, y as f32, 0.0)).collect()
    }

    /// Number of floor quads, or `None` if it does not fit in a `usize`.
    pub fn quad_count(&self) -> Option<usize> {
        let Some(n) = self.floor_half_extent else {
            return Some(0);
        };
        let side = u64::from(n).checked_mul(2)?.checked_add(1)?;
        let count = side.checked_mul(side)?;
        usize::try_from(count).ok()
    }

    /// Floor quad positions, row-major over x then y.
    ///
    /// Allocates every position; check `object_count` against the scene
    /// capacity first for untrusted extents.
    pub fn quad_positions(&self) -> Vec<Vec3> {
        let Some(n) = self.floor_half_extent else {
            return Vec::new();
        };
        let n = i64::from(n);
        let mut positions = Vec::with_capacity(self.quad_count().unwrap_or(0));
        for x in -n..=n {
            for y in -n..=n {
                positions.push(Vec3::new(x as f32, y as f32, 0.0));
            }
        }
        positions
    }

    /// Total number of object slots this layout needs, saturating at
    /// `usize::MAX`. Computed without generating any positions.
    pub fn object_count(&self) -> usize {
        let triangles = if self.triangles { TRIANGLE_COLUMN } else { 0 };
        self.quad_count()
            .and_then(|quads| quads.checked_add(triangles + 1))
            .unwrap_or(usize::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_layout_counts() {
        let config = SceneConfig::default();
        assert!(config.triangle_positions().is_empty());
        assert_eq!(config.quad_positions().len(), 21 * 21);
        assert_eq!(config.object_count(), 21 * 21 + 1);
    }

    #[test]
    fn triangle_column() {
        let config = SceneConfig {
            triangles: true,
            floor_half_extent: None,
            ..SceneConfig::default()
        };
        let tris = config.triangle_positions();
        assert_eq!(tris.len(), 11);
        assert_eq!(tris[0], Vec3::new(2.0, -5.0, 0.0));
        assert_eq!(tris[10], Vec3::new(2.0, 5.0, 0.0));
        assert!(config.quad_positions().is_empty());
    }

    #[test]
    fn load_partial_json() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(
            tmp,
            r#"{{ "triangles": true, "floor_half_extent": 2, "light_position": [1.0, 2.0, 3.0] }}"#
        )
        .unwrap();
        let config = SceneConfig::load(tmp.path()).unwrap();
        assert!(config.triangles);
        assert_eq!(config.floor_half_extent, Some(2));
        assert_eq!(config.light_position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(config.camera_yaw, -30.0);
        assert_eq!(config.object_count(), 11 + 25 + 1);
    }

    #[test]
    fn huge_floor_extent_counts_without_overflow() {
        let config = SceneConfig {
            floor_half_extent: Some(40_000),
            ..SceneConfig::default()
        };
        assert_eq!(config.quad_count(), Some(80_001 * 80_001));

        let config = SceneConfig {
            floor_half_extent: Some(u32::MAX),
            triangles: true,
            ..SceneConfig::default()
        };
        assert_eq!(config.quad_count(), None);
        assert_eq!(config.object_count(), usize::MAX);
    }

    #[test]
    fn load_rejects_bad_json() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, "{{ not json").unwrap();
        assert!(matches!(
            SceneConfig::load(tmp.path()),
            Err(SceneError::Json(_))
        ));
    }
}
