use std::path::Path;

use crate::AssetError;

/// A mesh vertex as consumed by the renderer: position and texture coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

/// Non-indexed triangle list.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub name: String,
    pub vertices: Vec<MeshVertex>,
}

impl MeshData {
    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    /// Load a Wavefront OBJ file.
    pub fn load_obj(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("mesh")
            .to_string();
        let mesh = Self::from_obj_str(&name, &text)?;
        tracing::debug!(
            path = %path.display(),
            vertices = mesh.vertices.len(),
            "loaded OBJ mesh"
        );
        Ok(mesh)
    }

    /// Parse OBJ text. Supports `v`, `vt` and `f` records; polygons are
    /// fan-triangulated. Normals, groups and materials are ignored.
    pub fn from_obj_str(name: &str, text: &str) -> Result<Self, AssetError> {
        let mut positions: Vec<[f32; 3]> = Vec::new();
        let mut uvs: Vec<[f32; 2]> = Vec::new();
        let mut vertices = Vec::new();

        for (i, raw) in text.lines().enumerate() {
            let line = i + 1;
            let record = raw.split('#').next().unwrap_or("").trim();
            let mut fields = record.split_whitespace();
            let Some(tag) = fields.next() else {
                continue;
            };
            match tag {
                "v" => {
                    let v = parse_floats::<3>(fields, line, "v")?;
                    positions.push(v);
                }
                "vt" => {
                    let mut rest = fields.collect::<Vec<_>>();
                    // `vt u` is legal; missing v defaults to 0.
                    if rest.len() == 1 {
                        rest.push("0");
                    }
                    let [u, v] = parse_floats::<2>(rest.into_iter(), line, "vt")?;
                    // OBJ puts v = 0 at the bottom; textures are stored top row first.
                    uvs.push([u, 1.0 - v]);
                }
                "f" => {
                    let corners = fields
                        .map(|f| parse_corner(f, positions.len(), uvs.len(), line))
                        .collect::<Result<Vec<_>, _>>()?;
                    if corners.len() < 3 {
                        return Err(AssetError::ObjParse {
                            line,
                            message: format!("face needs 3 vertices, got {}", corners.len()),
                        });
                    }
                    let vertex = |(p, t): (usize, Option<usize>)| MeshVertex {
                        position: positions[p],
                        uv: t.map(|t| uvs[t]).unwrap_or([0.0, 0.0]),
                    };
                    for k in 1..corners.len() - 1 {
                        vertices.push(vertex(corners[0]));
                        vertices.push(vertex(corners[k]));
                        vertices.push(vertex(corners[k + 1]));
                    }
                }
                _ => {}
            }
        }

        if vertices.is_empty() {
            return Err(AssetError::EmptyMesh(name.to_string()));
        }
        Ok(Self {
            name: name.to_string(),
            vertices,
        })
    }
}

fn parse_floats<'a, const N: usize>(
    mut fields: impl Iterator<Item = &'a str>,
    line: usize,
    tag: &str,
) -> Result<[f32; N], AssetError> {
    let mut out = [0.0f32; N];
    for slot in out.iter_mut() {
        let field = fields.next().ok_or_else(|| AssetError::ObjParse {
            line,
            message: format!("`{tag}` needs {N} components"),
        })?;
        *slot = field.parse().map_err(|_| AssetError::ObjParse {
            line,
            message: format!("invalid number `{field}`"),
        })?;
    }
    Ok(out)
}

/// Parse one face corner (`v`, `v/vt`, `v/vt/vn` or `v//vn`) into zero-based
/// position and optional uv indices.
fn parse_corner(
    field: &str,
    position_count: usize,
    uv_count: usize,
    line: usize,
) -> Result<(usize, Option<usize>), AssetError> {
    let mut parts = field.split('/');
    let position = parts.next().unwrap_or("");
    let position = resolve_index(position, position_count, line)?;
    let uv = match parts.next() {
        Some("") | None => None,
        Some(t) => Some(resolve_index(t, uv_count, line)?),
    };
    Ok((position, uv))
}

/// OBJ indices are 1-based; negative values count back from the latest element.
fn resolve_index(field: &str, count: usize, line: usize) -> Result<usize, AssetError> {
    let raw: i64 = field.parse().map_err(|_| AssetError::ObjParse {
        line,
        message: format!("invalid index `{field}`"),
    })?;
    let resolved = match raw {
        0 => None,
        r if r > 0 => Some(r - 1),
        r => Some(count as i64 + r),
    };
    match resolved {
        Some(idx) if idx >= 0 && (idx as usize) < count => Ok(idx as usize),
        _ => Err(AssetError::ObjParse {
            line,
            message: format!("index {raw} out of range (have {count})"),
        }),
    }
}
