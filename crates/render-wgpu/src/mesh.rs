use bytemuck::{Pod, Zeroable};
use viewer_assets::MeshData;
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x2,
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Single triangle standing in the YZ plane, apex up.
pub fn triangle_vertices() -> Vec<Vertex> {
    #[rustfmt::skip]
    let vertices = vec![
        Vertex { position: [0.0,  0.0,  0.5], uv: [0.5, 0.0] },
        Vertex { position: [0.0, -0.5, -0.5], uv: [0.0, 1.0] },
        Vertex { position: [0.0,  0.5, -0.5], uv: [1.0, 1.0] },
    ];
    vertices
}

/// Unit quad in the XY plane (the floor), two triangles.
pub fn quad_vertices() -> Vec<Vertex> {
    #[rustfmt::skip]
    let vertices = vec![
        Vertex { position: [-0.5, -0.5, 0.0], uv: [0.0, 0.0] },
        Vertex { position: [ 0.5, -0.5, 0.0], uv: [1.0, 0.0] },
        Vertex { position: [ 0.5,  0.5, 0.0], uv: [1.0, 1.0] },
        Vertex { position: [ 0.5,  0.5, 0.0], uv: [1.0, 1.0] },
        Vertex { position: [-0.5,  0.5, 0.0], uv: [0.0, 1.0] },
        Vertex { position: [-0.5, -0.5, 0.0], uv: [0.0, 0.0] },
    ];
    vertices
}

pub fn mesh_vertices(mesh: &MeshData) -> Vec<Vertex> {
    mesh.vertices
        .iter()
        .map(|v| Vertex {
            position: v.position,
            uv: v.uv,
        })
        .collect()
}

/// Non-indexed vertex buffer.
pub struct GpuMesh {
    pub buffer: wgpu::Buffer,
    pub vertex_count: u32,
}

impl GpuMesh {
    pub fn new(device: &wgpu::Device, label: &str, vertices: &[Vertex]) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        Self {
            buffer,
            vertex_count: vertices.len() as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use viewer_assets::MeshVertex;

    #[test]
    fn vertex_layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 20);
        let layout = Vertex::layout();
        assert_eq!(layout.array_stride, 20);
        assert_eq!(layout.attributes[1].offset, 12);
    }

    #[test]
    fn builtin_mesh_sizes() {
        assert_eq!(triangle_vertices().len(), 3);
        assert_eq!(quad_vertices().len(), 6);
    }

    #[test]
    fn quad_lies_on_floor_plane() {
        assert!(quad_vertices().iter().all(|v| v.position[2] == 0.0));
    }

    #[test]
    fn mesh_data_converts() {
        let mesh = MeshData {
            name: "one".into(),
            vertices: vec![MeshVertex {
                position: [1.0, 2.0, 3.0],
                uv: [0.25, 0.75],
            }],
        };
        assert_eq!(
            mesh_vertices(&mesh),
            vec![Vertex {
                position: [1.0, 2.0, 3.0],
                uv: [0.25, 0.75]
            }]
        );
    }
}
