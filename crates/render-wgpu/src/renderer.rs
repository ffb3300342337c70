use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use std::path::Path;
use viewer_assets::LoadedAssets;
use viewer_scene::{MATRIX_FLOATS, MAX_OBJECTS, ObjectKind, RenderData};
use wgpu::util::DeviceExt;

use crate::batch::draw_batches;
use crate::context::GpuContext;
use crate::depth::DepthTarget;
use crate::error::{AtStage, RenderError, SetupFailure, SetupStage};
use crate::material::Material;
use crate::mesh::{GpuMesh, Vertex, mesh_vertices, quad_vertices, triangle_vertices};
use crate::overlay::Overlay;
use crate::resize::{ResizeTracker, SurfaceSize};
use crate::shaders;

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.71,
    g: 0.71,
    b: 0.71,
    a: 1.0,
};

const FOV_Y: f32 = std::f32::consts::FRAC_PI_4;
const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 100.0;

/// Bytes per model matrix in the instance storage buffer.
const MATRIX_BYTES: u64 = (MATRIX_FLOATS * std::mem::size_of::<f32>()) as u64;

/// Camera block at group 0, binding 0.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct CameraUniforms {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    /// xyz = light position, w unused.
    pub light_position: [f32; 4],
}

impl CameraUniforms {
    pub fn new(view: Mat4, projection: Mat4, light_position: Vec3) -> Self {
        Self {
            view: view.to_cols_array_2d(),
            projection: projection.to_cols_array_2d(),
            light_position: light_position.extend(1.0).to_array(),
        }
    }
}

/// Perspective projection for a surface, recomputed every frame so it always
/// follows the latest size.
pub fn projection_matrix(size: SurfaceSize) -> Mat4 {
    Mat4::perspective_rh(FOV_Y, size.aspect(), Z_NEAR, Z_FAR)
}

struct Layouts {
    frame: wgpu::BindGroupLayout,
    material: wgpu::BindGroupLayout,
}

impl Layouts {
    fn new(device: &wgpu::Device) -> Self {
        let frame = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });
        Self {
            frame,
            material: Material::bind_group_layout(device),
        }
    }
}

/// Meshes, materials and the two shared buffers.
struct SceneResources {
    triangle_mesh: GpuMesh,
    quad_mesh: GpuMesh,
    subject_mesh: GpuMesh,
    subject_material: Material,
    floor_material: Material,
    uniform_buffer: wgpu::Buffer,
    object_buffer: wgpu::Buffer,
}

impl SceneResources {
    fn upload(gpu: &GpuContext, layouts: &Layouts, assets: &LoadedAssets) -> Self {
        let device = &gpu.device;
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("camera_uniform_buffer"),
            contents: bytemuck::bytes_of(&CameraUniforms::new(
                Mat4::IDENTITY,
                Mat4::IDENTITY,
                Vec3::ZERO,
            )),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let object_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("object_storage_buffer"),
            size: MAX_OBJECTS as u64 * MATRIX_BYTES,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            triangle_mesh: GpuMesh::new(device, "triangle_vertex_buffer", &triangle_vertices()),
            quad_mesh: GpuMesh::new(device, "quad_vertex_buffer", &quad_vertices()),
            subject_mesh: GpuMesh::new(
                device,
                "subject_vertex_buffer",
                &mesh_vertices(&assets.subject_mesh),
            ),
            subject_material: Material::new(
                device,
                &gpu.queue,
                &layouts.material,
                "subject_material",
                &assets.subject_texture,
            ),
            floor_material: Material::new(
                device,
                &gpu.queue,
                &layouts.material,
                "floor_material",
                &assets.floor_texture,
            ),
            uniform_buffer,
            object_buffer,
        }
    }

    fn mesh_and_material(&self, kind: ObjectKind) -> (&GpuMesh, &Material) {
        match kind {
            ObjectKind::Triangle => (&self.triangle_mesh, &self.subject_material),
            ObjectKind::Quad => (&self.quad_mesh, &self.floor_material),
            ObjectKind::Subject => (&self.subject_mesh, &self.subject_material),
        }
    }
}

fn build_pipeline(
    device: &wgpu::Device,
    layouts: &Layouts,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("scene_shader"),
        source: wgpu::ShaderSource::Wgsl(shaders::SCENE_SHADER.into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("scene_pipeline_layout"),
        bind_group_layouts: &[&layouts.frame, &layouts.material],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("scene_pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[Vertex::layout()],
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            ..Default::default()
        },
        depth_stencil: Some(DepthTarget::state()),
        multisample: Default::default(),
        multiview: None,
        cache: None,
    })
}

/// Run one setup stage inside a validation error scope.
async fn validated<T>(
    device: &wgpu::Device,
    stage: SetupStage,
    build: impl FnOnce() -> T,
) -> Result<T, RenderError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = build();
    if let Some(err) = device.pop_error_scope().await {
        return Err(RenderError::Setup {
            stage,
            source: SetupFailure::Validation(err.to_string()),
        });
    }
    tracing::debug!(%stage, "setup stage complete");
    Ok(value)
}

/// wgpu-based scene renderer. Only exists once every setup stage succeeded.
pub struct Renderer {
    gpu: GpuContext,
    pipeline: wgpu::RenderPipeline,
    frame_bind_group: wgpu::BindGroup,
    resources: SceneResources,
    depth: DepthTarget,
    resize: ResizeTracker,
}

impl Renderer {
    /// Acquire the GPU, load assets from `asset_root` and build every
    /// resource the frame loop needs. Stops at the first failing stage.
    pub async fn initialize(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        size: SurfaceSize,
        asset_root: &Path,
    ) -> Result<Self, RenderError> {
        let gpu = GpuContext::new(target, size)
            .await
            .at(SetupStage::Device)?;
        tracing::debug!(stage = %SetupStage::Device, "setup stage complete");

        let layouts = validated(&gpu.device, SetupStage::BindGroupLayouts, || {
            Layouts::new(&gpu.device)
        })
        .await?;

        let assets = LoadedAssets::load(asset_root).at(SetupStage::Assets)?;
        let resources = validated(&gpu.device, SetupStage::Assets, || {
            SceneResources::upload(&gpu, &layouts, &assets)
        })
        .await?;

        let depth = validated(&gpu.device, SetupStage::DepthBuffer, || {
            DepthTarget::new(&gpu.device, gpu.size())
        })
        .await?;

        let pipeline = validated(&gpu.device, SetupStage::Pipeline, || {
            build_pipeline(&gpu.device, &layouts, gpu.format())
        })
        .await?;

        let frame_bind_group = validated(&gpu.device, SetupStage::BindGroup, || {
            gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("frame_bind_group"),
                layout: &layouts.frame,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: resources.uniform_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: resources.object_buffer.as_entire_binding(),
                    },
                ],
            })
        })
        .await?;

        tracing::info!(
            width = size.width,
            height = size.height,
            subject_vertices = resources.subject_mesh.vertex_count,
            "renderer ready"
        );

        let resize = ResizeTracker::new(gpu.size());
        Ok(Self {
            gpu,
            pipeline,
            frame_bind_group,
            resources,
            depth,
            resize,
        })
    }

    pub fn gpu(&self) -> &GpuContext {
        &self.gpu
    }

    pub fn surface_size(&self) -> SurfaceSize {
        self.resize.current()
    }

    /// Number of depth-target rebuilds caused by resizes.
    pub fn depth_recreations(&self) -> u64 {
        self.resize.recreations()
    }

    /// Queue a resize; it takes effect at the start of the next `render`.
    pub fn request_resize(&mut self, size: SurfaceSize) {
        self.resize.request(size);
    }

    /// Render one frame from `data`, then let `overlay` draw on top.
    ///
    /// Lost or outdated surfaces are reconfigured and the frame is skipped.
    pub fn render(
        &mut self,
        data: &RenderData<'_>,
        overlay: Option<&mut dyn Overlay>,
    ) -> Result<(), RenderError> {
        if let Some(size) = self.resize.take_resize() {
            self.gpu.resize(size);
            self.depth.recreate(&self.gpu.device, size);
            tracing::debug!(width = size.width, height = size.height, "depth target recreated");
        }

        let frame = match self.gpu.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::warn!("surface lost or outdated, reconfiguring");
                self.gpu.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(RenderError::OutOfMemory),
            Err(e) => {
                tracing::warn!("skipping frame: {e}");
                return Ok(());
            }
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let projection = projection_matrix(self.surface_size());
        let uploaded = self.upload(data, projection);

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(self.depth.attachment()),
                ..Default::default()
            });

            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.frame_bind_group, &[]);

            for batch in draw_batches(data.object_counts) {
                if batch.instances().end as usize > uploaded {
                    tracing::warn!(?batch, uploaded, "batch exceeds uploaded instances, skipped");
                    continue;
                }
                let (mesh, material) = self.resources.mesh_and_material(batch.kind);
                pass.set_vertex_buffer(0, mesh.buffer.slice(..));
                pass.set_bind_group(1, &material.bind_group, &[]);
                pass.draw(0..mesh.vertex_count, batch.instances());
            }
        }

        if let Some(overlay) = overlay {
            overlay.record(&self.gpu, &mut encoder, &view);
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }

    /// Overwrite the instance and camera buffers. Returns how many instances
    /// were uploaded.
    fn upload(&self, data: &RenderData<'_>, projection: Mat4) -> usize {
        let max_floats = MAX_OBJECTS * MATRIX_FLOATS;
        let floats = if data.model_transforms.len() > max_floats {
            tracing::warn!(
                floats = data.model_transforms.len(),
                max_floats,
                "transform data exceeds instance buffer, truncating"
            );
            &data.model_transforms[..max_floats]
        } else {
            data.model_transforms
        };

        if !floats.is_empty() {
            self.gpu.queue.write_buffer(
                &self.resources.object_buffer,
                0,
                bytemuck::cast_slice(floats),
            );
        }
        self.gpu.queue.write_buffer(
            &self.resources.uniform_buffer,
            0,
            bytemuck::bytes_of(&CameraUniforms::new(
                data.view_transform,
                projection,
                data.light_position,
            )),
        );
        floats.len() / MATRIX_FLOATS
    }
}
