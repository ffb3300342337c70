use crate::context::GpuContext;

/// Extra drawing recorded after the scene pass, into the same command buffer.
///
/// The target already holds the scene; implementations should load rather
/// than clear it.
pub trait Overlay {
    fn record(
        &mut self,
        gpu: &GpuContext,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
    );
}
