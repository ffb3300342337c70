use egui::Context as EguiContext;
use glam::Vec3;
use std::sync::Arc;
use viewer_render_wgpu::{GpuContext, Overlay};
use winit::event::WindowEvent;
use winit::window::Window;

/// Values shown in the help window, refreshed every frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct HudStatus {
    pub camera_position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub objects: usize,
    pub fps: f32,
    pub pointer_captured: bool,
    pub fullscreen: bool,
}

/// egui help window drawn over the scene.
pub struct HelpOverlay {
    window: Arc<Window>,
    ctx: EguiContext,
    winit: egui_winit::State,
    renderer: egui_wgpu::Renderer,
    pub visible: bool,
    status: HudStatus,
}

impl HelpOverlay {
    pub fn new(gpu: &GpuContext, window: Arc<Window>) -> Self {
        let ctx = EguiContext::default();
        let winit = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let renderer = egui_wgpu::Renderer::new(&gpu.device, gpu.format(), None, 1, false);
        Self {
            window,
            ctx,
            winit,
            renderer,
            visible: true,
            status: HudStatus::default(),
        }
    }

    /// Feed a window event to egui. Returns true if egui consumed it.
    pub fn on_window_event(&mut self, event: &WindowEvent) -> bool {
        self.winit.on_window_event(&self.window, event).consumed
    }

    pub fn set_status(&mut self, status: HudStatus) {
        self.status = status;
    }

    fn draw_ui(ctx: &EguiContext, visible: bool, status: &HudStatus) {
        if !visible {
            return;
        }
        egui::Window::new("Help")
            .default_width(260.0)
            .resizable(false)
            .show(ctx, |ui| {
                ui.heading("Controls");
                ui.label("Click: capture mouse");
                ui.label("Mouse: look around");
                ui.label("W / S: forward / back");
                ui.label("A / D: strafe");
                ui.label("Esc: release mouse");
                ui.label("F11: toggle fullscreen");
                ui.label("F1: hide this window");
                ui.separator();
                ui.label(format!(
                    "Camera: ({:.2}, {:.2}, {:.2})",
                    status.camera_position.x, status.camera_position.y, status.camera_position.z
                ));
                ui.label(format!("Yaw {:.1}  Pitch {:.1}", status.yaw, status.pitch));
                ui.label(format!("Objects: {}", status.objects));
                ui.label(format!("FPS: {:.0}", status.fps));
                if status.pointer_captured {
                    ui.small("mouse captured");
                }
                if status.fullscreen {
                    ui.small("fullscreen");
                }
            });
    }
}

impl Overlay for HelpOverlay {
    fn record(
        &mut self,
        gpu: &GpuContext,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
    ) {
        let raw_input = self.winit.take_egui_input(&self.window);
        let visible = self.visible;
        let status = self.status;
        let full_output = self.ctx.run(raw_input, |ctx| {
            Self::draw_ui(ctx, visible, &status);
        });
        self.winit
            .handle_platform_output(&self.window, full_output.platform_output);

        let paint_jobs = self
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.renderer
                .update_texture(&gpu.device, &gpu.queue, *id, image_delta);
        }
        self.renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("help_overlay_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: target,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            self.renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        for id in &full_output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}
