mod overlay;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use viewer_input::{Action, ControlConfig, Controls, MoveKey};
use viewer_render_wgpu::{Overlay, RenderError, Renderer, SurfaceSize};
use viewer_scene::{Scene, SceneConfig};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Fullscreen, Window, WindowId};

use crate::overlay::{HelpOverlay, HudStatus};

#[derive(Parser)]
#[command(name = "viewer-desktop", about = "Interactive 3D scene viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Asset root directory
    #[arg(long, default_value = "./assets")]
    assets: PathBuf,

    /// Scene layout JSON file
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Spawn the column of spinning triangles
    #[arg(long)]
    triangles: bool,

    /// Floor half-extent in quads (0 disables the floor)
    #[arg(long)]
    floor_extent: Option<u32>,

    /// Initial window width
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Initial window height
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Units moved per frame while a movement key is held
    #[arg(long, default_value_t = ControlConfig::default().move_speed)]
    move_speed: f32,

    /// Mouse delta divisor for look speed
    #[arg(long, default_value_t = ControlConfig::default().mouse_divisor, value_parser = parse_divisor)]
    mouse_divisor: f32,
}

fn parse_divisor(s: &str) -> Result<f32, String> {
    let divisor: f32 = s.parse().map_err(|e| format!("{e}"))?;
    let config = ControlConfig {
        mouse_divisor: divisor,
        ..ControlConfig::default()
    };
    config.validate().map_err(|e| e.to_string())?;
    Ok(divisor)
}

impl Cli {
    fn scene_config(&self) -> Result<SceneConfig> {
        let mut config = match &self.scene {
            Some(path) => SceneConfig::load(path)?,
            None => SceneConfig::default(),
        };
        if self.triangles {
            config.triangles = true;
        }
        match self.floor_extent {
            Some(0) => config.floor_half_extent = None,
            Some(n) => config.floor_half_extent = Some(n),
            None => {}
        }
        Ok(config)
    }
}

fn map_key(key: KeyCode, pressed: bool) -> Option<Action> {
    let move_key = match key {
        KeyCode::KeyW => Some(MoveKey::Forward),
        KeyCode::KeyS => Some(MoveKey::Backward),
        KeyCode::KeyA => Some(MoveKey::Left),
        KeyCode::KeyD => Some(MoveKey::Right),
        _ => None,
    };
    if let Some(key) = move_key {
        return Some(Action::Move { key, pressed });
    }
    if !pressed {
        return None;
    }
    match key {
        KeyCode::Escape => Some(Action::ReleasePointer),
        KeyCode::F1 => Some(Action::ToggleHelp),
        KeyCode::F11 => Some(Action::ToggleFullscreen),
        _ => None,
    }
}

/// Counts frames and reports a rate once per second.
struct FrameCounter {
    window_start: Instant,
    frames: u32,
    fps: f32,
}

impl FrameCounter {
    fn new() -> Self {
        Self {
            window_start: Instant::now(),
            frames: 0,
            fps: 0.0,
        }
    }

    fn tick(&mut self) -> f32 {
        self.frames += 1;
        let elapsed = self.window_start.elapsed().as_secs_f32();
        if elapsed >= 1.0 {
            self.fps = self.frames as f32 / elapsed;
            self.frames = 0;
            self.window_start = Instant::now();
            tracing::trace!(fps = self.fps, "frame rate");
        }
        self.fps
    }
}

/// Application state that exists before any window does.
struct AppState {
    scene: Scene,
    controls: Controls,
    pointer_captured: bool,
    frames: FrameCounter,
}

impl AppState {
    fn new(scene: Scene, controls: Controls) -> Self {
        Self {
            scene,
            controls,
            pointer_captured: false,
            frames: FrameCounter::new(),
        }
    }

    fn hud_status(&mut self, fullscreen: bool) -> HudStatus {
        let player = self.scene.player();
        HudStatus {
            camera_position: player.position,
            yaw: player.yaw(),
            pitch: player.pitch(),
            objects: self.scene.objects().len(),
            fps: self.frames.tick(),
            pointer_captured: self.pointer_captured,
            fullscreen,
        }
    }
}

struct ViewerApp {
    state: AppState,
    cli: Cli,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    overlay: Option<HelpOverlay>,
    error: Option<anyhow::Error>,
}

impl ViewerApp {
    fn new(state: AppState, cli: Cli) -> Self {
        Self {
            state,
            cli,
            window: None,
            renderer: None,
            overlay: None,
            error: None,
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Move { key, pressed } => self.state.controls.key(key, pressed),
            Action::Look { dx, dy } => {
                if self.state.pointer_captured {
                    let (dx, dy) = self.state.controls.look(dx, dy);
                    self.state.scene.spin_player(dx, dy);
                }
            }
            Action::CapturePointer => self.set_pointer_captured(true),
            Action::ReleasePointer => self.set_pointer_captured(false),
            Action::ToggleHelp => {
                if let Some(overlay) = &mut self.overlay {
                    overlay.visible = !overlay.visible;
                }
            }
            Action::ToggleFullscreen => {
                if let Some(window) = &self.window {
                    let next = match window.fullscreen() {
                        Some(_) => None,
                        None => Some(Fullscreen::Borderless(None)),
                    };
                    tracing::info!(fullscreen = next.is_some(), "toggling fullscreen");
                    window.set_fullscreen(next);
                }
            }
        }
    }

    fn set_pointer_captured(&mut self, captured: bool) {
        let Some(window) = &self.window else {
            return;
        };
        if captured {
            let grabbed = window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
            if let Err(e) = grabbed {
                tracing::warn!("cursor grab unavailable: {e}");
                return;
            }
        } else if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
            tracing::warn!("failed to release cursor: {e}");
        }
        window.set_cursor_visible(!captured);
        self.state.pointer_captured = captured;
        tracing::debug!(captured, "pointer capture changed");
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        // Advance the simulation fully before rendering its snapshot.
        self.state.scene.update();
        let (forward, right) = self.state.controls.movement();
        self.state.scene.move_player(forward, right);

        let fullscreen = self
            .window
            .as_ref()
            .is_some_and(|w| w.fullscreen().is_some());
        let status = self.state.hud_status(fullscreen);

        let Some(renderer) = &mut self.renderer else {
            return;
        };
        let overlay = self.overlay.as_mut().map(|o| {
            o.set_status(status);
            o as &mut dyn Overlay
        });
        let data = self.state.scene.get_renderables();
        if let Err(e) = renderer.render(&data, overlay) {
            tracing::error!("render failed: {e}");
            self.error = Some(anyhow::anyhow!("render failed: {e}"));
            event_loop.exit();
            return;
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn fail_init(&mut self, event_loop: &ActiveEventLoop, err: RenderError) {
        tracing::error!("{err}");
        self.error = Some(anyhow::anyhow!("renderer initialization failed: {err}"));
        event_loop.exit();
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("Scene Viewer")
            .with_inner_size(PhysicalSize::new(self.cli.width, self.cli.height));
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                tracing::error!("failed to create window: {e}");
                self.error = Some(e.into());
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        let renderer = match pollster::block_on(Renderer::initialize(
            window.clone(),
            SurfaceSize::new(size.width, size.height),
            &self.cli.assets,
        )) {
            Ok(renderer) => renderer,
            Err(err) => {
                self.fail_init(event_loop, err);
                return;
            }
        };

        self.overlay = Some(HelpOverlay::new(renderer.gpu(), window.clone()));
        self.renderer = Some(renderer);
        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(overlay) = &mut self.overlay {
            if overlay.on_window_event(&event) && !self.state.pointer_captured {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("window closed");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.request_resize(SurfaceSize::new(new_size.width, new_size.height));
                }
            }
            WindowEvent::Focused(false) => {
                self.state.controls.clear();
                self.set_pointer_captured(false);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                if let Some(action) = map_key(key, key_state == ElementState::Pressed) {
                    self.handle_action(action);
                }
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: ElementState::Pressed,
                ..
            } => {
                if !self.state.pointer_captured {
                    self.handle_action(Action::CapturePointer);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.handle_action(Action::Look {
                dx: delta.0 as f32,
                dy: delta.1 as f32,
            });
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("viewer-desktop starting");

    let scene = Scene::new(&cli.scene_config()?)?;
    let control_config = ControlConfig {
        move_speed: cli.move_speed,
        mouse_divisor: cli.mouse_divisor,
    };
    control_config.validate()?;
    let controls = Controls::new(control_config);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = ViewerApp::new(AppState::new(scene, controls), cli);
    event_loop.run_app(&mut app)?;

    match app.error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_keys_map_on_press_and_release() {
        assert_eq!(
            map_key(KeyCode::KeyW, true),
            Some(Action::Move {
                key: MoveKey::Forward,
                pressed: true
            })
        );
        assert_eq!(
            map_key(KeyCode::KeyD, false),
            Some(Action::Move {
                key: MoveKey::Right,
                pressed: false
            })
        );
    }

    #[test]
    fn toggles_fire_on_press_only() {
        assert_eq!(map_key(KeyCode::F1, true), Some(Action::ToggleHelp));
        assert_eq!(map_key(KeyCode::F1, false), None);
        assert_eq!(map_key(KeyCode::F11, true), Some(Action::ToggleFullscreen));
        assert_eq!(map_key(KeyCode::Escape, true), Some(Action::ReleasePointer));
        assert_eq!(map_key(KeyCode::KeyQ, true), None);
    }

    #[test]
    fn cli_overrides_scene_config() {
        let cli = Cli::parse_from(["viewer-desktop", "--triangles", "--floor-extent", "0"]);
        let config = cli.scene_config().unwrap();
        assert!(config.triangles);
        assert_eq!(config.floor_half_extent, None);

        let cli = Cli::parse_from(["viewer-desktop", "--floor-extent", "3"]);
        assert_eq!(cli.scene_config().unwrap().floor_half_extent, Some(3));
        assert_eq!(cli.move_speed, 0.02);
    }

    #[test]
    fn zero_mouse_divisor_is_refused() {
        assert!(Cli::try_parse_from(["viewer-desktop", "--mouse-divisor", "0"]).is_err());
        assert!(Cli::try_parse_from(["viewer-desktop", "--mouse-divisor=-2"]).is_err());
        let cli = Cli::try_parse_from(["viewer-desktop", "--mouse-divisor", "2.5"]).unwrap();
        assert_eq!(cli.mouse_divisor, 2.5);
    }
}
