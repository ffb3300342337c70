use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use viewer_assets::LoadedAssets;
use viewer_input::{ControlConfig, Controls, MoveKey};
use viewer_render_wgpu::draw_batches;
use viewer_scene::{MAX_OBJECTS, Scene, SceneConfig};

#[derive(Parser)]
#[command(name = "viewer-cli", about = "Headless tool for the scene viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Step the scene without a window, with scripted input
    Simulate {
        /// Number of frames to simulate
        #[arg(short, long, default_value = "60")]
        frames: u32,
        /// Spawn the column of spinning triangles
        #[arg(long)]
        triangles: bool,
        /// Floor half-extent in quads (0 disables the floor)
        #[arg(long)]
        floor_extent: Option<u32>,
        /// Scene layout JSON file
        #[arg(long)]
        scene: Option<PathBuf>,
    },
    /// Load every asset the renderer needs and report what was found
    CheckAssets {
        /// Asset root directory
        #[arg(long, default_value = "./assets")]
        assets: PathBuf,
    },
}

/// Frame summary printed after a simulation run.
#[derive(Debug, Clone, PartialEq)]
struct SimulationReport {
    frames: u32,
    objects: usize,
    triangles: u32,
    quads: u32,
    buffer_floats: usize,
    camera_position: [f32; 3],
    yaw: f32,
    pitch: f32,
}

/// Hold W for the first half, then strafe right while turning.
fn simulate(scene: &mut Scene, frames: u32) -> SimulationReport {
    let mut controls = Controls::new(ControlConfig::default());
    controls.key(MoveKey::Forward, true);

    for frame in 0..frames {
        if frame == frames / 2 {
            controls.key(MoveKey::Forward, false);
            controls.key(MoveKey::Right, true);
        }
        if frame >= frames / 2 {
            let (dx, dy) = controls.look(5.0, 1.0);
            scene.spin_player(dx, dy);
        }
        scene.update();
        let (forward, right) = controls.movement();
        scene.move_player(forward, right);
    }

    let data = scene.get_renderables();
    let player = scene.player();
    SimulationReport {
        frames,
        objects: scene.objects().len(),
        triangles: data.object_counts.triangle,
        quads: data.object_counts.quad,
        buffer_floats: data.model_transforms.len(),
        camera_position: player.position.to_array(),
        yaw: player.yaw(),
        pitch: player.pitch(),
    }
}

fn scene_config(
    scene: Option<PathBuf>,
    triangles: bool,
    floor_extent: Option<u32>,
) -> anyhow::Result<SceneConfig> {
    let mut config = match scene {
        Some(path) => SceneConfig::load(&path)
            .with_context(|| format!("loading scene layout {}", path.display()))?,
        None => SceneConfig::default(),
    };
    config.triangles |= triangles;
    match floor_extent {
        Some(0) => config.floor_half_extent = None,
        Some(n) => config.floor_half_extent = Some(n),
        None => {}
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("viewer-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", viewer_common::crate_info());
            println!("scene: {} (max objects {MAX_OBJECTS})", viewer_scene::crate_info());
            println!("input: {}", viewer_input::crate_info());
            println!("assets: {}", viewer_assets::crate_info());
            println!("render: {}", viewer_render_wgpu::crate_info());
        }
        Commands::Simulate {
            frames,
            triangles,
            floor_extent,
            scene,
        } => {
            let config = scene_config(scene, triangles, floor_extent)?;
            let mut scene = Scene::new(&config)?;
            let report = simulate(&mut scene, frames);

            println!(
                "Simulated {} frames: objects={} (triangles={}, quads={}, subject=1)",
                report.frames, report.objects, report.triangles, report.quads
            );
            println!("Transform buffer: {} floats", report.buffer_floats);
            let [x, y, z] = report.camera_position;
            println!(
                "Camera: position=({x:.3}, {y:.3}, {z:.3}) yaw={:.2} pitch={:.2}",
                report.yaw, report.pitch
            );
            for batch in draw_batches(scene.object_counts()) {
                println!(
                    "Batch {:?}: instances {}..{}",
                    batch.kind,
                    batch.first_instance,
                    batch.first_instance + batch.instance_count
                );
            }
        }
        Commands::CheckAssets { assets } => {
            let loaded = LoadedAssets::load(&assets)
                .with_context(|| format!("checking assets under {}", assets.display()))?;
            println!(
                "Subject mesh '{}': {} vertices",
                loaded.subject_mesh.name,
                loaded.subject_mesh.vertex_count()
            );
            println!(
                "Subject texture: {}x{}",
                loaded.subject_texture.width, loaded.subject_texture.height
            );
            println!(
                "Floor texture: {}x{}",
                loaded.floor_texture.width, loaded.floor_texture.height
            );
            println!("Assets OK");
        }
    }

    Ok(())
}
