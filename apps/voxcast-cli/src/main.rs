use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use glam::Vec3;
use tracing_subscriber::EnvFilter;
use voxcast_common::{EngineConfig, Rotation};
use voxcast_input::InputState;
use voxcast_kernel::Scene;
use voxcast_render::{Engine, FrameRenderer, Renderer, TextRenderer};
use voxcast_tools::{FrameTimer, SceneInspector};

#[derive(Parser)]
#[command(name = "voxcast-cli", about = "Render and inspect voxcast scenes")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// YAML engine config; defaults are used for missing keys
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the scene seed
    #[arg(short, long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the engine config and a summary of the generated scene
    Info {
        /// Print the scene summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Render one frame from the spawn pose or a given camera
    Render {
        /// PNG file to write
        #[arg(short, long, default_value = "frame.png")]
        output: PathBuf,
        /// Print ASCII art to stdout instead of writing a PNG
        #[arg(long)]
        ascii: bool,
        /// Width of the ASCII rendition in characters
        #[arg(long, default_value = "80")]
        columns: u32,
        /// Camera yaw in radians
        #[arg(long, value_parser = parse_finite, allow_negative_numbers = true)]
        yaw: Option<f32>,
        /// Camera pitch in radians, clamped to the pitch limit
        #[arg(long, value_parser = parse_finite, allow_negative_numbers = true)]
        pitch: Option<f32>,
        /// Camera position as x,y,z
        #[arg(long, value_parser = parse_vec3, allow_negative_numbers = true)]
        pos: Option<Vec3>,
    },
    /// Time a number of engine ticks without input
    Bench {
        /// Number of frames to render
        #[arg(short, long, default_value = "100")]
        frames: usize,
    },
}

fn parse_finite(s: &str) -> Result<f32, String> {
    let value: f32 = s.trim().parse().map_err(|e| format!("invalid number {s:?}: {e}"))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("{s:?} is not a finite number"))
    }
}

fn parse_vec3(s: &str) -> Result<Vec3, String> {
    fn coord(v: &str) -> Result<f32, String> {
        parse_finite(v).map_err(|e| format!("invalid coordinate: {e}"))
    }

    match s.split(',').collect::<Vec<_>>().as_slice() {
        [x, y, z] => Ok(Vec3::new(coord(x)?, coord(y)?, coord(z)?)),
        _ => Err(format!("expected x,y,z, got {s:?}")),
    }
}

fn load_config(path: Option<&Path>, seed: Option<u64>) -> anyhow::Result<EngineConfig> {
    let mut config = match path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(seed) = seed {
        config.seed = seed;
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_deref(), cli.seed)?;

    match cli.command {
        Commands::Info { json } => {
            let scene = Scene::generate(&config);
            let summary = SceneInspector::summary(&scene);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("voxcast-cli v{}", env!("CARGO_PKG_VERSION"));
                println!(
                    "frame: {}x{} fov={:.0} render_distance={}",
                    config.width, config.height, config.fov_degrees, config.render_distance
                );
                println!("seed: {}", config.seed);
                println!("{summary}");
                println!("fill: {:.2}%", summary.fill_ratio() * 100.0);
            }
        }
        Commands::Render {
            output,
            ascii,
            columns,
            yaw,
            pitch,
            pos,
        } => {
            let mut scene = Scene::generate(&config);
            if let Some(pos) = pos {
                scene.camera.position = pos;
            }
            let rotation = scene.camera.rotation;
            scene.camera.rotation = Rotation::new(
                yaw.unwrap_or(rotation.yaw()),
                pitch.unwrap_or(rotation.pitch()),
            );
            tracing::info!(camera = ?scene.camera, "rendering");

            if ascii {
                // Keep the frame's shape, with cells twice as tall as wide.
                let rows = ((columns as f32 / config.aspect()) * 0.5).round().max(1.0) as u32;
                print!("{}", TextRenderer::from_config(&config, columns, rows).render(&scene));
            } else {
                let frame = FrameRenderer::from_config(&config).render(&scene);
                let image =
                    image::RgbaImage::from_raw(frame.width(), frame.height(), frame.to_rgba8())
                        .context("frame buffer does not match its dimensions")?;
                image
                    .save_with_format(&output, image::ImageFormat::Png)
                    .with_context(|| format!("failed to write {}", output.display()))?;
                println!("wrote {}x{} frame to {}", frame.width(), frame.height(), output.display());
            }
        }
        Commands::Bench { frames } => {
            let mut engine = Engine::new(&config);
            let mut timer = FrameTimer::new(frames.max(1));
            let input = InputState::new();

            let start = Instant::now();
            for _ in 0..frames {
                let tick_start = Instant::now();
                engine.tick(&input);
                timer.record(tick_start.elapsed());
            }
            let elapsed = start.elapsed();

            println!(
                "{frames} frames at {}x{} in {elapsed:?}",
                config.width, config.height
            );
            println!(
                "avg {:?}  min {:?}  max {:?}  ({:.1} fps)",
                timer.average(),
                timer.min(),
                timer.max(),
                timer.fps()
            );
        }
    }

    Ok(())
}
