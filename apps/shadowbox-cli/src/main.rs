use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use shadowbox_render::{DebugTextRenderer, Renderer};
use shadowbox_stage::{StageConfig, animate, build_scene};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "shadowbox-cli", about = "CLI for the shadowbox demo scene")]
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
    /// Build the default stage, advance the animation, and print each frame
    Render {
        /// Number of frames to print
        #[arg(short, long, default_value = "4")]
        frames: u32,
        /// Seconds of animation time between frames
        #[arg(short, long, default_value = "0.25")]
        step: f32,
        /// Stage configuration file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Load a stage configuration, build it, and report what it produces
    Validate {
        /// Stage configuration file (JSON)
        config: PathBuf,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<StageConfig> {
    match path {
        Some(path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("open config {}", path.display()))?;
            serde_json::from_reader(file)
                .with_context(|| format!("parse config {}", path.display()))
        }
        None => Ok(StageConfig::default()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("shadowbox-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", shadowbox_common::crate_info());
            println!("scene: {}", shadowbox_scene::crate_info());
            println!("builders: {}", shadowbox_builders::crate_info());
            println!("stage: {}", shadowbox_stage::crate_info());
            println!("render: {}", shadowbox_render::crate_info());
        }
        Commands::Render {
            frames,
            step,
            config,
        } => {
            let config = load_config(config.as_ref())?;
            let mut handle = build_scene(&config)?;
            let renderer = DebugTextRenderer::new();

            for frame in 0..frames {
                let t = frame as f32 * step;
                animate(&mut handle.scene, handle.box_group, t, config.pulse_floor);
                println!("--- frame {frame} (t={t:.2}) ---");
                print!("{}", renderer.render(&handle.scene, &handle.view));
            }
        }
        Commands::Validate { config } => {
            let config = load_config(Some(&config))?;
            let handle = build_scene(&config)?;
            let scene = &handle.scene;

            println!("Config OK");
            println!(
                "  nodes: {}, boxes: {}",
                scene.node_count(),
                scene.children(handle.box_group).len()
            );
            if let Some((_, light)) = scene.directional_light() {
                println!(
                    "  sun: #{} x{:.2}, shadow ±{} @ {}x{}",
                    light.color.to_hex(),
                    light.intensity,
                    light.shadow.bounds.right,
                    light.shadow.map_width,
                    light.shadow.map_height
                );
            }
            if let Some((_, light)) = scene.ambient_light() {
                println!("  ambient: #{} x{:.2}", light.color.to_hex(), light.intensity);
            }
        }
    }

    Ok(())
}
