use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use log::{info, warn};

use particle_field::prelude::*;
use particle_field::window::{self, WindowOptions};
use particle_field::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Drifting particles with proximity lines.
    Particles,
    /// Rotating geometric outlines.
    Shapes,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Decorative particle and shape backdrops", long_about = None)]
struct Args {
    #[arg(long, value_enum, default_value = "particles")]
    mode: Mode,
    /// JSON config for the selected mode; missing fields use defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Quality tier: full or reduced.
    #[arg(long, default_value = "full")]
    tier: QualityTier,
    #[arg(long)]
    seed: Option<u64>,
    /// Render headless and write the final frame to this PNG instead of opening a window.
    #[arg(long)]
    snapshot: Option<PathBuf>,
    /// Frames to run before writing the snapshot.
    #[arg(long, default_value_t = 120)]
    frames: usize,
    #[arg(long, default_value_t = 1280)]
    width: u32,
    #[arg(long, default_value_t = 720)]
    height: u32,
}

fn load_or_default<T>(path: Option<&Path>, load: fn(&Path) -> Result<T, ConfigError>, default: T) -> T {
    let Some(path) = path else {
        return default;
    };
    match load(path) {
        Ok(config) => {
            info!("loaded config from {}", path.display());
            config
        }
        Err(e) => {
            warn!("ignoring config {}: {e}", path.display());
            default
        }
    }
}

fn snapshot<S: Simulation>(simulation: S, args: &Args, path: &Path) -> Result<(), Box<dyn Error>> {
    let mut host = OffscreenHost::with_canvas("snapshot", args.width, args.height);
    let viewport = Viewport::new(args.width as f32, args.height as f32);
    let mut driver = Driver::new(&mut host, "snapshot", viewport, simulation);
    let ran = host.run_frames(&mut driver, args.frames);
    driver.destroy(&mut host);

    if let Some(canvas) = host.get(driver.surface_id()) {
        canvas.save_png(path)?;
        info!("wrote {} after {ran} frames", path.display());
    }
    Ok(())
}

fn launch<S: Simulation>(simulation: S, args: &Args) -> Result<(), Box<dyn Error>> {
    match &args.snapshot {
        Some(path) => snapshot(simulation, args, path),
        None => {
            let options = WindowOptions {
                width: args.width,
                height: args.height,
                ..Default::default()
            };
            Ok(window::run(simulation, options)?)
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match args.mode {
        Mode::Particles => {
            let mut config = load_or_default(
                args.config.as_deref(),
                |p| FieldConfig::load(p),
                FieldConfig::for_tier(args.tier),
            );
            if let Some(seed) = args.seed {
                config = config.with_seed(seed);
            }
            launch(ParticleField::new(config), &args)
        }
        Mode::Shapes => {
            let mut config = load_or_default(
                args.config.as_deref(),
                |p| ShapeConfig::load(p),
                ShapeConfig::for_tier(args.tier),
            );
            if let Some(seed) = args.seed {
                config = config.with_seed(seed);
            }
            launch(ShapeField::new(config), &args)
        }
    }
}
