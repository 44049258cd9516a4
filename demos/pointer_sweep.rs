//! # Pointer Sweep
//!
//! Runs the particle field headless while a synthetic pointer circles the
//! middle of the canvas, then writes the last frame as PNG.
//!
//! Run with: `cargo run --example pointer_sweep --release -- [out.png] [frames]`

use std::error::Error;

use log::info;
use particle_field::prelude::*;

const WIDTH: u32 = 960;
const HEIGHT: u32 = 540;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let out = args.next().unwrap_or_else(|| "pointer_sweep.png".to_string());
    let frames: usize = args.next().and_then(|s| s.parse().ok()).unwrap_or(240);

    let mut host = OffscreenHost::with_canvas("sweep", WIDTH, HEIGHT);
    let viewport = Viewport::new(WIDTH as f32, HEIGHT as f32);
    let field = ParticleField::new(FieldConfig::default().with_seed(2024));
    let mut driver = Driver::new(&mut host, "sweep", viewport, field);

    let center = viewport.size() / 2.0;
    for frame in 0..frames {
        let angle = frame as f32 / frames as f32 * std::f32::consts::TAU;
        let pointer = center + Vec2::from_angle(angle) * 180.0;
        host.deliver(&mut driver, Signal::PointerMoved(pointer));
        host.run_pending_frame(&mut driver);
    }

    let lines = driver.simulation().connections().len();
    let pointer_lines = driver.simulation().pointer_connections(driver.pointer()).len();
    info!("{frames} frames, {lines} connections, {pointer_lines} to the pointer");

    driver.destroy(&mut host);
    if let Some(canvas) = host.get(driver.surface_id()) {
        canvas.save_png(&out)?;
        info!("wrote {out}");
    }
    Ok(())
}
