//! # Shape Gallery
//!
//! Draws one of each shape kind side by side, frozen, and writes a PNG.
//!
//! Run with: `cargo run --example shape_gallery -- [out.png]`

use std::error::Error;

use log::info;
use particle_field::prelude::*;
use particle_field::color;

const CELL: f32 = 200.0;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let out = std::env::args().nth(1).unwrap_or_else(|| "shape_gallery.png".to_string());
    let width = CELL * ShapeKind::ALL.len() as f32;

    let config = ShapeConfig {
        // brighter than the backdrop palette so the gallery is legible
        palette: vec![color::indigo(0.4)],
        ..ShapeConfig::default().with_shape_count(ShapeKind::ALL.len()).with_seed(1)
    };
    let mut host = OffscreenHost::with_canvas("gallery", width as u32, CELL as u32);
    let mut driver = Driver::new(&mut host, "gallery", Viewport::new(width, CELL), ShapeField::new(config));

    for (i, (shape, kind)) in driver
        .simulation_mut()
        .shapes_mut()
        .iter_mut()
        .zip(ShapeKind::ALL)
        .enumerate()
    {
        shape.kind = kind;
        shape.size = CELL * 0.6;
        shape.position = Vec2::new(CELL * (i as f32 + 0.5), CELL / 2.0);
        shape.base_y = CELL / 2.0;
        shape.float_phase = 0.0;
        shape.float_speed = 0.0;
        shape.rotation = 0.0;
        shape.rotation_speed = 0.0;
    }
    host.run_pending_frame(&mut driver);
    driver.destroy(&mut host);

    if let Some(canvas) = host.get(driver.surface_id()) {
        canvas.save_png(&out)?;
        info!("wrote {out}");
    }
    Ok(())
}
