//! # particle-field
//!
//! Decorative 2D backdrops: drifting particles joined by proximity lines,
//! and slowly rotating geometric outlines.
//!
//! Simulations draw through the [`Surface`] trait and are run frame by frame
//! by a [`Driver`], which owns the pointer and viewport state and talks to
//! its surroundings through a [`Host`]. The crate ships two hosts: a winit
//! window ([`window::run`]) and a deterministic headless one
//! ([`OffscreenHost`]) for tests, tools and snapshots.
//!
//! ## Quick Start
//!
//! ```ignore
//! use particle_field::prelude::*;
//!
//! fn main() -> Result<(), RunError> {
//!     let field = ParticleField::new(FieldConfig::for_tier(QualityTier::Full));
//!     particle_field::window::run(field, WindowOptions::default())
//! }
//! ```
//!
//! ## Headless
//!
//! ```ignore
//! use particle_field::prelude::*;
//!
//! let mut host = OffscreenHost::with_canvas("backdrop", 640, 360);
//! let field = ParticleField::new(FieldConfig::default().with_seed(7));
//! let mut driver = Driver::new(&mut host, "backdrop", Viewport::new(640.0, 360.0), field);
//! host.run_frames(&mut driver, 120);
//! host.get(driver.surface_id()).map(|canvas| canvas.save_png("frame.png"));
//! ```
//!
//! ## Lifecycle
//!
//! | Call | Effect |
//! |------|--------|
//! | [`Driver::new`] | sizes the surface, creates entities, registers listeners, schedules a frame |
//! | [`Driver::pause`] | cancels the pending frame, keeps entities and listeners |
//! | [`Driver::resume`] | schedules a frame again |
//! | [`Driver::destroy`] | pauses and removes listeners; terminal |
//!
//! A driver whose surface cannot be resolved is inert and ignores all of
//! these.

pub mod color;
pub mod config;
pub mod driver;
pub mod error;
pub mod field;
pub mod gpu;
pub mod host;
pub mod input;
pub mod quality;
pub mod shapes;
pub mod spatial;
pub mod surface;
pub mod time;
pub mod window;

pub use color::Rgba;
pub use config::{FieldColors, FieldConfig, NeighborSearch, Range, ShapeConfig};
pub use driver::{Driver, Environment, FrameRequest, FrameScheduler, Host, ListenerId, LoopState, Simulation};
pub use error::{ConfigError, PresentError, RunError};
pub use field::{Connection, Particle, ParticleField};
pub use glam::Vec2;
pub use host::OffscreenHost;
pub use input::{PointerState, Signal, SignalKind, Viewport};
pub use quality::QualityTier;
pub use shapes::{Shape, ShapeField, ShapeKind};
pub use surface::{Canvas, DrawCommand, DrawList, Surface, SurfaceId};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use particle_field::prelude::*;
/// ```
pub mod prelude {
    pub use crate::color::Rgba;
    pub use crate::config::{FieldConfig, NeighborSearch, Range, ShapeConfig};
    pub use crate::driver::{Driver, Host, LoopState, Simulation};
    pub use crate::error::RunError;
    pub use crate::field::ParticleField;
    pub use crate::host::OffscreenHost;
    pub use crate::input::{PointerState, Signal, Viewport};
    pub use crate::quality::QualityTier;
    pub use crate::shapes::{ShapeField, ShapeKind};
    pub use crate::surface::{Canvas, DrawList, Surface, SurfaceId};
    pub use crate::window::WindowOptions;
    pub use crate::Vec2;
}
