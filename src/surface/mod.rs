//! Drawing surfaces.
//!
//! A [`Surface`] is the 2D drawing target a simulation renders into. The
//! simulation never owns it: hosts resolve a [`SurfaceId`] to a surface
//! for the duration of a frame or a resize.
//!
//! Two implementations ship with the crate:
//!
//! - [`Canvas`] rasterizes on the CPU into an RGBA image, which the window
//!   host uploads to the GPU and snapshots write out as PNG.
//! - [`DrawList`] records every call, for tests and tooling.

mod canvas;
mod record;

use std::fmt;

use glam::Vec2;

use crate::color::Rgba;

pub use canvas::Canvas;
pub use record::{DrawCommand, DrawList};

/// Name under which a host exposes a surface.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SurfaceId(String);

impl SurfaceId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SurfaceId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Immediate-mode 2D drawing target.
///
/// Coordinates are in surface pixels with the origin at the top-left and
/// `y` pointing down. All drawing composites source-over.
pub trait Surface {
    /// Current size in pixels.
    fn size(&self) -> (u32, u32);

    /// Resize, discarding the current contents.
    fn resize(&mut self, width: u32, height: u32);

    /// Reset every pixel to fully transparent.
    fn clear(&mut self);

    /// Fill the axis-aligned rectangle `min..max`.
    fn fill_rect(&mut self, min: Vec2, max: Vec2, color: Rgba);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);

    /// Fill a disc whose color runs from `inner` at the center to `outer`
    /// at `radius`.
    fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, inner: Rgba, outer: Rgba);

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba);

    /// Fill a closed polygon (even-odd rule).
    fn fill_polygon(&mut self, points: &[Vec2], color: Rgba);

    /// Stroke the outline of a closed polygon.
    fn stroke_polygon(&mut self, points: &[Vec2], width: f32, color: Rgba);

    /// Soft-blur radius for subsequent draws; 0 disables it.
    fn set_blur(&mut self, radius: f32);

    /// Fill the whole surface.
    fn fill(&mut self, color: Rgba) {
        let (w, h) = self.size();
        self.fill_rect(Vec2::ZERO, Vec2::new(w as f32, h as f32), color);
    }
}
