//! Geometric shape field: slowly rotating, floating outlines.
//!
//! Shapes move independently of each other and ignore the pointer. The
//! surface is cleared every frame.

use std::f32::consts::{FRAC_PI_3, TAU};

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::color::Rgba;
use crate::config::ShapeConfig;
use crate::driver::Simulation;
use crate::input::{PointerState, SignalKind, Viewport};
use crate::surface::Surface;

/// Shapes only react to the viewport.
const SHAPE_SIGNALS: [SignalKind; 2] = [SignalKind::Resize, SignalKind::Visibility];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// Isosceles, apex up.
    Triangle,
    /// Axis-aligned before rotation, centered on the shape position.
    Square,
    /// Six vertices at 60° steps, circumradius `size / 2`.
    Hexagon,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 3] = [ShapeKind::Triangle, ShapeKind::Square, ShapeKind::Hexagon];

    /// Outline in local coordinates for an edge size of `size`.
    pub fn vertices(self, size: f32) -> Vec<Vec2> {
        let h = size / 2.0;
        match self {
            ShapeKind::Triangle => vec![Vec2::new(0.0, -h), Vec2::new(-h, h), Vec2::new(h, h)],
            ShapeKind::Square => vec![
                Vec2::new(-h, -h),
                Vec2::new(h, -h),
                Vec2::new(h, h),
                Vec2::new(-h, h),
            ],
            ShapeKind::Hexagon => (0..6)
                .map(|i| Vec2::from_angle(FRAC_PI_3 * i as f32) * h)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shape {
    pub kind: ShapeKind,
    pub size: f32,
    pub position: Vec2,
    /// Rest height the shape floats around.
    pub base_y: f32,
    /// Radians.
    pub rotation: f32,
    pub rotation_speed: f32,
    pub float_phase: f32,
    pub float_speed: f32,
    pub color: Rgba,
}

impl Shape {
    /// Advance rotation and float phase by one frame.
    pub fn advance(&mut self, float_amplitude: f32) {
        self.rotation += self.rotation_speed;
        self.float_phase += self.float_speed;
        self.settle(float_amplitude);
    }

    /// Recompute `position.y` from the float phase.
    fn settle(&mut self, float_amplitude: f32) {
        self.position.y = self.base_y + self.float_phase.sin() * float_amplitude;
    }

    /// Outline in surface coordinates.
    pub fn outline(&self) -> Vec<Vec2> {
        let rotation = Vec2::from_angle(self.rotation);
        self.kind
            .vertices(self.size)
            .into_iter()
            .map(|v| self.position + rotation.rotate(v))
            .collect()
    }

    /// Outline color: the fill color at twice its alpha.
    pub fn stroke_color(&self) -> Rgba {
        self.color.scale_alpha(2.0)
    }
}

pub struct ShapeField {
    config: ShapeConfig,
    shapes: Vec<Shape>,
    bounds: Viewport,
    rng: SmallRng,
}

impl ShapeField {
    pub fn new(config: ShapeConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self {
            config,
            shapes: Vec::new(),
            bounds: Viewport::default(),
            rng,
        }
    }

    pub fn config(&self) -> &ShapeConfig {
        &self.config
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn shapes_mut(&mut self) -> &mut [Shape] {
        &mut self.shapes
    }

    pub fn bounds(&self) -> Viewport {
        self.bounds
    }

    fn spawn(&mut self) -> Shape {
        let c = &self.config;
        let kind = ShapeKind::ALL[self.rng.gen_range(0..ShapeKind::ALL.len())];
        let size = c.size.sample(self.rng.gen());
        let position = Vec2::new(
            self.rng.gen::<f32>() * self.bounds.width,
            self.rng.gen::<f32>() * self.bounds.height,
        );
        let rotation = self.rng.gen::<f32>() * TAU;
        let rotation_speed = (self.rng.gen::<f32>() - 0.5) * c.rotation_speed;
        let float_speed = self.rng.gen::<f32>() * c.float_speed + c.float_speed;
        let color = if c.palette.is_empty() {
            Rgba::TRANSPARENT
        } else {
            c.palette[self.rng.gen_range(0..c.palette.len())]
        };
        let float_phase = self.rng.gen::<f32>() * TAU;

        let mut shape = Shape {
            kind,
            size,
            position,
            base_y: position.y,
            rotation,
            rotation_speed,
            float_phase,
            float_speed,
            color,
        };
        shape.settle(c.float_amplitude);
        shape
    }
}

impl Simulation for ShapeField {
    fn name(&self) -> &'static str {
        "shape field"
    }

    fn signals(&self) -> &'static [SignalKind] {
        &SHAPE_SIGNALS
    }

    fn rebuild(&mut self, viewport: Viewport) {
        self.bounds = viewport.clamped();
        self.shapes = (0..self.config.shape_count).map(|_| self.spawn()).collect();
    }

    fn step(&mut self, _pointer: &PointerState) {
        let amplitude = self.config.float_amplitude;
        for shape in &mut self.shapes {
            shape.advance(amplitude);
        }
    }

    fn render(&self, surface: &mut dyn Surface, _pointer: &PointerState) {
        surface.clear();
        surface.set_blur(self.config.blur);
        for shape in &self.shapes {
            let outline = shape.outline();
            surface.fill_polygon(&outline, shape.color);
            surface.stroke_polygon(&outline, self.config.stroke_width, shape.stroke_color());
        }
        surface.set_blur(0.0);
    }

    fn entity_count(&self) -> usize {
        self.shapes.len()
    }
}
