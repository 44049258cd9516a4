use glam::Vec2;

use super::Surface;
use crate::color::Rgba;

/// A single recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Resize { width: u32, height: u32 },
    FillRect { min: Vec2, max: Vec2, color: Rgba },
    FillCircle { center: Vec2, radius: f32, color: Rgba },
    RadialGradient { center: Vec2, radius: f32, inner: Rgba, outer: Rgba },
    Line { from: Vec2, to: Vec2, width: f32, color: Rgba },
    FillPolygon { points: Vec<Vec2>, color: Rgba },
    StrokePolygon { points: Vec<Vec2>, width: f32, color: Rgba },
    SetBlur(f32),
}

/// Surface that records calls instead of rasterizing them.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drain everything recorded so far.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Every recorded line as `(from, to, width, color)`.
    pub fn lines(&self) -> impl Iterator<Item = (Vec2, Vec2, f32, Rgba)> + '_ {
        self.commands.iter().filter_map(|c| match *c {
            DrawCommand::Line { from, to, width, color } => Some((from, to, width, color)),
            _ => None,
        })
    }

    /// Every recorded polygon fill.
    pub fn polygons(&self) -> impl Iterator<Item = (&[Vec2], Rgba)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::FillPolygon { points, color } => Some((points.as_slice(), *color)),
            _ => None,
        })
    }
}

impl Surface for DrawList {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.commands.push(DrawCommand::Resize { width, height });
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_rect(&mut self, min: Vec2, max: Vec2, color: Rgba) {
        self.commands.push(DrawCommand::FillRect { min, max, color });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::FillCircle { center, radius, color });
    }

    fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, inner: Rgba, outer: Rgba) {
        self.commands.push(DrawCommand::RadialGradient { center, radius, inner, outer });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.commands.push(DrawCommand::Line { from, to, width, color });
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Rgba) {
        self.commands.push(DrawCommand::FillPolygon { points: points.to_vec(), color });
    }

    fn stroke_polygon(&mut self, points: &[Vec2], width: f32, color: Rgba) {
        self.commands.push(DrawCommand::StrokePolygon { points: points.to_vec(), width, color });
    }

    fn set_blur(&mut self, radius: f32) {
        self.commands.push(DrawCommand::SetBlur(radius));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_order_and_drains() {
        let mut list = DrawList::new(10, 10);
        list.clear();
        list.stroke_line(Vec2::ZERO, Vec2::ONE, 1.0, Rgba::TRANSPARENT);
        assert_eq!(list.commands().len(), 2);
        assert_eq!(list.lines().count(), 1);
        assert_eq!(list.take()[0], DrawCommand::Clear);
        assert!(list.commands().is_empty());
    }

    #[test]
    fn fill_uses_current_size() {
        let mut list = DrawList::new(4, 3);
        list.fill(Rgba::TRANSPARENT);
        assert_eq!(
            list.commands()[0],
            DrawCommand::FillRect {
                min: Vec2::ZERO,
                max: Vec2::new(4.0, 3.0),
                color: Rgba::TRANSPARENT
            }
        );
    }
}
