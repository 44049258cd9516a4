//! CPU rasterizer backed by an `image::RgbaImage`.
//!
//! Shapes are rendered with analytic coverage: each pixel center's
//! distance to the shape edge is turned into a coverage value over a
//! feather band of half a pixel, widened by the current blur radius.

use std::path::Path;

use glam::Vec2;
use image::{ImageResult, RgbaImage};

use super::Surface;
use crate::color::Rgba;

const EDGE_FEATHER: f32 = 0.5;

pub struct Canvas {
    image: RgbaImage,
    blur: f32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            blur: 0.0,
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Raw RGBA8 bytes, row-major, `width * 4` bytes per row.
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Pixel at `(x, y)`, or `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> ImageResult<()> {
        self.image.save_with_format(path, image::ImageFormat::Png)
    }

    #[inline]
    fn feather(&self) -> f32 {
        EDGE_FEATHER + self.blur
    }

    /// Pixel index range covering `lo..hi` on an axis of length `len`.
    fn span(lo: f32, hi: f32, len: u32) -> std::ops::Range<u32> {
        if !(lo.is_finite() && hi.is_finite()) || hi <= 0.0 {
            return 0..0;
        }
        let start = lo.floor().max(0.0) as u32;
        let end = (hi.ceil().max(0.0) as u32).min(len);
        start.min(end)..end
    }

    /// Run `f` on every pixel center in the box `min..max`; `f` returns the
    /// color and coverage to composite there.
    fn shade<F>(&mut self, min: Vec2, max: Vec2, mut f: F)
    where
        F: FnMut(Vec2) -> Option<(Rgba, f32)>,
    {
        let (w, h) = self.image.dimensions();
        for y in Self::span(min.y, max.y, h) {
            for x in Self::span(min.x, max.x, w) {
                let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if let Some((color, coverage)) = f(center) {
                    self.blend(x, y, color, coverage);
                }
            }
        }
    }

    fn blend(&mut self, x: u32, y: u32, color: Rgba, coverage: f32) {
        let sa = color.a * coverage.clamp(0.0, 1.0);
        if sa <= 0.0 {
            return;
        }
        let px = self.image.get_pixel_mut(x, y);
        let [dr, dg, db, da] = px.0.map(|c| c as f32 / 255.0);
        let out_a = sa + da * (1.0 - sa);
        let mix = |s: f32, d: f32| (s * sa + d * da * (1.0 - sa)) / out_a;
        *px = image::Rgba(
            Rgba::new(mix(color.r, dr), mix(color.g, dg), mix(color.b, db), out_a).to_rgba8(),
        );
    }
}

/// Coverage for a pixel at signed distance `d` from an edge (negative inside).
#[inline]
fn coverage(d: f32, feather: f32) -> f32 {
    ((feather - d) / (2.0 * feather)).clamp(0.0, 1.0)
}

fn segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

fn point_in_polygon(p: Vec2, points: &[Vec2]) -> bool {
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (a, b) = (points[i], points[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn edge_distance(p: Vec2, points: &[Vec2]) -> f32 {
    points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(&a, &b)| segment_distance(p, a, b))
        .fold(f32::INFINITY, f32::min)
}

fn bounds(points: &[Vec2]) -> (Vec2, Vec2) {
    points.iter().fold(
        (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
        |(lo, hi), &p| (lo.min(p), hi.max(p)),
    )
}

impl Surface for Canvas {
    fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.image.dimensions() != (width, height) {
            self.image = RgbaImage::new(width, height);
        }
    }

    fn clear(&mut self) {
        self.image.pixels_mut().for_each(|p| *p = image::Rgba([0, 0, 0, 0]));
    }

    fn fill_rect(&mut self, min: Vec2, max: Vec2, color: Rgba) {
        self.shade(min, max, |_| Some((color, 1.0)));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if radius <= 0.0 {
            return;
        }
        let feather = self.feather();
        let reach = Vec2::splat(radius + feather);
        self.shade(center - reach, center + reach, |p| {
            let c = coverage(p.distance(center) - radius, feather);
            (c > 0.0).then_some((color, c))
        });
    }

    fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, inner: Rgba, outer: Rgba) {
        if radius <= 0.0 {
            return;
        }
        let reach = Vec2::splat(radius);
        self.shade(center - reach, center + reach, |p| {
            let t = p.distance(center) / radius;
            (t < 1.0).then(|| (inner.lerp(outer, t), 1.0))
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        let half = width.max(0.0) * 0.5;
        let feather = self.feather();
        let reach = Vec2::splat(half + feather);
        self.shade(from.min(to) - reach, from.max(to) + reach, |p| {
            let c = coverage(segment_distance(p, from, to) - half, feather);
            (c > 0.0).then_some((color, c))
        });
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Rgba) {
        if points.len() < 3 {
            return;
        }
        let feather = self.feather();
        let (lo, hi) = bounds(points);
        let reach = Vec2::splat(feather);
        self.shade(lo - reach, hi + reach, |p| {
            let d = edge_distance(p, points);
            let signed = if point_in_polygon(p, points) { -d } else { d };
            let c = coverage(signed, feather);
            (c > 0.0).then_some((color, c))
        });
    }

    fn stroke_polygon(&mut self, points: &[Vec2], width: f32, color: Rgba) {
        if points.len() < 2 {
            return;
        }
        let half = width.max(0.0) * 0.5;
        let feather = self.feather();
        let (lo, hi) = bounds(points);
        let reach = Vec2::splat(half + feather);
        self.shade(lo - reach, hi + reach, |p| {
            let c = coverage(edge_distance(p, points) - half, feather);
            (c > 0.0).then_some((color, c))
        });
    }

    fn set_blur(&mut self, radius: f32) {
        self.blur = radius.max(0.0);
    }
}
