//! Colors and palettes.
//!
//! Colors are straight (non-premultiplied) RGBA with every channel in
//! `0.0..=1.0`. Surfaces blend them with source-over compositing.

use serde::{Deserialize, Serialize};

/// A straight-alpha RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Build from 8-bit channels and a float alpha, CSS `rgba()` style.
    pub fn rgb8(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a.clamp(0.0, 1.0),
        }
    }

    /// Same color with a different alpha.
    #[inline]
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a: a.clamp(0.0, 1.0), ..self }
    }

    /// Same color with alpha multiplied by `factor`.
    #[inline]
    pub fn scale_alpha(self, factor: f32) -> Self {
        self.with_alpha(self.a * factor)
    }

    /// Channel-wise linear interpolation.
    pub fn lerp(self, other: Rgba, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    /// Convert to 8-bit channels, alpha included.
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

/// Indigo brand color used for particles and connections.
pub fn indigo(alpha: f32) -> Rgba {
    Rgba::rgb8(79, 70, 229, alpha)
}

/// Gold accent used for pointer connections.
pub fn gold(alpha: f32) -> Rgba {
    Rgba::rgb8(255, 215, 0, alpha)
}

/// Near-black backdrop used for the trail fade.
pub fn backdrop(alpha: f32) -> Rgba {
    Rgba::rgb8(10, 10, 10, alpha)
}

/// The four translucent tints the shape field draws from.
pub fn shape_palette() -> Vec<Rgba> {
    vec![
        indigo(0.1),
        Rgba::rgb8(99, 102, 241, 0.1),
        Rgba::rgb8(139, 92, 246, 0.1),
        gold(0.05),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb8_normalizes_channels() {
        let c = Rgba::rgb8(255, 0, 51, 0.5);
        assert_eq!(c.r, 1.0);
        assert_eq!(c.g, 0.0);
        assert!((c.b - 0.2).abs() < 1e-6);
        assert_eq!(c.a, 0.5);
    }

    #[test]
    fn scale_alpha_clamps() {
        let c = indigo(0.6);
        assert!((c.scale_alpha(0.5).a - 0.3).abs() < 1e-6);
        assert_eq!(c.scale_alpha(10.0).a, 1.0);
        assert_eq!(c.scale_alpha(-1.0).a, 0.0);
    }

    #[test]
    fn to_rgba8_rounds() {
        assert_eq!(gold(1.0).to_rgba8(), [255, 215, 0, 255]);
        assert_eq!(Rgba::TRANSPARENT.to_rgba8(), [0, 0, 0, 0]);
    }

    #[test]
    fn palette_has_four_tints() {
        let palette = shape_palette();
        assert_eq!(palette.len(), 4);
        assert!(palette.iter().all(|c| c.a <= 0.1));
    }
}
