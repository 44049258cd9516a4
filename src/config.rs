//! Simulation configuration.
//!
//! Both configs deserialize from partial JSON: every field falls back to
//! its default, so a file containing only `{"particle_count": 40}` is
//! valid.
//!
//! ```ignore
//! let config = FieldConfig::load("backdrop.json")?;
//! let field = ParticleField::new(config);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::{self, Rgba};
use crate::error::ConfigError;
use crate::quality::QualityTier;

/// An inclusive `min..=max` range of reals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f32,
    pub max: f32,
}

impl Range {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Map a unit sample `t` in `[0, 1)` into the range.
    #[inline]
    pub fn sample(&self, t: f32) -> f32 {
        self.min + (self.max - self.min) * t
    }

    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min.min(self.max) && value <= self.max.max(self.min)
    }
}

/// How the particle field finds pairs closer than the connection distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighborSearch {
    /// Check every unordered pair. Fine for tens to low hundreds of particles.
    #[default]
    BruteForce,
    /// Bucket particles into a uniform grid with cells one connection
    /// distance wide and only compare neighboring cells.
    Grid,
}

/// Colors used by the particle field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldColors {
    /// Particle fill and glow center.
    pub particle: Rgba,
    /// Particle-to-particle lines; alpha is the opacity at distance 0.
    pub connection: Rgba,
    /// Particle-to-pointer lines; alpha is the opacity at distance 0.
    pub pointer_connection: Rgba,
    /// Low-alpha fill drawn over the previous frame for the trail effect.
    pub trail_fade: Rgba,
}

impl Default for FieldColors {
    fn default() -> Self {
        Self {
            particle: color::indigo(0.6),
            connection: color::indigo(0.1),
            pointer_connection: color::gold(0.2),
            trail_fade: color::backdrop(0.05),
        }
    }
}

/// Configuration for [`ParticleField`](crate::field::ParticleField).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub particle_count: usize,
    /// Base radius range.
    pub size: Range,
    /// Initial velocity components are uniform in `[-speed.max / 2, speed.max / 2]`.
    pub speed: Range,
    /// Hard cap on speed, units per frame.
    pub max_speed: f32,
    /// Per-frame velocity multiplier.
    pub damping: f32,
    /// Width of the uniform noise added to each velocity component per frame.
    pub jitter: f32,
    /// Pulse phase advance per frame, radians.
    pub pulse_step: f32,
    /// Radius oscillation amplitude around the base radius.
    pub pulse_amplitude: f32,
    pub connection_distance: f32,
    /// Radius in which the pointer pushes particles away.
    pub mouse_interaction_distance: f32,
    /// Radius in which particles get a line to the pointer.
    pub pointer_radius: f32,
    /// Scale applied to the repulsion force before it is added to velocity.
    pub repulsion_scale: f32,
    /// Glow radius as a multiple of the particle radius.
    pub glow_scale: f32,
    pub connection_width: f32,
    pub pointer_connection_width: f32,
    pub colors: FieldColors,
    pub neighbor_search: NeighborSearch,
    /// Fixed RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            particle_count: 100,
            size: Range::new(1.0, 3.0),
            speed: Range::new(0.1, 0.3),
            max_speed: 1.0,
            damping: 0.99,
            jitter: 0.01,
            pulse_step: 0.02,
            pulse_amplitude: 0.5,
            connection_distance: 150.0,
            mouse_interaction_distance: 200.0,
            pointer_radius: 150.0,
            repulsion_scale: 0.5,
            glow_scale: 3.0,
            connection_width: 1.0,
            pointer_connection_width: 2.0,
            colors: FieldColors::default(),
            neighbor_search: NeighborSearch::BruteForce,
            seed: None,
        }
    }
}

impl FieldConfig {
    /// Defaults adjusted for a quality tier.
    pub fn for_tier(tier: QualityTier) -> Self {
        Self {
            particle_count: tier.particle_count(),
            ..Self::default()
        }
    }

    pub fn with_particle_count(mut self, count: usize) -> Self {
        self.particle_count = count;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_neighbor_search(mut self, search: NeighborSearch) -> Self {
        self.neighbor_search = search;
        self
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        load_json(path.as_ref())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        save_json(self, path.as_ref())
    }
}

/// Configuration for [`ShapeField`](crate::shapes::ShapeField).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeConfig {
    pub shape_count: usize,
    /// Edge size range.
    pub size: Range,
    /// Per-shape rotation speed is uniform in `[-rotation_speed / 2, rotation_speed / 2]`.
    pub rotation_speed: f32,
    /// Per-shape float speed is uniform in `[float_speed, 2 * float_speed)`.
    pub float_speed: f32,
    /// Vertical float amplitude.
    pub float_amplitude: f32,
    pub stroke_width: f32,
    /// Soft-blur radius applied to fills and strokes.
    pub blur: f32,
    pub palette: Vec<Rgba>,
    pub seed: Option<u64>,
}

impl Default for ShapeConfig {
    fn default() -> Self {
        Self {
            shape_count: 20,
            size: Range::new(50.0, 150.0),
            rotation_speed: 0.001,
            float_speed: 0.0005,
            float_amplitude: 30.0,
            stroke_width: 2.0,
            blur: 1.0,
            palette: color::shape_palette(),
            seed: None,
        }
    }
}

impl ShapeConfig {
    pub fn for_tier(tier: QualityTier) -> Self {
        Self {
            shape_count: tier.shape_count(),
            ..Self::default()
        }
    }

    pub fn with_shape_count(mut self, count: usize) -> Self {
        self.shape_count = count;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        load_json(path.as_ref())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        save_json(self, path.as_ref())
    }
}

fn load_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, ConfigError> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

fn save_json<T: Serialize>(value: &T, path: &Path) -> Result<(), ConfigError> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let config: FieldConfig = serde_json::from_str(r#"{"particle_count": 40}"#).unwrap();
        assert_eq!(config.particle_count, 40);
        assert_eq!(config.connection_distance, 150.0);
        assert_eq!(config.colors, FieldColors::default());
    }

    #[test]
    fn neighbor_search_uses_snake_case() {
        let config: FieldConfig = serde_json::from_str(r#"{"neighbor_search": "grid"}"#).unwrap();
        assert_eq!(config.neighbor_search, NeighborSearch::Grid);
    }

    #[test]
    fn reduced_tier_lowers_counts() {
        assert_eq!(FieldConfig::for_tier(QualityTier::Reduced).particle_count, 30);
        assert_eq!(FieldConfig::for_tier(QualityTier::Full).particle_count, 100);
        assert!(ShapeConfig::for_tier(QualityTier::Reduced).shape_count < 20);
    }

    #[test]
    fn save_then_load_from_disk() {
        let path = std::env::temp_dir().join(format!("particle-field-config-{}.json", std::process::id()));
        let config = ShapeConfig::default().with_shape_count(7).with_seed(9);
        config.save(&path).unwrap();
        let loaded = ShapeConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = FieldConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn range_sample_and_contains() {
        let r = Range::new(1.0, 3.0);
        assert_eq!(r.sample(0.0), 1.0);
        assert_eq!(r.sample(0.5), 2.0);
        assert!(r.contains(2.9));
        assert!(!r.contains(3.1));
    }
}
