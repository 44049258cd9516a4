//! Particle field: drifting points joined by proximity lines.
//!
//! Each frame every particle integrates its velocity, bounces off the
//! surface edges, pulses its radius, loses a little energy to damping and
//! gains a little back from random jitter, then has its speed capped. A
//! pointer inside the interaction distance pushes particles away.
//!
//! Rendering fades the previous frame instead of clearing it, which leaves
//! short motion trails, then draws each particle with a glow halo and
//! lines between every pair closer than the connection distance.
//!
//! ```ignore
//! let mut host = OffscreenHost::with_canvas("backdrop", 1280, 720);
//! let field = ParticleField::new(FieldConfig::default().with_seed(1));
//! let mut driver = Driver::new(&mut host, "backdrop", Viewport::new(1280.0, 720.0), field);
//! host.run_pending_frame(&mut driver);
//! ```

use std::f32::consts::TAU;

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::color::Rgba;
use crate::config::FieldConfig;
use crate::driver::Simulation;
use crate::input::{PointerState, SignalKind, Viewport};
use crate::spatial;
use crate::surface::Surface;

/// Opacity of a proximity line: 1 at distance 0 falling linearly to 0 at
/// `threshold` and beyond.
#[inline]
pub fn connection_opacity(distance: f32, threshold: f32) -> f32 {
    if threshold <= 0.0 || distance >= threshold {
        return 0.0;
    }
    1.0 - distance.max(0.0) / threshold
}

/// Repulsion strength at `distance` from the pointer: 1 at the pointer,
/// falling linearly to 0 at `interaction_distance` and beyond.
#[inline]
pub fn repulsion_force(distance: f32, interaction_distance: f32) -> f32 {
    if interaction_distance <= 0.0 || distance >= interaction_distance {
        return 0.0;
    }
    (interaction_distance - distance.max(0.0)) / interaction_distance
}

/// Rescale `velocity` down to `max_speed` if it is faster, keeping direction.
#[inline]
pub fn clamp_speed(velocity: Vec2, max_speed: f32) -> Vec2 {
    let max_speed = max_speed.max(0.0);
    let speed = velocity.length();
    if speed > max_speed && speed > 0.0 {
        velocity * (max_speed / speed)
    } else {
        velocity
    }
}

/// A pulsing point particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    /// Units per frame.
    pub velocity: Vec2,
    pub base_radius: f32,
    /// `base_radius + sin(phase) * pulse_amplitude`, refreshed every frame.
    pub radius: f32,
    /// Pulse phase accumulator, radians.
    pub phase: f32,
    pub color: Rgba,
}

impl Particle {
    pub fn new(position: Vec2, velocity: Vec2, base_radius: f32, phase: f32, color: Rgba) -> Self {
        Self {
            position,
            velocity,
            base_radius,
            radius: base_radius,
            phase,
            color,
        }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Advance one frame inside `bounds`, without pointer interaction.
    pub fn advance<R: Rng>(&mut self, bounds: Viewport, config: &FieldConfig, rng: &mut R) {
        let bounds = bounds.clamped();

        self.position += self.velocity;
        bounce(&mut self.position.x, &mut self.velocity.x, bounds.width);
        bounce(&mut self.position.y, &mut self.velocity.y, bounds.height);

        self.phase += config.pulse_step;
        self.radius = self.base_radius + self.phase.sin() * config.pulse_amplitude;

        self.velocity *= config.damping;
        self.velocity += Vec2::new(rng.gen::<f32>() - 0.5, rng.gen::<f32>() - 0.5) * config.jitter;
        self.velocity = clamp_speed(self.velocity, config.max_speed);

        self.pin_degenerate_axes(bounds);
    }

    /// Push away from `pointer` if it is within the interaction distance.
    /// Returns whether a force was applied.
    pub fn repel_from(&mut self, pointer: Vec2, bounds: Viewport, config: &FieldConfig) -> bool {
        let delta = pointer - self.position;
        let distance = delta.length();
        let force = repulsion_force(distance, config.mouse_interaction_distance);
        if force <= 0.0 {
            return false;
        }
        // A pointer exactly on the particle pushes along +x.
        let direction = if distance > 0.0 { delta / distance } else { Vec2::X };
        self.velocity -= direction * force * config.repulsion_scale;
        self.velocity = clamp_speed(self.velocity, config.max_speed);
        self.pin_degenerate_axes(bounds.clamped());
        true
    }

    /// A zero-width axis has nowhere to bounce: hold the particle at 0.
    fn pin_degenerate_axes(&mut self, bounds: Viewport) {
        if bounds.width <= 0.0 {
            self.position.x = 0.0;
            self.velocity.x = 0.0;
        }
        if bounds.height <= 0.0 {
            self.position.y = 0.0;
            self.velocity.y = 0.0;
        }
    }
}

/// Reflect off `[0, extent]` so the velocity points back inside, then clamp.
#[inline]
fn bounce(position: &mut f32, velocity: &mut f32, extent: f32) {
    if *position < 0.0 {
        *velocity = velocity.abs();
    } else if *position > extent {
        *velocity = -velocity.abs();
    }
    *position = position.clamp(0.0, extent);
}

/// A line segment to draw, with its opacity factor in `0..=1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    pub from: Vec2,
    pub to: Vec2,
    pub opacity: f32,
}

/// The particle field simulation.
pub struct ParticleField {
    config: FieldConfig,
    particles: Vec<Particle>,
    bounds: Viewport,
    rng: SmallRng,
}

impl ParticleField {
    /// Create an empty field. Particles are spawned when a driver first
    /// sizes it with [`Simulation::rebuild`].
    pub fn new(config: FieldConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self {
            config,
            particles: Vec::new(),
            bounds: Viewport::default(),
            rng,
        }
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access to particle state. The set itself only changes on rebuild.
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn bounds(&self) -> Viewport {
        self.bounds
    }

    fn spawn(&mut self) -> Particle {
        let c = &self.config;
        let position = Vec2::new(
            self.rng.gen::<f32>() * self.bounds.width,
            self.rng.gen::<f32>() * self.bounds.height,
        );
        let base_radius = c.size.sample(self.rng.gen());
        let velocity = Vec2::new(self.rng.gen::<f32>() - 0.5, self.rng.gen::<f32>() - 0.5) * c.speed.max;
        let phase = self.rng.gen::<f32>() * TAU;
        let mut particle = Particle::new(position, velocity, base_radius, phase, c.colors.particle);
        particle.radius = base_radius + phase.sin() * c.pulse_amplitude;
        particle
    }

    /// Lines between every pair of particles closer than the connection distance.
    pub fn connections(&self) -> Vec<Connection> {
        let points: Vec<Vec2> = self.particles.iter().map(|p| p.position).collect();
        let threshold = self.config.connection_distance;
        spatial::pairs_within(&points, threshold, self.bounds.size(), self.config.neighbor_search)
            .into_iter()
            .map(|pair| Connection {
                from: points[pair.a],
                to: points[pair.b],
                opacity: connection_opacity(pair.distance, threshold),
            })
            .collect()
    }

    /// Lines from every particle within the pointer radius to the pointer.
    pub fn pointer_connections(&self, pointer: &PointerState) -> Vec<Connection> {
        let Some(target) = pointer.position else {
            return Vec::new();
        };
        self.particles
            .iter()
            .filter_map(|p| {
                let opacity = connection_opacity(p.position.distance(target), pointer.radius);
                (opacity > 0.0).then_some(Connection {
                    from: p.position,
                    to: target,
                    opacity,
                })
            })
            .collect()
    }
}

impl Simulation for ParticleField {
    fn name(&self) -> &'static str {
        "particle field"
    }

    fn signals(&self) -> &'static [SignalKind] {
        &SignalKind::ALL
    }

    fn pointer_radius(&self) -> f32 {
        self.config.pointer_radius
    }

    fn rebuild(&mut self, viewport: Viewport) {
        self.bounds = viewport.clamped();
        self.particles = (0..self.config.particle_count).map(|_| self.spawn()).collect();
    }

    fn step(&mut self, pointer: &PointerState) {
        let bounds = self.bounds;
        for particle in &mut self.particles {
            particle.advance(bounds, &self.config, &mut self.rng);
            if let Some(target) = pointer.position {
                particle.repel_from(target, bounds, &self.config);
            }
        }
    }

    fn render(&self, surface: &mut dyn Surface, pointer: &PointerState) {
        let colors = self.config.colors;
        surface.fill(colors.trail_fade);

        for p in &self.particles {
            let radius = p.radius.max(0.0);
            surface.fill_circle(p.position, radius, p.color);
            surface.fill_radial_gradient(p.position, radius * self.config.glow_scale, p.color, p.color.with_alpha(0.0));
        }

        for c in self.connections() {
            surface.stroke_line(c.from, c.to, self.config.connection_width, colors.connection.scale_alpha(c.opacity));
        }
        for c in self.pointer_connections(pointer) {
            surface.stroke_line(
                c.from,
                c.to,
                self.config.pointer_connection_width,
                colors.pointer_connection.scale_alpha(c.opacity),
            );
        }
    }

    fn entity_count(&self) -> usize {
        self.particles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_config() -> FieldConfig {
        FieldConfig {
            jitter: 0.0,
            damping: 1.0,
            ..FieldConfig::default().with_seed(3)
        }
    }

    fn lone_particle(position: Vec2, velocity: Vec2) -> Particle {
        Particle::new(position, velocity, 2.0, 0.0, Rgba::TRANSPARENT)
    }

    #[test]
    fn opacity_endpoints() {
        assert_eq!(connection_opacity(0.0, 150.0), 1.0);
        assert_eq!(connection_opacity(150.0, 150.0), 0.0);
        assert_eq!(connection_opacity(200.0, 150.0), 0.0);
        assert!((connection_opacity(50.0, 150.0) - 2.0 / 3.0).abs() < 1e-6);
        assert_eq!(connection_opacity(10.0, 0.0), 0.0);
    }

    #[test]
    fn opacity_decreases_with_distance() {
        let samples: Vec<f32> = (0..=150).map(|d| connection_opacity(d as f32, 150.0)).collect();
        assert!(samples.windows(2).all(|w| w[1] < w[0] || (w[0] == 0.0 && w[1] == 0.0)));
    }

    #[test]
    fn repulsion_is_positive_inside_and_zero_outside() {
        assert_eq!(repulsion_force(200.0, 200.0), 0.0);
        assert_eq!(repulsion_force(250.0, 200.0), 0.0);
        assert!(repulsion_force(199.9, 200.0) > 0.0);
        assert!(repulsion_force(10.0, 200.0) > repulsion_force(100.0, 200.0));
        assert_eq!(repulsion_force(0.0, 200.0), 1.0);
    }

    #[test]
    fn clamp_speed_preserves_direction() {
        let v = clamp_speed(Vec2::new(3.0, 4.0), 1.0);
        assert!((v.length() - 1.0).abs() < 1e-6);
        assert!((v.x / v.y - 0.75).abs() < 1e-6);
        assert_eq!(clamp_speed(Vec2::new(0.3, 0.4), 1.0), Vec2::new(0.3, 0.4));
    }

    #[test]
    fn bounce_reflects_inward_and_clamps() {
        let config = quiet_config();
        let mut rng = SmallRng::seed_from_u64(0);
        let mut p = lone_particle(Vec2::new(99.5, 50.0), Vec2::new(0.8, 0.0));
        p.advance(Viewport::new(100.0, 100.0), &config, &mut rng);
        assert_eq!(p.position.x, 100.0);
        assert!(p.velocity.x < 0.0);

        let mut p = lone_particle(Vec2::new(0.2, 50.0), Vec2::new(-0.5, 0.0));
        p.advance(Viewport::new(100.0, 100.0), &config, &mut rng);
        assert_eq!(p.position.x, 0.0);
        assert!(p.velocity.x > 0.0);
    }

    #[test]
    fn pulse_tracks_phase() {
        let config = quiet_config();
        let mut rng = SmallRng::seed_from_u64(0);
        let mut p = lone_particle(Vec2::splat(10.0), Vec2::ZERO);
        for _ in 0..100 {
            p.advance(Viewport::new(100.0, 100.0), &config, &mut rng);
            let expected = p.base_radius + p.phase.sin() * config.pulse_amplitude;
            assert!((p.radius - expected).abs() < 1e-5);
            assert!((p.radius - p.base_radius).abs() <= config.pulse_amplitude + 1e-6);
        }
        assert!((p.phase - 100.0 * config.pulse_step).abs() < 1e-3);
    }

    #[test]
    fn damping_decays_velocity() {
        let config = FieldConfig { jitter: 0.0, ..FieldConfig::default() };
        let mut rng = SmallRng::seed_from_u64(0);
        let mut p = lone_particle(Vec2::splat(50.0), Vec2::new(0.5, 0.0));
        p.advance(Viewport::new(100.0, 100.0), &config, &mut rng);
        assert!((p.velocity.x - 0.495).abs() < 1e-6);
    }

    #[test]
    fn jitter_keeps_resting_particle_moving() {
        let config = FieldConfig::default();
        let mut rng = SmallRng::seed_from_u64(11);
        let mut p = lone_particle(Vec2::splat(50.0), Vec2::ZERO);
        p.advance(Viewport::new(100.0, 100.0), &config, &mut rng);
        assert!(p.speed() > 0.0);
        assert!(p.velocity.x.abs() <= config.jitter / 2.0 && p.velocity.y.abs() <= config.jitter / 2.0);
    }

    #[test]
    fn repel_pushes_away_from_pointer() {
        let config = quiet_config();
        let bounds = Viewport::new(500.0, 500.0);
        let mut p = lone_particle(Vec2::new(100.0, 100.0), Vec2::ZERO);
        assert!(p.repel_from(Vec2::new(150.0, 100.0), bounds, &config));
        assert!(p.velocity.x < 0.0);
        assert!(p.velocity.y.abs() < 1e-6);
        // force = (200 - 50) / 200 = 0.75, scaled by 0.5
        assert!((p.velocity.x + 0.375).abs() < 1e-6);
    }

    #[test]
    fn repel_ignores_far_pointer() {
        let config = quiet_config();
        let mut p = lone_particle(Vec2::new(100.0, 100.0), Vec2::new(0.1, 0.0));
        assert!(!p.repel_from(Vec2::new(400.0, 100.0), Viewport::new(500.0, 500.0), &config));
        assert_eq!(p.velocity, Vec2::new(0.1, 0.0));
    }

    #[test]
    fn repel_respects_speed_cap() {
        let config = quiet_config();
        let mut p = lone_particle(Vec2::new(100.0, 100.0), Vec2::new(-1.0, 0.0));
        p.repel_from(Vec2::new(101.0, 100.0), Viewport::new(500.0, 500.0), &config);
        assert!(p.speed() <= config.max_speed + 1e-6);
    }

    #[test]
    fn zero_size_bounds_pin_particles() {
        let config = FieldConfig::default();
        let mut rng = SmallRng::seed_from_u64(5);
        let mut p = lone_particle(Vec2::ZERO, Vec2::new(0.7, -0.7));
        for _ in 0..50 {
            p.advance(Viewport::new(0.0, 0.0), &config, &mut rng);
            assert_eq!(p.position, Vec2::ZERO);
            assert_eq!(p.velocity, Vec2::ZERO);
        }
    }

    #[test]
    fn rebuild_spawns_within_config_ranges() {
        let config = FieldConfig::default().with_seed(42);
        let mut field = ParticleField::new(config.clone());
        field.rebuild(Viewport::new(640.0, 480.0));
        assert_eq!(field.entity_count(), config.particle_count);
        for p in field.particles() {
            assert!((0.0..=640.0).contains(&p.position.x));
            assert!((0.0..=480.0).contains(&p.position.y));
            assert!(config.size.contains(p.base_radius));
            assert!(p.velocity.x.abs() <= config.speed.max / 2.0);
            assert!(p.velocity.y.abs() <= config.speed.max / 2.0);
        }
    }

    #[test]
    fn seeded_fields_are_reproducible() {
        let mut a = ParticleField::new(FieldConfig::default().with_seed(8));
        let mut b = ParticleField::new(FieldConfig::default().with_seed(8));
        a.rebuild(Viewport::new(300.0, 300.0));
        b.rebuild(Viewport::new(300.0, 300.0));
        let pointer = PointerState::new(150.0);
        for _ in 0..10 {
            a.step(&pointer);
            b.step(&pointer);
        }
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn pointer_connections_need_pointer() {
        let mut field = ParticleField::new(FieldConfig::default().with_particle_count(1).with_seed(1));
        field.rebuild(Viewport::new(100.0, 100.0));
        field.particles_mut()[0].position = Vec2::new(50.0, 50.0);
        assert!(field.pointer_connections(&PointerState::new(150.0)).is_empty());
        let lines = field.pointer_connections(&PointerState::at(Vec2::new(50.0, 80.0), 150.0));
        assert_eq!(lines.len(), 1);
        assert!((lines[0].opacity - 0.8).abs() < 1e-6);
    }
}
