//! Particle field behavior through the public driver API.

use particle_field::prelude::*;
use particle_field::{DrawCommand, Signal};

const ID: &str = "backdrop";

fn still_config(count: usize) -> FieldConfig {
    FieldConfig {
        jitter: 0.0,
        ..FieldConfig::default().with_particle_count(count).with_seed(21)
    }
}

fn draw_list_driver(config: FieldConfig, width: f32, height: f32) -> (OffscreenHost<DrawList>, Driver<ParticleField>) {
    let mut host = OffscreenHost::with_draw_list(ID, width as u32, height as u32);
    let driver = Driver::new(&mut host, ID, Viewport::new(width, height), ParticleField::new(config));
    (host, driver)
}

/// Place particles at rest at the given points.
fn place(driver: &mut Driver<ParticleField>, points: &[Vec2]) {
    for (p, &at) in driver.simulation_mut().particles_mut().iter_mut().zip(points) {
        p.position = at;
        p.velocity = Vec2::ZERO;
    }
}

fn clear_recording(host: &mut OffscreenHost<DrawList>) {
    if let Some(list) = host.get_mut(&SurfaceId::from(ID)) {
        list.take();
    }
}

fn recorded(host: &OffscreenHost<DrawList>) -> &DrawList {
    host.get(&SurfaceId::from(ID)).expect("surface registered")
}

#[test]
fn two_close_particles_draw_one_faded_connection() {
    let config = still_config(2);
    let base_alpha = config.colors.connection.a;
    let (mut host, mut driver) = draw_list_driver(config, 400.0, 400.0);
    place(&mut driver, &[Vec2::new(100.0, 200.0), Vec2::new(150.0, 200.0)]);
    clear_recording(&mut host);

    assert!(host.run_pending_frame(&mut driver));

    let lines: Vec<_> = recorded(&host).lines().collect();
    assert_eq!(lines.len(), 1);
    let (from, to, width, color) = lines[0];
    assert_eq!(width, 1.0);
    assert!((from.distance(to) - 50.0).abs() < 1e-3);
    let expected = base_alpha * (1.0 - 50.0 / 150.0);
    assert!((color.a - expected).abs() < 1e-4, "alpha {} != {}", color.a, expected);
}

#[test]
fn distant_pointer_applies_no_force_and_draws_no_line() {
    let (mut host, mut driver) = draw_list_driver(still_config(2), 400.0, 400.0);
    place(&mut driver, &[Vec2::new(10.0, 10.0), Vec2::new(20.0, 10.0)]);
    host.deliver(&mut driver, Signal::PointerMoved(Vec2::new(390.0, 390.0)));
    clear_recording(&mut host);

    host.run_pending_frame(&mut driver);

    assert!(driver.simulation().particles().iter().all(|p| p.velocity == Vec2::ZERO));
    let pointer_lines = recorded(&host).lines().filter(|&(_, _, width, _)| width == 2.0).count();
    assert_eq!(pointer_lines, 0);
}

#[test]
fn nearby_pointer_repels_and_draws_line() {
    let (mut host, mut driver) = draw_list_driver(still_config(1), 400.0, 400.0);
    place(&mut driver, &[Vec2::new(200.0, 200.0)]);
    host.deliver(&mut driver, Signal::PointerMoved(Vec2::new(250.0, 200.0)));
    clear_recording(&mut host);

    host.run_pending_frame(&mut driver);

    let particle = driver.simulation().particles()[0];
    assert!(particle.velocity.x < 0.0, "pushed away from the pointer");
    let pointer_lines: Vec<_> = recorded(&host).lines().filter(|&(_, _, width, _)| width == 2.0).collect();
    assert_eq!(pointer_lines.len(), 1);
    assert_eq!(pointer_lines[0].1, Vec2::new(250.0, 200.0));
}

#[test]
fn pointer_leave_stops_interaction() {
    let (mut host, mut driver) = draw_list_driver(still_config(1), 400.0, 400.0);
    place(&mut driver, &[Vec2::new(200.0, 200.0)]);
    host.deliver(&mut driver, Signal::PointerMoved(Vec2::new(210.0, 200.0)));
    host.deliver(&mut driver, Signal::PointerLeft);
    assert!(!driver.pointer().is_present());

    host.run_pending_frame(&mut driver);
    assert_eq!(driver.simulation().particles()[0].velocity, Vec2::ZERO);
}

#[test]
fn bounds_and_speed_hold_every_frame() {
    let config = FieldConfig::default().with_particle_count(60).with_seed(99);
    let max_speed = config.max_speed;
    let (mut host, mut driver) = draw_list_driver(config, 320.0, 200.0);

    for frame in 0..600 {
        let t = frame as f32 * 0.05;
        let pointer = Vec2::new(160.0 + t.cos() * 150.0, 100.0 + t.sin() * 90.0);
        host.deliver(&mut driver, Signal::PointerMoved(pointer));
        assert!(host.run_pending_frame(&mut driver));
        clear_recording(&mut host);

        for p in driver.simulation().particles() {
            assert!((0.0..=320.0).contains(&p.position.x), "x out of bounds: {}", p.position.x);
            assert!((0.0..=200.0).contains(&p.position.y), "y out of bounds: {}", p.position.y);
            assert!(p.speed() <= max_speed + 1e-5, "speed {} above cap", p.speed());
        }
    }
}

#[test]
fn grid_search_draws_same_connections() {
    let mut field_a = ParticleField::new(FieldConfig::default().with_particle_count(150).with_seed(4));
    let mut field_b = ParticleField::new(
        FieldConfig::default()
            .with_particle_count(150)
            .with_seed(4)
            .with_neighbor_search(NeighborSearch::Grid),
    );
    field_a.rebuild(Viewport::new(900.0, 600.0));
    field_b.rebuild(Viewport::new(900.0, 600.0));

    let key = |c: &particle_field::Connection| {
        let (a, b) = if (c.from.x, c.from.y) <= (c.to.x, c.to.y) { (c.from, c.to) } else { (c.to, c.from) };
        (a.x.to_bits(), a.y.to_bits(), b.x.to_bits(), b.y.to_bits())
    };
    let mut a: Vec<_> = field_a.connections().iter().map(key).collect();
    let mut b: Vec<_> = field_b.connections().iter().map(key).collect();
    a.sort_unstable();
    b.sort_unstable();
    assert!(!a.is_empty());
    assert_eq!(a, b);
}

#[test]
fn frame_starts_with_trail_fade() {
    let (mut host, mut driver) = draw_list_driver(FieldConfig::default().with_particle_count(5).with_seed(2), 200.0, 100.0);
    clear_recording(&mut host);
    host.run_pending_frame(&mut driver);

    let trail = driver.simulation().config().colors.trail_fade;
    assert_eq!(
        recorded(&host).commands()[0],
        DrawCommand::FillRect {
            min: Vec2::ZERO,
            max: Vec2::new(200.0, 100.0),
            color: trail
        }
    );
    let circles = recorded(&host)
        .commands()
        .iter()
        .filter(|c| matches!(c, DrawCommand::FillCircle { .. }))
        .count();
    let glows = recorded(&host)
        .commands()
        .iter()
        .filter(|c| matches!(c, DrawCommand::RadialGradient { .. }))
        .count();
    assert_eq!((circles, glows), (5, 5));
}

#[test]
fn glow_is_three_times_radius_and_fades_out() {
    let (mut host, mut driver) = draw_list_driver(still_config(1), 100.0, 100.0);
    clear_recording(&mut host);
    host.run_pending_frame(&mut driver);

    let radius = driver.simulation().particles()[0].radius;
    let glow = recorded(&host).commands().iter().find_map(|c| match *c {
        DrawCommand::RadialGradient { radius, outer, .. } => Some((radius, outer)),
        _ => None,
    });
    let (glow_radius, outer) = glow.expect("glow drawn");
    assert!((glow_radius - radius * 3.0).abs() < 1e-5);
    assert_eq!(outer.a, 0.0);
}

#[test]
fn zero_viewport_keeps_particles_pinned() {
    let (mut host, mut driver) = draw_list_driver(FieldConfig::default().with_particle_count(10).with_seed(6), 0.0, 0.0);
    assert_eq!(driver.simulation().particles().len(), 10);
    for _ in 0..30 {
        host.run_pending_frame(&mut driver);
    }
    for p in driver.simulation().particles() {
        assert_eq!(p.position, Vec2::ZERO);
        assert!(p.position.x.is_finite() && p.velocity.is_finite());
    }
}

#[test]
fn canvas_shows_particles() {
    let mut host = OffscreenHost::with_canvas(ID, 64, 64);
    let config = still_config(1);
    let mut driver = Driver::new(&mut host, ID, Viewport::new(64.0, 64.0), ParticleField::new(config));
    place(&mut driver, &[Vec2::new(32.0, 32.0)]);
    host.run_pending_frame(&mut driver);

    let canvas = host.get(&SurfaceId::from(ID)).expect("canvas registered");
    let [r, _, b, a] = canvas.pixel(32, 32).expect("inside canvas");
    assert!(a > 0);
    assert!(b > r, "particle color is indigo");
    let [_, _, _, corner_alpha] = canvas.pixel(0, 0).expect("inside canvas");
    assert!(corner_alpha < a);
}
