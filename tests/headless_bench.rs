//! Headless tests for the frame-loop layer.
//!
//! These use [`MinimalPlugins`] — no window, no rendering, no physics — so
//! they run fast and deterministically in CI.  Only the relaxation stepping
//! system is registered; it is the piece of the frame loop with observable
//! numeric behaviour.

use bevy::prelude::*;

use regolith::config::LabConfig;
use regolith::relaxation::Dot;
use regolith::simulation::{relaxation_step_system, DotCloud};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Build a minimal headless app with the relaxation system and its
/// resources registered.
fn bench_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(LabConfig::default());
    app.init_resource::<DotCloud>();
    app.add_systems(Update, relaxation_step_system);
    app
}

/// A deterministic tilted-ring cloud; no RNG so every run is identical.
fn ring_cloud(count: usize, radius: f32) -> Vec<Dot> {
    (0..count)
        .map(|i| {
            let a = i as f32 / count as f32 * std::f32::consts::TAU;
            Dot::movable(Vec3::new(
                a.cos() * radius,
                a.sin() * radius,
                (i % 5) as f32 - 2.0,
            ))
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

/// An empty cloud is a no-op frame after frame.
#[test]
fn empty_cloud_steps_without_effect() {
    let mut app = bench_app();
    for _ in 0..5 {
        app.update();
    }
    let cloud = app.world().resource::<DotCloud>();
    assert!(cloud.dots.is_empty());
    assert_eq!(cloud.last_movement, 0.0);
}

/// Stepping frames drives the cloud and records the movement telemetry.
#[test]
fn frames_advance_the_relaxation() {
    let mut app = bench_app();
    app.world_mut()
        .resource_mut::<DotCloud>()
        .reset(ring_cloud(24, 8.0), 10.0);

    app.update();

    let cloud = app.world().resource::<DotCloud>();
    assert!(
        cloud.last_movement > 0.0,
        "first frame must move an uneven cloud"
    );
}

/// The sphere-surface invariant holds at every frame boundary.
#[test]
fn cloud_stays_on_sphere_across_frames() {
    let mut app = bench_app();
    app.world_mut()
        .resource_mut::<DotCloud>()
        .reset(ring_cloud(30, 6.0), 10.0);

    for _ in 0..60 {
        app.update();
        let cloud = app.world().resource::<DotCloud>();
        for dot in &cloud.dots {
            assert!(
                (dot.position.length() - 10.0).abs() < 1e-2,
                "dot off sphere mid-run: |p| = {}",
                dot.position.length()
            );
        }
    }
}

/// A paused cloud is frozen exactly where it was.
#[test]
fn paused_cloud_does_not_move() {
    let mut app = bench_app();
    app.world_mut()
        .resource_mut::<DotCloud>()
        .reset(ring_cloud(12, 8.0), 10.0);
    app.update(); // settle one frame so positions are mid-relaxation

    let before: Vec<Vec3> = {
        let mut cloud = app.world_mut().resource_mut::<DotCloud>();
        cloud.paused = true;
        cloud.dots.iter().map(|d| d.position).collect()
    };

    for _ in 0..10 {
        app.update();
    }

    let cloud = app.world().resource::<DotCloud>();
    let after: Vec<Vec3> = cloud.dots.iter().map(|d| d.position).collect();
    assert_eq!(before, after, "paused cloud must not move");
}

/// Clearing mid-run empties the cloud and later frames stay inert.
#[test]
fn clear_mid_run_is_stable() {
    let mut app = bench_app();
    app.world_mut()
        .resource_mut::<DotCloud>()
        .reset(ring_cloud(12, 8.0), 10.0);
    for _ in 0..3 {
        app.update();
    }

    app.world_mut().resource_mut::<DotCloud>().clear();
    for _ in 0..3 {
        app.update();
    }

    let cloud = app.world().resource::<DotCloud>();
    assert!(cloud.dots.is_empty());
    assert_eq!(cloud.last_movement, 0.0);
}

/// The settling telemetry trends downward as the cloud evens out.
#[test]
fn movement_telemetry_settles() {
    let mut app = bench_app();
    app.world_mut()
        .resource_mut::<DotCloud>()
        .reset(ring_cloud(20, 7.0), 10.0);

    app.update();
    let early = app.world().resource::<DotCloud>().last_movement;

    for _ in 0..400 {
        app.update();
    }
    let late = app.world().resource::<DotCloud>().last_movement;

    assert!(
        late < early,
        "movement should shrink as the cloud settles ({early} → {late})"
    );
}
