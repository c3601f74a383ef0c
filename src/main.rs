use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_rapier3d::prelude::*;
use std::env;

use regolith::config::{load_lab_config, LabConfig};
use regolith::debris::spawn_debris_field;
use regolith::graphics;
use regolith::relaxation::random_sphere_cloud;
use regolith::simulation::{DotCloud, SandboxPlugin};
use regolith::testing::{
    spawn_test_editor_roundtrip, spawn_test_flag_texture, spawn_test_gravity_cube,
    spawn_test_hopfield_recall, spawn_test_overlay_grid, spawn_test_perf_relaxation,
    spawn_test_relax_interior, spawn_test_relax_sphere, spawn_test_relax_static,
    spawn_test_sampling_power, spawn_test_shape_field, test_logging_system,
    test_verification_system, TestConfig,
};

/// Free-run world: a relaxing dot cloud over a small debris field.
fn spawn_initial_world(
    mut commands: Commands,
    mut cloud: ResMut<DotCloud>,
    config: Res<LabConfig>,
) {
    let mut rng = rand::thread_rng();
    let dots = random_sphere_cloud(&mut rng, 80, config.relax_radius);
    cloud.reset(dots, config.relax_radius);

    spawn_debris_field(&mut commands, 20, &config);
}

/// Configure Rapier physics: disable gravity — the bench's own field
/// systems drive all forces.
fn setup_physics_config(mut config: Query<&mut RapierConfiguration>) {
    for mut cfg in config.iter_mut() {
        cfg.gravity = Vec3::ZERO;
    }
}

fn main() {
    // Check for test mode
    let test_mode = env::var("REGOLITH_TEST").ok();

    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Regolith Bench".into(),
            resolution: WindowResolution::new(1200, 680),
            ..Default::default()
        }),
        ..Default::default()
    }))
    .insert_resource(ClearColor(Color::BLACK))
    // Insert LabConfig with compiled defaults; load_lab_config will
    // overwrite it from assets/regolith.toml (if present) in the Startup
    // schedule.
    .insert_resource(LabConfig::default())
    .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
    .add_plugins(SandboxPlugin)
    .add_systems(
        Startup,
        (
            // Load config first so every other startup system sees the final values.
            load_lab_config,
            graphics::setup_camera.after(load_lab_config),
            setup_physics_config,
        ),
    );

    // Add testing systems if in test mode
    if let Some(test_name) = test_mode {
        let test_config = TestConfig {
            enabled: true,
            ..Default::default()
        };

        app.insert_resource(test_config);

        // Add startup system based on test name
        match test_name.as_str() {
            "relax_sphere" => {
                app.add_systems(Startup, spawn_test_relax_sphere.after(load_lab_config))
            }
            "relax_static" => {
                app.add_systems(Startup, spawn_test_relax_static.after(load_lab_config))
            }
            "relax_interior" => {
                app.add_systems(Startup, spawn_test_relax_interior.after(load_lab_config))
            }
            "perf_relaxation" => {
                app.add_systems(Startup, spawn_test_perf_relaxation.after(load_lab_config))
            }
            "shape_field" => {
                app.add_systems(Startup, spawn_test_shape_field.after(load_lab_config))
            }
            "gravity_cube" => {
                app.add_systems(Startup, spawn_test_gravity_cube.after(load_lab_config))
            }
            "hopfield_recall" => {
                app.add_systems(Startup, spawn_test_hopfield_recall.after(load_lab_config))
            }
            "sampling_power" => {
                app.add_systems(Startup, spawn_test_sampling_power.after(load_lab_config))
            }
            "flag_texture" => {
                app.add_systems(Startup, spawn_test_flag_texture.after(load_lab_config))
            }
            "editor_roundtrip" => {
                app.add_systems(Startup, spawn_test_editor_roundtrip.after(load_lab_config))
            }
            "overlay_grid" => {
                app.add_systems(Startup, spawn_test_overlay_grid.after(load_lab_config))
            }
            _ => app.add_systems(Startup, spawn_test_relax_sphere.after(load_lab_config)),
        };

        // Logging must increment the frame counter before verification reads
        // it, so the pair is chained.
        app.add_systems(
            PostUpdate,
            (test_logging_system, test_verification_system).chain(),
        );

        println!("Running test: {}", test_name);
    } else {
        app.insert_resource(TestConfig::default()).add_systems(
            Startup,
            spawn_initial_world
                .after(load_lab_config)
                .after(graphics::setup_camera),
        );
    }

    app.run();
}
