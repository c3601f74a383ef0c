use bevy::prelude::*;

use crate::config::LabConfig;

/// Setup camera for 3D rendering.
///
/// The camera is parked on a diagonal above the origin so both the
/// relaxation sphere and the debris volume are in frame.
pub fn setup_camera(mut commands: Commands, config: Res<LabConfig>) {
    let distance = config.camera_distance;
    let position = Vec3::new(distance * 0.7, distance * 0.5, distance);
    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(position).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    eprintln!("[SETUP] Camera spawned");
}
