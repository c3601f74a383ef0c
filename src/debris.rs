//! Debris bodies and gravity-field systems.
//!
//! The collision sandbox spawns rigid bodies with a rotating palette of
//! collider shapes inside the spawn volume; the gravity demos pull those
//! bodies with a configurable field (linear point gravity, or toward the
//! nearest face of a surrounding cube).  Rapier handles contacts; the
//! fields only write `ExternalForce`.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use rand::Rng;

use crate::config::LabConfig;

/// Marker component for any debris entity.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Debris;

/// Collider shape palette used by the spawner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionShape {
    Sphere,
    Box,
    Capsule,
    Cylinder,
    Cone,
}

impl CollisionShape {
    pub const ALL: [CollisionShape; 5] = [
        CollisionShape::Sphere,
        CollisionShape::Box,
        CollisionShape::Capsule,
        CollisionShape::Cylinder,
        CollisionShape::Cone,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CollisionShape::Sphere => "sphere",
            CollisionShape::Box => "box",
            CollisionShape::Capsule => "capsule",
            CollisionShape::Cylinder => "cylinder",
            CollisionShape::Cone => "cone",
        }
    }

    /// Rapier collider for this shape at `scale`.
    pub fn collider(self, scale: f32) -> Collider {
        match self {
            CollisionShape::Sphere => Collider::ball(scale),
            CollisionShape::Box => Collider::cuboid(scale, scale, scale),
            CollisionShape::Capsule => Collider::capsule_y(scale * 0.5, scale * 0.5),
            CollisionShape::Cylinder => Collider::cylinder(scale * 0.75, scale * 0.5),
            CollisionShape::Cone => Collider::cone(scale * 0.75, scale * 0.6),
        }
    }

    /// Conservative half-extent of the shape's bounding box, for wireframe
    /// rendering.
    pub fn bounding_half_extent(self, scale: f32) -> Vec3 {
        match self {
            CollisionShape::Sphere => Vec3::splat(scale),
            CollisionShape::Box => Vec3::splat(scale),
            CollisionShape::Capsule => Vec3::new(scale * 0.5, scale, scale * 0.5),
            CollisionShape::Cylinder => Vec3::new(scale * 0.5, scale * 0.75, scale * 0.5),
            CollisionShape::Cone => Vec3::new(scale * 0.6, scale * 0.75, scale * 0.6),
        }
    }
}

/// Shape and scale of a debris body, kept for rendering and diagnostics.
#[derive(Component, Debug, Clone, Copy)]
pub struct DebrisShape {
    pub shape: CollisionShape,
    pub scale: f32,
}

// ── Gravity fields ────────────────────────────────────────────────────────────

/// Which field, if any, drives `gravity_field_system`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GravityMode {
    /// No field; bodies drift ballistically.
    #[default]
    Off,
    /// Constant-magnitude pull toward the origin.
    Point,
    /// Pull toward the nearest face of the axis-aligned gravity cube —
    /// bodies settle against the walls.
    CubeFaces,
}

/// Active gravity field for the sandbox.
#[derive(Resource, Debug, Clone, Copy)]
pub struct GravityField {
    pub mode: GravityMode,
    pub strength: f32,
    pub cube_half_extent: f32,
}

impl Default for GravityField {
    fn default() -> Self {
        Self {
            mode: GravityMode::Off,
            strength: crate::constants::GRAVITY_STRENGTH,
            cube_half_extent: crate::constants::GRAVITY_CUBE_HALF_EXTENT,
        }
    }
}

/// Unit direction from `position` toward the nearest face of the
/// surrounding axis-aligned cube.
///
/// The nearest face lies along the axis with the largest coordinate
/// magnitude; the pull is outward along that axis.  The exact centre has no
/// nearest face and yields zero.
pub fn nearest_face_direction(position: Vec3) -> Vec3 {
    let abs = position.abs();
    if abs.max_element() == 0.0 {
        return Vec3::ZERO;
    }
    if abs.x >= abs.y && abs.x >= abs.z {
        Vec3::new(position.x.signum(), 0.0, 0.0)
    } else if abs.y >= abs.z {
        Vec3::new(0.0, position.y.signum(), 0.0)
    } else {
        Vec3::new(0.0, 0.0, position.z.signum())
    }
}

/// Write the active field into every debris body's `ExternalForce`.
///
/// The force is assigned, not accumulated, so switching modes never leaves
/// stale forces behind.
pub fn gravity_field_system(
    field: Res<GravityField>,
    mut query: Query<(&Transform, &mut ExternalForce), With<Debris>>,
) {
    for (transform, mut force) in query.iter_mut() {
        let pos = transform.translation;
        force.force = match field.mode {
            GravityMode::Off => Vec3::ZERO,
            GravityMode::Point => -pos.normalize_or_zero() * field.strength,
            GravityMode::CubeFaces => {
                nearest_face_direction(pos) * field.strength
            }
        };
    }
}

/// Cull debris far outside the play volume.
pub fn culling_system(
    mut commands: Commands,
    config: Res<LabConfig>,
    query: Query<(Entity, &Transform), With<Debris>>,
) {
    for (entity, transform) in query.iter() {
        if transform.translation.length() > config.hard_cull_distance {
            commands.entity(entity).despawn();
        }
    }
}

// ── Spawning ──────────────────────────────────────────────────────────────────

/// Spawn a single debris body with the given shape and scale.
pub fn spawn_debris_with_shape(
    commands: &mut Commands,
    position: Vec3,
    shape: CollisionShape,
    scale: f32,
    config: &LabConfig,
) -> Entity {
    commands
        .spawn((
            (
                Transform::from_translation(position),
                GlobalTransform::default(),
                Debris,
                DebrisShape { shape, scale },
                RigidBody::Dynamic,
            ),
            (
                shape.collider(scale),
                Restitution::coefficient(config.restitution_debris),
                Friction::coefficient(config.friction_debris),
                Velocity::zero(),
                Damping {
                    linear_damping: 0.0,
                    angular_damping: 0.0,
                },
                ExternalForce {
                    force: Vec3::ZERO,
                    torque: Vec3::ZERO,
                },
                CollisionGroups::new(Group::GROUP_1, Group::GROUP_1),
                ActiveEvents::COLLISION_EVENTS,
                Sleeping::disabled(),
            ),
        ))
        .id()
}

/// Spawn the six fixed walls of the gravity cube so settling debris has
/// something to rest against.
pub fn spawn_cube_walls(commands: &mut Commands, half_extent: f32) {
    const WALL_THICKNESS: f32 = 1.0;
    let offsets = [
        (Vec3::X, Vec3::new(WALL_THICKNESS, half_extent, half_extent)),
        (Vec3::Y, Vec3::new(half_extent, WALL_THICKNESS, half_extent)),
        (Vec3::Z, Vec3::new(half_extent, half_extent, WALL_THICKNESS)),
    ];
    for (axis, half) in offsets {
        for sign in [-1.0, 1.0] {
            commands.spawn((
                Transform::from_translation(axis * (half_extent + WALL_THICKNESS) * sign),
                GlobalTransform::default(),
                RigidBody::Fixed,
                Collider::cuboid(half.x, half.y, half.z),
                CollisionGroups::new(Group::GROUP_1, Group::GROUP_1),
            ));
        }
    }
}

/// Spawn `count` debris bodies through a 4×3×4 cell grid for an even spread,
/// cycling through the shape palette, with random scale and gentle random
/// velocity.  Cells whose sample lands inside the keep-clear radius are
/// skipped.
pub fn spawn_debris_field(commands: &mut Commands, count: usize, config: &LabConfig) {
    let mut rng = rand::thread_rng();

    let half = config.spawn_half_extent;
    let keep_clear = config.spawn_keep_clear_radius;

    let (cols, rows, layers) = (4usize, 3usize, 4usize);
    let cell = Vec3::new(
        2.0 * half / cols as f32,
        2.0 * half / rows as f32,
        2.0 * half / layers as f32,
    );
    let per_cell = (count as f32 / (cols * rows * layers) as f32).ceil() as usize;

    let mut spawned = 0;
    let mut shape_index = 0;

    'outer: for layer in 0..layers {
        for row in 0..rows {
            for col in 0..cols {
                let min = Vec3::new(
                    -half + col as f32 * cell.x,
                    -half + row as f32 * cell.y,
                    -half + layer as f32 * cell.z,
                );
                for _ in 0..per_cell {
                    if spawned >= count {
                        break 'outer;
                    }

                    let position = Vec3::new(
                        rng.gen_range(min.x..min.x + cell.x),
                        rng.gen_range(min.y..min.y + cell.y),
                        rng.gen_range(min.z..min.z + cell.z),
                    );
                    if position.length() < keep_clear {
                        continue;
                    }

                    let shape = CollisionShape::ALL[shape_index % CollisionShape::ALL.len()];
                    shape_index += 1;
                    let scale = rng.gen_range(config.debris_scale_min..config.debris_scale_max);

                    let entity =
                        spawn_debris_with_shape(commands, position, shape, scale, config);

                    let vel_range = config.debris_initial_velocity_range;
                    let ang_range = config.debris_initial_angvel_range;
                    commands.entity(entity).insert(Velocity {
                        linvel: Vec3::new(
                            rng.gen_range(-vel_range..vel_range),
                            rng.gen_range(-vel_range..vel_range),
                            rng.gen_range(-vel_range..vel_range),
                        ),
                        angvel: Vec3::new(
                            rng.gen_range(-ang_range..ang_range),
                            rng.gen_range(-ang_range..ang_range),
                            rng.gen_range(-ang_range..ang_range),
                        ),
                    });

                    spawned += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_palette_covers_all_variants() {
        assert_eq!(CollisionShape::ALL.len(), 5);
        for shape in CollisionShape::ALL {
            assert!(!shape.label().is_empty());
        }
    }

    #[test]
    fn bounding_half_extent_scales() {
        let small = CollisionShape::Box.bounding_half_extent(1.0);
        let large = CollisionShape::Box.bounding_half_extent(2.0);
        assert_eq!(large, small * 2.0);
    }

    // ── nearest_face_direction ────────────────────────────────────────────────

    #[test]
    fn nearest_face_is_along_dominant_axis() {
        let dir = nearest_face_direction(Vec3::new(5.0, 1.0, -2.0));
        assert_eq!(dir, Vec3::X);
        let dir = nearest_face_direction(Vec3::new(1.0, -7.0, 2.0));
        assert_eq!(dir, Vec3::NEG_Y);
        let dir = nearest_face_direction(Vec3::new(1.0, 2.0, -9.0));
        assert_eq!(dir, Vec3::NEG_Z);
    }

    #[test]
    fn cube_centre_has_no_pull() {
        assert_eq!(nearest_face_direction(Vec3::ZERO), Vec3::ZERO);
    }

    #[test]
    fn face_direction_is_unit_length() {
        for pos in [
            Vec3::new(3.0, 2.0, 1.0),
            Vec3::new(-0.1, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 1.0),
        ] {
            let dir = nearest_face_direction(pos);
            assert!((dir.length() - 1.0).abs() < 1e-6, "{pos:?} → {dir:?}");
        }
    }
}
