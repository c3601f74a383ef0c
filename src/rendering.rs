//! Wireframe gizmo rendering.
//!
//! Everything the bench shows is drawn with line gizmos: relaxation dots as
//! small axis crosses over great-circle rings of the target sphere, debris
//! as bounding boxes, and the gravity cube as its edges.

use bevy::prelude::*;

use crate::debris::{Debris, DebrisShape, GravityField, GravityMode};
use crate::simulation::DotCloud;

/// Ring segment count for the sphere wireframe.  48 keeps the circles
/// visually smooth at the default camera distance.
const RING_SEGMENTS: usize = 48;

/// Half-length of a dot cross, relative to the sphere radius.
const DOT_CROSS_FRACTION: f32 = 0.03;

/// Draw the relaxation sphere and every dot in the cloud.
pub fn draw_dot_cloud_system(mut gizmos: Gizmos, cloud: Res<DotCloud>) {
    if cloud.dots.is_empty() {
        return;
    }

    let radius = cloud.settings.radius;
    draw_wire_sphere(&mut gizmos, radius, Color::srgb(0.25, 0.25, 0.35));

    let arm = radius * DOT_CROSS_FRACTION;
    for dot in &cloud.dots {
        let color = if dot.is_static {
            Color::srgb(1.0, 0.5, 0.2)
        } else {
            Color::srgb(0.8, 0.9, 1.0)
        };
        let p = dot.position;
        gizmos.line(p - Vec3::X * arm, p + Vec3::X * arm, color);
        gizmos.line(p - Vec3::Y * arm, p + Vec3::Y * arm, color);
        gizmos.line(p - Vec3::Z * arm, p + Vec3::Z * arm, color);
    }
}

/// Three great circles approximating a sphere outline.
fn draw_wire_sphere(gizmos: &mut Gizmos, radius: f32, color: Color) {
    for axis in 0..3 {
        let mut prev: Option<Vec3> = None;
        for i in 0..=RING_SEGMENTS {
            let angle = i as f32 / RING_SEGMENTS as f32 * std::f32::consts::TAU;
            let (s, c) = angle.sin_cos();
            let point = match axis {
                0 => Vec3::new(0.0, c * radius, s * radius),
                1 => Vec3::new(c * radius, 0.0, s * radius),
                _ => Vec3::new(c * radius, s * radius, 0.0),
            };
            if let Some(prev) = prev {
                gizmos.line(prev, point, color);
            }
            prev = Some(point);
        }
    }
}

/// Draw each debris body as its rotated bounding box.
pub fn draw_debris_system(
    mut gizmos: Gizmos,
    query: Query<(&Transform, &DebrisShape), With<Debris>>,
) {
    let color = Color::srgb(0.6, 0.6, 0.6);
    for (transform, shape) in query.iter() {
        let half = shape.shape.bounding_half_extent(shape.scale);
        draw_wire_box(&mut gizmos, transform, half, color);
    }
}

/// Draw the gravity cube's edges while the cube-face field is active.
pub fn draw_gravity_cube_system(mut gizmos: Gizmos, field: Res<GravityField>) {
    if field.mode != GravityMode::CubeFaces {
        return;
    }
    let transform = Transform::IDENTITY;
    draw_wire_box(
        &mut gizmos,
        &transform,
        Vec3::splat(field.cube_half_extent),
        Color::srgb(0.2, 0.7, 0.3),
    );
}

/// Twelve edges of an oriented box.
fn draw_wire_box(gizmos: &mut Gizmos, transform: &Transform, half: Vec3, color: Color) {
    let corner = |x: f32, y: f32, z: f32| {
        transform.translation + transform.rotation * (Vec3::new(x, y, z) * half)
    };

    let corners = [
        corner(-1.0, -1.0, -1.0),
        corner(1.0, -1.0, -1.0),
        corner(1.0, 1.0, -1.0),
        corner(-1.0, 1.0, -1.0),
        corner(-1.0, -1.0, 1.0),
        corner(1.0, -1.0, 1.0),
        corner(1.0, 1.0, 1.0),
        corner(-1.0, 1.0, 1.0),
    ];

    const EDGES: [(usize, usize); 12] = [
        (0, 1),
        (1, 2),
        (2, 3),
        (3, 0),
        (4, 5),
        (5, 6),
        (6, 7),
        (7, 4),
        (0, 4),
        (1, 5),
        (2, 6),
        (3, 7),
    ];

    for (a, b) in EDGES {
        gizmos.line(corners[a], corners[b], color);
    }
}
