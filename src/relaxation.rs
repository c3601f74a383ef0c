//! Even-distribution point relaxation on a sphere.
//!
//! A cloud of [`Dot`]s is pulled toward the origin and mutually repelled
//! within a search distance; iterating the two forces relaxes the cloud into
//! an even distribution over the sphere surface (or through the interior
//! when snapping is disabled).
//!
//! The force model is deliberately simple:
//! - inward: `−unit(position) · |position|` — a linear spring toward the
//!   origin;
//! - repulsion: linear in `(repulse_distance − separation)`, applied along
//!   the separating axis, equal and opposite on both dots of a pair.
//!
//! Forces are recomputed in full every pass; there is no persisted velocity
//! or momentum.

use bevy::math::Vec3;
use rand::Rng;

use crate::constants::{REPULSE_FIT_A, REPULSE_FIT_B, REPULSE_FIT_C, REPULSE_FIT_D};

/// A point in the relaxation cloud.
///
/// Static dots exert repulsion on their neighbours but are never moved by
/// the relaxation — they pin regions of the sphere in place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dot {
    pub position: Vec3,
    pub is_static: bool,
}

impl Dot {
    /// A movable dot at `position`.
    pub fn movable(position: Vec3) -> Self {
        Self {
            position,
            is_static: false,
        }
    }

    /// A pinned dot at `position`; relaxation never moves it.
    pub fn pinned(position: Vec3) -> Self {
        Self {
            position,
            is_static: true,
        }
    }
}

/// Parameters for one relaxation run.
#[derive(Debug, Clone, Copy)]
pub struct RelaxSettings {
    /// Target sphere radius.
    pub radius: f32,
    /// Fraction of the accumulated force applied to each movable dot per pass.
    pub step_percent: f32,
    /// Maximum separation at which two dots repel each other.
    pub repulse_distance: f32,
    /// When true, dots are free to occupy the sphere interior: no
    /// snap-to-sphere is applied before or after the move.
    pub interior_points: bool,
}

impl RelaxSettings {
    /// Settings for `count` dots on a sphere of `radius`, with the search
    /// distance derived from the curve fit.
    pub fn for_cloud(count: usize, radius: f32) -> Self {
        Self {
            radius,
            step_percent: crate::constants::RELAX_STEP_PERCENT,
            repulse_distance: calc_repulse_distance(count, radius),
            interior_points: false,
        }
    }
}

/// Neighbor search distance for `count` dots on a sphere of `radius`.
///
/// Evaluates the empirically fitted log-polynomial
/// `radius · (A + B·x + C·x² + D·x³)` with `x = ln(count)`.  Zero or one dot
/// has no neighbour to repel, so the distance is exactly zero; the fit tail
/// is clamped non-negative for very large counts.
pub fn calc_repulse_distance(count: usize, radius: f32) -> f32 {
    if count <= 1 {
        return 0.0;
    }
    let x = (count as f32).ln();
    let poly = REPULSE_FIT_A + REPULSE_FIT_B * x + REPULSE_FIT_C * x * x + REPULSE_FIT_D * x * x * x;
    (radius * poly).max(0.0)
}

/// Pairwise repulsion forces, accumulated symmetrically over every pair of
/// dots closer than `repulse_distance`.
///
/// Both static and movable dots participate: a pinned dot still occupies
/// surface area and pushes its neighbours away.  A contribution that
/// evaluates to NaN or ±Inf (coincident dots have no separating axis) is
/// discarded, leaving the pair unaffected.
pub fn repulsion_forces(dots: &[Dot], repulse_distance: f32) -> Vec<Vec3> {
    let mut forces = vec![Vec3::ZERO; dots.len()];
    if repulse_distance <= 0.0 {
        return forces;
    }

    for i in 0..dots.len() {
        for j in (i + 1)..dots.len() {
            let delta = dots[i].position - dots[j].position;
            let separation = delta.length();
            if separation >= repulse_distance {
                continue;
            }

            // Linear falloff: strongest at contact, zero at the search edge.
            let magnitude = repulse_distance - separation;
            let force = (delta / separation) * magnitude;
            if !force.is_finite() {
                continue;
            }

            forces[i] += force;
            forces[j] -= force;
        }
    }

    forces
}

/// Full force accumulation for one pass: repulsion for every dot, plus the
/// inward pull for movable dots.
///
/// The inward term is `−unit(position) · |position|`, which reduces to
/// `−position`: a linear spring toward the origin.  Static dots keep their
/// repulsion total (it is never applied) so force-balance diagnostics can
/// still sum over the whole cloud.
pub fn compute_forces(dots: &[Dot], repulse_distance: f32) -> Vec<Vec3> {
    let mut forces = repulsion_forces(dots, repulse_distance);
    for (dot, force) in dots.iter().zip(forces.iter_mut()) {
        if !dot.is_static {
            *force += -dot.position;
        }
    }
    forces
}

/// Re-project every movable dot onto the sphere surface.
///
/// A dot exactly at the origin has no direction to project along and is
/// left where it is.
pub fn snap_to_sphere(dots: &mut [Dot], radius: f32) {
    for dot in dots.iter_mut() {
        if dot.is_static {
            continue;
        }
        let unit = dot.position.normalize_or_zero();
        if unit != Vec3::ZERO {
            dot.position = unit * radius;
        }
    }
}

/// One relaxation pass.
///
/// With `interior_points` off the cloud is snapped to the sphere before the
/// forces are computed and again after the move, so the pass walks dots
/// across the surface rather than through space.  Returns the largest
/// single-dot displacement over the whole pass (move plus re-snap): purely
/// radial force is cancelled by the snap, so the value genuinely tends to
/// zero as the cloud settles.
pub fn relax_pass(dots: &mut [Dot], settings: &RelaxSettings) -> f32 {
    if !settings.interior_points {
        snap_to_sphere(dots, settings.radius);
    }

    let before: Vec<Vec3> = dots.iter().map(|d| d.position).collect();
    let forces = compute_forces(dots, settings.repulse_distance);

    for (dot, force) in dots.iter_mut().zip(forces.iter()) {
        if dot.is_static {
            continue;
        }
        let step = *force * settings.step_percent;
        if !step.is_finite() {
            continue;
        }
        dot.position += step;
    }

    if !settings.interior_points {
        snap_to_sphere(dots, settings.radius);
    }

    dots.iter()
        .zip(before.iter())
        .map(|(dot, start)| dot.position.distance(*start))
        .fold(0.0_f32, f32::max)
}

/// Run `passes` relaxation passes.  Returns the largest movement of the
/// final pass.
pub fn relax(dots: &mut [Dot], settings: &RelaxSettings, passes: u32) -> f32 {
    let mut last = 0.0;
    for _ in 0..passes {
        last = relax_pass(dots, settings);
    }
    last
}

/// `count` movable dots uniformly distributed over the sphere surface —
/// the usual "add dots" starting state.
pub fn random_sphere_cloud<R: Rng>(rng: &mut R, count: usize, radius: f32) -> Vec<Dot> {
    (0..count)
        .map(|_| {
            // Uniform on the sphere: z uniform in [-1, 1), azimuth uniform.
            let z: f32 = rng.gen_range(-1.0..1.0);
            let phi: f32 = rng.gen_range(0.0..std::f32::consts::TAU);
            let r = (1.0 - z * z).max(0.0).sqrt();
            Dot::movable(Vec3::new(r * phi.cos(), r * phi.sin(), z) * radius)
        })
        .collect()
}

/// Mean and standard deviation of the per-dot nearest-neighbour spacing.
///
/// Diagnostic used by the demo scenarios to report how even the
/// distribution has become; an even cloud has low spread between the
/// per-dot nearest distances.
pub fn nearest_neighbor_stats(dots: &[Dot]) -> Option<(f32, f32)> {
    if dots.len() < 2 {
        return None;
    }

    let mut nearest = Vec::with_capacity(dots.len());
    for (i, dot) in dots.iter().enumerate() {
        let mut best = f32::INFINITY;
        for (j, other) in dots.iter().enumerate() {
            if i != j {
                best = best.min(dot.position.distance(other.position));
            }
        }
        nearest.push(best);
    }

    let mean = nearest.iter().sum::<f32>() / nearest.len() as f32;
    let variance =
        nearest.iter().map(|d| (d - mean) * (d - mean)).sum::<f32>() / nearest.len() as f32;
    Some((mean, variance.sqrt()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(count: usize, radius: f32) -> Vec<Dot> {
        // Deterministic non-degenerate starting cloud: a tilted ring.
        (0..count)
            .map(|i| {
                let a = i as f32 / count as f32 * std::f32::consts::TAU;
                Dot::movable(Vec3::new(a.cos() * radius, a.sin() * radius, (i % 3) as f32 - 1.0))
            })
            .collect()
    }

    // ── calc_repulse_distance ─────────────────────────────────────────────────

    #[test]
    fn repulse_distance_zero_for_zero_or_one_dot() {
        assert_eq!(calc_repulse_distance(0, 10.0), 0.0);
        assert_eq!(calc_repulse_distance(1, 10.0), 0.0);
        assert_eq!(calc_repulse_distance(1, 12345.6), 0.0);
    }

    #[test]
    fn repulse_distance_scales_linearly_with_radius() {
        let d1 = calc_repulse_distance(50, 1.0);
        let d10 = calc_repulse_distance(50, 10.0);
        assert!((d10 - d1 * 10.0).abs() < 1e-4);
    }

    #[test]
    fn repulse_distance_shrinks_as_count_grows() {
        let d10 = calc_repulse_distance(10, 10.0);
        let d100 = calc_repulse_distance(100, 10.0);
        let d1000 = calc_repulse_distance(1000, 10.0);
        assert!(d10 > d100, "{d10} should exceed {d100}");
        assert!(d100 > d1000, "{d100} should exceed {d1000}");
    }

    #[test]
    fn repulse_distance_never_negative() {
        for count in [2usize, 10, 100, 10_000, 1_000_000] {
            assert!(calc_repulse_distance(count, 10.0) >= 0.0, "count {count}");
        }
    }

    // ── repulsion_forces ──────────────────────────────────────────────────────

    #[test]
    fn repulsion_is_equal_and_opposite_for_a_pair() {
        let dots = vec![
            Dot::movable(Vec3::new(-1.0, 0.0, 0.0)),
            Dot::movable(Vec3::new(1.0, 0.0, 0.0)),
        ];
        let forces = repulsion_forces(&dots, 5.0);
        assert!((forces[0] + forces[1]).length() < 1e-6);
        assert!(forces[0].x < 0.0, "left dot pushed further left");
        assert!(forces[1].x > 0.0, "right dot pushed further right");
    }

    #[test]
    fn repulsion_total_sums_to_zero_for_many_dots() {
        let dots = ring(17, 3.0);
        let total: Vec3 = repulsion_forces(&dots, 8.0).into_iter().sum();
        assert!(
            total.length() < 1e-3,
            "Newton's third law violated: residual {total:?}"
        );
    }

    #[test]
    fn repulsion_ignores_pairs_beyond_search_distance() {
        let dots = vec![
            Dot::movable(Vec3::new(-10.0, 0.0, 0.0)),
            Dot::movable(Vec3::new(10.0, 0.0, 0.0)),
        ];
        let forces = repulsion_forces(&dots, 5.0);
        assert_eq!(forces[0], Vec3::ZERO);
        assert_eq!(forces[1], Vec3::ZERO);
    }

    #[test]
    fn coincident_dots_discard_repulsion_instead_of_nan() {
        let dots = vec![Dot::movable(Vec3::ONE), Dot::movable(Vec3::ONE)];
        let forces = repulsion_forces(&dots, 5.0);
        assert!(forces[0].is_finite() && forces[1].is_finite());
        assert_eq!(forces[0], Vec3::ZERO, "degenerate pair must be left unaffected");
    }

    // ── compute_forces ────────────────────────────────────────────────────────

    #[test]
    fn inward_force_is_linear_pull_toward_origin() {
        let dots = vec![Dot::movable(Vec3::new(0.0, 4.0, 0.0))];
        let forces = compute_forces(&dots, 0.0);
        assert!((forces[0] - Vec3::new(0.0, -4.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn static_dots_receive_no_inward_force() {
        let dots = vec![Dot::pinned(Vec3::new(0.0, 4.0, 0.0))];
        let forces = compute_forces(&dots, 0.0);
        assert_eq!(forces[0], Vec3::ZERO);
    }

    // ── snap / relax ──────────────────────────────────────────────────────────

    #[test]
    fn snap_projects_movable_dots_onto_sphere() {
        let mut dots = vec![
            Dot::movable(Vec3::new(3.0, 4.0, 0.0)),
            Dot::movable(Vec3::new(0.1, 0.0, 0.0)),
        ];
        snap_to_sphere(&mut dots, 10.0);
        for dot in &dots {
            assert!((dot.position.length() - 10.0).abs() < 1e-4);
        }
    }

    #[test]
    fn snap_leaves_origin_dot_in_place() {
        let mut dots = vec![Dot::movable(Vec3::ZERO)];
        snap_to_sphere(&mut dots, 10.0);
        assert_eq!(dots[0].position, Vec3::ZERO);
    }

    #[test]
    fn snap_leaves_static_dots_alone() {
        let inside = Vec3::new(1.0, 1.0, 1.0);
        let mut dots = vec![Dot::pinned(inside)];
        snap_to_sphere(&mut dots, 10.0);
        assert_eq!(dots[0].position, inside);
    }

    #[test]
    fn surface_pass_keeps_movable_dots_on_the_sphere() {
        let mut dots = ring(24, 6.0);
        let settings = RelaxSettings::for_cloud(dots.len(), 10.0);
        for _ in 0..50 {
            relax_pass(&mut dots, &settings);
            for dot in &dots {
                assert!(
                    (dot.position.length() - 10.0).abs() < 1e-3,
                    "dot drifted off sphere: |p| = {}",
                    dot.position.length()
                );
            }
        }
    }

    #[test]
    fn static_dots_are_bit_identical_after_relaxation() {
        let pinned_at = Vec3::new(0.0, 0.0, 10.0);
        let mut dots = ring(12, 5.0);
        dots.push(Dot::pinned(pinned_at));
        let settings = RelaxSettings::for_cloud(dots.len(), 10.0);
        relax(&mut dots, &settings, 100);
        assert_eq!(dots.last().map(|d| d.position), Some(pinned_at));
    }

    #[test]
    fn relaxation_spreads_a_clustered_cloud() {
        // Start everything bunched near one pole; relaxation must increase
        // the mean nearest-neighbour spacing.
        let mut dots: Vec<Dot> = (0..16)
            .map(|i| {
                Dot::movable(Vec3::new(
                    (i as f32) * 0.01,
                    (i as f32) * 0.013 + 0.1,
                    10.0,
                ))
            })
            .collect();
        let settings = RelaxSettings::for_cloud(dots.len(), 10.0);
        let (before, _) = nearest_neighbor_stats(&dots).expect("stats");
        relax(&mut dots, &settings, 300);
        let (after, _) = nearest_neighbor_stats(&dots).expect("stats");
        assert!(
            after > before * 2.0,
            "cloud did not spread: {before} → {after}"
        );
    }

    #[test]
    fn interior_mode_lets_dots_leave_the_surface() {
        let mut dots = ring(8, 9.0);
        let mut settings = RelaxSettings::for_cloud(dots.len(), 10.0);
        settings.interior_points = true;
        relax(&mut dots, &settings, 20);
        // No snapping: at least one dot should be off the surface.
        assert!(
            dots.iter().any(|d| (d.position.length() - 10.0).abs() > 1e-2),
            "interior mode should not pin dots to the sphere"
        );
        for dot in &dots {
            assert!(dot.position.is_finite());
        }
    }

    #[test]
    fn all_positions_stay_finite_with_coincident_dots() {
        let mut dots = vec![
            Dot::movable(Vec3::new(0.0, 0.0, 10.0)),
            Dot::movable(Vec3::new(0.0, 0.0, 10.0)),
            Dot::movable(Vec3::new(10.0, 0.0, 0.0)),
        ];
        let settings = RelaxSettings::for_cloud(dots.len(), 10.0);
        relax(&mut dots, &settings, 50);
        for dot in &dots {
            assert!(dot.position.is_finite(), "position went non-finite");
        }
    }

    // ── nearest_neighbor_stats ────────────────────────────────────────────────

    #[test]
    fn stats_none_for_fewer_than_two_dots() {
        assert!(nearest_neighbor_stats(&[]).is_none());
        assert!(nearest_neighbor_stats(&[Dot::movable(Vec3::X)]).is_none());
    }

    #[test]
    fn stats_mean_matches_uniform_pair() {
        let dots = vec![
            Dot::movable(Vec3::ZERO),
            Dot::movable(Vec3::new(2.0, 0.0, 0.0)),
        ];
        let (mean, spread) = nearest_neighbor_stats(&dots).expect("stats");
        assert!((mean - 2.0).abs() < 1e-6);
        assert!(spread.abs() < 1e-6);
    }
}
