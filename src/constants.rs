//! Centralised simulation and demo-bench constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//!
//! ## Tuning guidance
//!
//! Each constant includes the tested range and the observable consequence of
//! changing it.  Runtime overrides go in `assets/regolith.toml` (see
//! [`crate::config`]); this file remains the authoritative default source.

// ── Debris Spawn Volume ───────────────────────────────────────────────────────

/// Half-extent of the cubic debris spawn volume (world units).
///
/// Debris is distributed within ±SPAWN_HALF_EXTENT of the origin on every
/// axis.  Increasing this spreads the initial field; decreasing creates a
/// denser opening cluster.
pub const SPAWN_HALF_EXTENT: f32 = 60.0;

/// Radius around the origin that is kept free of debris at spawn time.
///
/// The origin hosts the relaxation sphere and the camera focus; debris
/// spawned on top of it obscures both.
pub const SPAWN_KEEP_CLEAR_RADIUS: f32 = 12.0;

/// Uniform scale range applied to spawned debris shapes.
pub const DEBRIS_SCALE_MIN: f32 = 0.5;
pub const DEBRIS_SCALE_MAX: f32 = 1.5;

/// Magnitude range of the random initial linear velocity given to debris.
///
/// Kept gentle so shapes drift rather than scatter; at 2.0 a body crosses
/// the spawn volume in roughly a minute.
pub const DEBRIS_INITIAL_VELOCITY_RANGE: f32 = 2.0;

/// Magnitude range of the random initial angular velocity (rad/s per axis).
pub const DEBRIS_INITIAL_ANGVEL_RANGE: f32 = 0.5;

// ── Physics: Collision ────────────────────────────────────────────────────────

/// Restitution coefficient for debris bodies.
/// 0.0 = perfectly inelastic; 1.0 = perfectly elastic.
pub const RESTITUTION_DEBRIS: f32 = 0.3;

/// Friction coefficient applied to debris–debris contacts.
pub const FRICTION_DEBRIS: f32 = 0.8;

// ── Physics: Gravity Fields ───────────────────────────────────────────────────

/// Force per unit mass applied by the active gravity field.
///
/// Tested range: 1.0–30.0.  At 8.0 a body 50 u from a cube face reaches the
/// wall in a few hundred frames without bouncing hard enough to escape.
pub const GRAVITY_STRENGTH: f32 = 8.0;

/// Half-extent of the gravity cube used by the `gravity_cube` scenario.
///
/// Bodies inside the cube are pulled toward the nearest face.  Must exceed
/// `SPAWN_HALF_EXTENT` or debris starts outside the field and never settles.
pub const GRAVITY_CUBE_HALF_EXTENT: f32 = 80.0;

// ── Physics: Culling ──────────────────────────────────────────────────────────

/// Absolute hard-cull distance: bodies beyond this are forcibly removed.
///
/// Safety net for runaway bodies; normal simulation objects never reach it.
pub const HARD_CULL_DISTANCE: f32 = 500.0;

// ── Relaxation: Sphere Point Distribution ─────────────────────────────────────

/// Default radius of the relaxation sphere (world units).
pub const RELAX_RADIUS: f32 = 10.0;

/// Fraction of the accumulated force applied to a dot per pass.
///
/// Tested range: 0.01–0.5.  Higher values converge faster but overshoot and
/// oscillate near equilibrium; 0.1 settles a 100-dot cloud in ~200 passes.
pub const RELAX_STEP_PERCENT: f32 = 0.1;

/// Relaxation passes executed per rendered frame in the demo scenarios.
pub const RELAX_PASSES_PER_FRAME: u32 = 1;

/// Curve-fit constants for the neighbor search distance.
///
/// `calc_repulse_distance` evaluates `radius · (A + B·x + C·x² + D·x³)` with
/// `x = ln(count)`.  The constants are a least-squares cubic fit against the
/// ideal even-distribution spacing `radius · √(4π/count)` scaled by a 1.6
/// interaction-reach factor, fitted over count = 2..3000.  Do not round
/// these: the tail of the fit (count > 1000) is sensitive to the cubic term.
pub const REPULSE_FIT_A: f32 = 4.857_421_5;
pub const REPULSE_FIT_B: f32 = -1.793_893_6;
pub const REPULSE_FIT_C: f32 = 0.237_298_53;
pub const REPULSE_FIT_D: f32 = -0.010_935_812;

// ── Hopfield: Associative Memory ──────────────────────────────────────────────

/// Upper bound on full asynchronous recall passes.
///
/// The recall loop repeats until a pass changes nothing; this cap guards
/// against non-converging weight configurations.  Recall of a stored
/// pattern typically settles in 1–3 passes; 64 leaves a wide margin.
pub const HOPFIELD_MAX_PASSES: usize = 64;

/// External value mapped from the bipolar −1 state.
pub const BIPOLAR_LOW: f32 = 0.0;

/// External value mapped from the bipolar +1 state.
pub const BIPOLAR_HIGH: f32 = 1.0;

/// Threshold separating low from high when encoding external values.
pub const BIPOLAR_MIDPOINT: f32 = 0.5;

// ── Sampling ──────────────────────────────────────────────────────────────────

/// Histogram bin count used by the sampling demo scenarios.
pub const SAMPLING_HISTOGRAM_BINS: usize = 20;

/// Samples drawn per sampling demo run.
pub const SAMPLING_DEMO_COUNT: usize = 10_000;

// ── Flag Textures ─────────────────────────────────────────────────────────────

/// Default flag texture dimensions (pixels).  4:3 like the source artwork.
pub const FLAG_WIDTH: usize = 64;
pub const FLAG_HEIGHT: usize = 48;

// ── Camera Overlay ────────────────────────────────────────────────────────────

/// Default overlay coverage grid resolution (cells per side).
pub const OVERLAY_GRID_SIZE: usize = 32;

// ── Camera ────────────────────────────────────────────────────────────────────

/// Distance from the origin at which the demo camera is parked.
pub const CAMERA_DISTANCE: f32 = 45.0;
