//! Runtime bench configuration loaded from `assets/regolith.toml`.
//!
//! [`LabConfig`] is a Bevy [`Resource`] that mirrors every constant in
//! [`crate::constants`].  At startup, [`load_lab_config`] reads
//! `assets/regolith.toml` and overwrites the defaults with any values present
//! in the file.  Missing keys fall back to the compile-time defaults, so a
//! minimal TOML can override just the constants you care about.
//!
//! ## Usage in systems
//!
//! Add `config: Res<LabConfig>` to any system parameter list and read values
//! with `config.relax_radius`, `config.gravity_strength`, etc.
//!
//! ## Tuning workflow
//!
//! 1. Edit `assets/regolith.toml`.
//! 2. Restart the bench — no recompilation required.
//! 3. Re-run the scenario you are tuning via `REGOLITH_TEST`.
//!
//! Keep `src/constants.rs` in sync: it remains the **authoritative default**
//! source used by `LabConfig::default()`.

use crate::constants::*;
use bevy::prelude::*;
use serde::Deserialize;

/// Runtime-tunable bench configuration.
///
/// All fields default to the corresponding compile-time constant from
/// `src/constants.rs`.  Override any subset by setting the value in
/// `assets/regolith.toml`.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LabConfig {
    // ── Debris Spawn Volume ──────────────────────────────────────────────────
    pub spawn_half_extent: f32,
    pub spawn_keep_clear_radius: f32,
    pub debris_scale_min: f32,
    pub debris_scale_max: f32,
    pub debris_initial_velocity_range: f32,
    pub debris_initial_angvel_range: f32,

    // ── Physics: Collision ───────────────────────────────────────────────────
    pub restitution_debris: f32,
    pub friction_debris: f32,

    // ── Physics: Gravity Fields ──────────────────────────────────────────────
    pub gravity_strength: f32,
    pub gravity_cube_half_extent: f32,

    // ── Physics: Culling ─────────────────────────────────────────────────────
    pub hard_cull_distance: f32,

    // ── Relaxation ───────────────────────────────────────────────────────────
    pub relax_radius: f32,
    pub relax_step_percent: f32,
    pub relax_passes_per_frame: u32,

    // ── Hopfield ─────────────────────────────────────────────────────────────
    pub hopfield_max_passes: usize,
    pub bipolar_low: f32,
    pub bipolar_high: f32,
    pub bipolar_midpoint: f32,

    // ── Sampling ─────────────────────────────────────────────────────────────
    pub sampling_histogram_bins: usize,
    pub sampling_demo_count: usize,

    // ── Camera ───────────────────────────────────────────────────────────────
    pub camera_distance: f32,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            // Debris Spawn Volume
            spawn_half_extent: SPAWN_HALF_EXTENT,
            spawn_keep_clear_radius: SPAWN_KEEP_CLEAR_RADIUS,
            debris_scale_min: DEBRIS_SCALE_MIN,
            debris_scale_max: DEBRIS_SCALE_MAX,
            debris_initial_velocity_range: DEBRIS_INITIAL_VELOCITY_RANGE,
            debris_initial_angvel_range: DEBRIS_INITIAL_ANGVEL_RANGE,
            // Collision
            restitution_debris: RESTITUTION_DEBRIS,
            friction_debris: FRICTION_DEBRIS,
            // Gravity Fields
            gravity_strength: GRAVITY_STRENGTH,
            gravity_cube_half_extent: GRAVITY_CUBE_HALF_EXTENT,
            // Culling
            hard_cull_distance: HARD_CULL_DISTANCE,
            // Relaxation
            relax_radius: RELAX_RADIUS,
            relax_step_percent: RELAX_STEP_PERCENT,
            relax_passes_per_frame: RELAX_PASSES_PER_FRAME,
            // Hopfield
            hopfield_max_passes: HOPFIELD_MAX_PASSES,
            bipolar_low: BIPOLAR_LOW,
            bipolar_high: BIPOLAR_HIGH,
            bipolar_midpoint: BIPOLAR_MIDPOINT,
            // Sampling
            sampling_histogram_bins: SAMPLING_HISTOGRAM_BINS,
            sampling_demo_count: SAMPLING_DEMO_COUNT,
            // Camera
            camera_distance: CAMERA_DISTANCE,
        }
    }
}

/// Startup system: attempt to load `assets/regolith.toml` and overwrite the
/// `LabConfig` resource with any values present in the file.
///
/// Missing keys retain their compiled defaults.  TOML parse errors are
/// logged but do not abort the bench.  A missing file is silently ignored
/// (defaults are already in place from `insert_resource`).
pub fn load_lab_config(mut config: ResMut<LabConfig>) {
    let path = "assets/regolith.toml";
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<LabConfig>(&contents) {
            Ok(loaded) => {
                *config = loaded;
                info!("Loaded bench config from {path}");
            }
            Err(e) => {
                warn!("Failed to parse {path}: {e}; using defaults");
            }
        },
        Err(_) => {
            // File not present — defaults are already in place; not an error.
            info!("No {path} found; using compiled defaults");
        }
    }
}
