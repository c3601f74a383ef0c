//! Sandbox plugin and per-frame systems.
//!
//! [`SandboxPlugin`] wires the bench's update systems: relaxation stepping
//! over the [`DotCloud`], the gravity field, culling, and the wireframe
//! renderers.  The numeric cores stay ECS-free; these systems are the thin
//! layer that drives them from the frame loop.

use bevy::prelude::*;

use crate::config::LabConfig;
use crate::debris::{culling_system, gravity_field_system, GravityField};
use crate::relaxation::{self, Dot, RelaxSettings};
use crate::rendering;

pub struct SandboxPlugin;

impl Plugin for SandboxPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DotCloud>()
            .init_resource::<GravityField>()
            .add_systems(
                Update,
                (
                    culling_system, // FIRST: remove runaway bodies before physics
                    gravity_field_system,
                    relaxation_step_system,
                    rendering::draw_dot_cloud_system,
                    rendering::draw_debris_system,
                    rendering::draw_gravity_cube_system,
                ),
            );
    }
}

/// The relaxation cloud plus its settings, stepped once per frame.
///
/// `paused` freezes the cloud without discarding it; `last_movement` is the
/// largest single-dot movement of the most recent pass, used by scenarios
/// to detect settling.
#[derive(Resource, Debug, Clone)]
pub struct DotCloud {
    pub dots: Vec<Dot>,
    pub settings: RelaxSettings,
    pub paused: bool,
    pub last_movement: f32,
}

impl Default for DotCloud {
    fn default() -> Self {
        Self {
            dots: Vec::new(),
            settings: RelaxSettings::for_cloud(0, crate::constants::RELAX_RADIUS),
            paused: false,
            last_movement: 0.0,
        }
    }
}

impl DotCloud {
    /// Replace the cloud contents and derive fresh settings for its size.
    pub fn reset(&mut self, dots: Vec<Dot>, radius: f32) {
        self.settings = RelaxSettings::for_cloud(dots.len(), radius);
        self.dots = dots;
        self.paused = false;
        self.last_movement = 0.0;
    }

    /// Remove every dot ("clear" in the original bench).
    pub fn clear(&mut self) {
        self.dots.clear();
        self.last_movement = 0.0;
    }
}

/// Run the configured number of relaxation passes for this frame.
pub fn relaxation_step_system(mut cloud: ResMut<DotCloud>, config: Res<LabConfig>) {
    if cloud.paused || cloud.dots.is_empty() {
        return;
    }
    let settings = cloud.settings;
    let passes = config.relax_passes_per_frame;
    let dots = &mut cloud.dots;
    let movement = relaxation::relax(dots, &settings, passes);
    cloud.last_movement = movement;
}
