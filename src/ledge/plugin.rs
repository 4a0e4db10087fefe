use bevy::prelude::*;

use super::systems::*;
use crate::player::PlayerSet;

/// Plugin that runs ledge detection, hanging and climbing for every
/// character with a [`LedgeController`](super::LedgeController)
pub struct LedgePlugin;

impl Plugin for LedgePlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<LedgeMessage>();

        // Takes over from locomotion after the ground check and before it moves
        app.add_systems(
            FixedUpdate,
            tick_ledge_controllers
                .after(PlayerSet::Sense)
                .before(PlayerSet::Act),
        );

        app.add_systems(Update, report_incomplete_climbers);
    }
}

/// Draws the ledge detection rays with gizmos
pub struct LedgeDebugPlugin;

impl Plugin for LedgeDebugPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, draw_ledge_probes);
    }
}
