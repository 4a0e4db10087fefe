pub mod ledge;
pub mod physics;
pub mod player;

pub use ledge::{LedgeDebugPlugin, LedgePlugin};
pub use physics::PhysicsPlugin;
pub use player::PlayerPlugin;

use bevy::prelude::*;

/// Unified plugin that adds physics, player locomotion and ledge climbing.
pub struct LedgeClimbPlugin;

impl Plugin for LedgeClimbPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<PhysicsPlugin>() {
            app.add_plugins(PhysicsPlugin::default());
        }
        if !app.is_plugin_added::<PlayerPlugin>() {
            app.add_plugins(PlayerPlugin);
        }
        if !app.is_plugin_added::<LedgePlugin>() {
            app.add_plugins(LedgePlugin);
        }
    }
}

pub mod prelude {
    pub use crate::ledge::{
        AnimationSignals, ControllerState, LedgeAnchor, LedgeConfig, LedgeController,
        LedgeDebugPlugin, LedgeMessage, LedgePlugin, LedgeState, LedgeTransition,
    };
    pub use crate::physics::{GameLayer, PhysicsPlugin};
    pub use crate::player::{
        spawn_player, Grounded, Locomotion, MoveInput, Player, PlayerConfig, PlayerPlugin,
        PlayerSet, PlayerVelocity,
    };
    pub use crate::LedgeClimbPlugin;
}
