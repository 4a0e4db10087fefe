use bevy::prelude::*;

use super::input::JumpPressed;
use super::state::*;

/// Handles jump input with coyote time
pub fn handle_jump(
    mut commands: Commands,
    mut query: Query<(
        Entity,
        &PlayerConfig,
        &Locomotion,
        &mut PlayerVelocity,
        &mut CoyoteTime,
        &mut JumpPressed,
        Has<Grounded>,
    )>,
) {
    for (entity, config, locomotion, mut velocity, mut coyote, mut jump_pressed, grounded) in
        &mut query
    {
        // Presses made while another controller owns the character are dropped
        if !locomotion.enabled {
            jump_pressed.0 = false;
            continue;
        }

        // Reset vertical velocity when grounded (so gravity doesn't accumulate)
        if grounded && velocity.y < 0.0 {
            velocity.y = 0.0;
        }

        if !jump_pressed.0 {
            continue;
        }
        jump_pressed.0 = false;

        if grounded || coyote.timer < config.coyote_time {
            velocity.y = config.jump_velocity;
            coyote.timer = config.coyote_time;
            commands.entity(entity).remove::<Grounded>();
        }
    }
}
