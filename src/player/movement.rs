use avian3d::prelude::*;
use bevy::prelude::*;

use super::input::{MoveInput, SprintInput};
use super::state::*;
use crate::physics::GameLayer;

/// Layers the player can stand on
pub fn walkable_layers() -> LayerMask {
    LayerMask::from([GameLayer::World, GameLayer::Ledge])
}

/// Updates grounded state via raycast
pub fn update_grounded_state(
    mut commands: Commands,
    spatial_query: SpatialQuery,
    mut query: Query<(
        Entity,
        &Transform,
        &PlayerConfig,
        &PlayerVelocity,
        &mut CoyoteTime,
        Has<Grounded>,
    )>,
    time: Res<Time>,
) {
    let dt = time.delta_secs();
    let filter = SpatialQueryFilter::default().with_mask(walkable_layers());

    for (entity, transform, config, player_vel, mut coyote, was_grounded) in &mut query {
        // Raycast from center of capsule downward
        let ground_check_dist = config.half_height() + 0.1;
        let hit = spatial_query.cast_ray(
            transform.translation,
            Dir3::NEG_Y,
            ground_check_dist,
            true,
            &filter,
        );

        let is_grounded = hit.is_some() && player_vel.y < 1.0;

        if is_grounded {
            if !was_grounded {
                commands.entity(entity).insert(Grounded);
            }
            coyote.timer = 0.0;
        } else {
            if was_grounded {
                commands.entity(entity).remove::<Grounded>();
            }
            coyote.timer += dt;
        }
    }
}

/// Updates sprint state from the held sprint input
pub fn update_sprint_state(
    mut commands: Commands,
    query: Query<(Entity, &SprintInput, &Locomotion, Has<Grounded>), With<Player>>,
) {
    for (entity, sprint_input, locomotion, grounded) in &query {
        if sprint_input.0 && grounded && locomotion.enabled {
            commands.entity(entity).insert(Sprinting);
        } else {
            commands.entity(entity).remove::<Sprinting>();
        }
    }
}

/// Converts stick/WASD input into a world-space direction (up = -Z).
fn input_direction(input: Vec2) -> Vec3 {
    Vec3::new(input.x, 0.0, -input.y).normalize_or_zero()
}

/// Applies ground movement - sets horizontal velocity
pub fn ground_movement(
    mut query: Query<
        (
            &MoveInput,
            &PlayerConfig,
            &Locomotion,
            &mut PlayerVelocity,
            Has<Sprinting>,
        ),
        With<Grounded>,
    >,
    time: Res<Time>,
) {
    let dt = time.delta_secs();

    for (input, config, locomotion, mut velocity, sprinting) in &mut query {
        if !locomotion.enabled {
            continue;
        }

        let move_dir = input_direction(input.value());
        let target_speed = if sprinting {
            config.sprint_speed
        } else {
            config.walk_speed
        };

        let target = move_dir * target_speed;
        let current = Vec3::new(velocity.x, 0.0, velocity.z);

        let accel = if input.value().length_squared() > 0.01 {
            config.ground_accel
        } else {
            config.ground_friction
        };

        let new_vel = current.move_towards(target, accel * dt);
        velocity.x = new_vel.x;
        velocity.z = new_vel.z;
    }
}

/// Applies air movement with reduced control
pub fn air_movement(
    mut query: Query<
        (&MoveInput, &PlayerConfig, &Locomotion, &mut PlayerVelocity),
        Without<Grounded>,
    >,
    time: Res<Time>,
) {
    let dt = time.delta_secs();

    for (input, config, locomotion, mut velocity) in &mut query {
        if !locomotion.enabled || input.value().length_squared() < 0.01 {
            continue;
        }

        let move_dir = input_direction(input.value());
        let current_speed = velocity.dot(move_dir);
        let add_speed = (config.walk_speed - current_speed).max(0.0);
        let accel_speed = (config.air_accel * dt).min(add_speed);

        velocity.x += move_dir.x * accel_speed;
        velocity.z += move_dir.z * accel_speed;
    }
}

/// Turns the character toward its horizontal movement direction
pub fn face_movement_direction(
    mut query: Query<(&mut Transform, &PlayerConfig, &Locomotion, &PlayerVelocity)>,
    time: Res<Time>,
) {
    let dt = time.delta_secs();

    for (mut transform, config, locomotion, velocity) in &mut query {
        if !locomotion.enabled {
            continue;
        }

        let horizontal = Vec3::new(velocity.x, 0.0, velocity.z);
        if horizontal.length_squared() < 0.25 {
            continue;
        }

        let target = Transform::default().looking_to(horizontal, Vec3::Y).rotation;
        let t = (config.turn_speed * dt).min(1.0);
        transform.rotation = transform.rotation.slerp(target, t);
    }
}

/// Applies gravity when not grounded
pub fn apply_gravity(
    mut query: Query<(&Locomotion, &mut PlayerVelocity), Without<Grounded>>,
    gravity: Res<Gravity>,
    time: Res<Time>,
) {
    let dt = time.delta_secs();
    for (locomotion, mut velocity) in &mut query {
        if locomotion.enabled {
            velocity.0 += gravity.0 * dt;
        }
    }
}

/// Syncs PlayerVelocity to Avian's LinearVelocity
pub fn apply_velocity(
    mut query: Query<
        (
            &mut PlayerVelocity,
            &PlayerConfig,
            &Locomotion,
            &mut LinearVelocity,
            Has<Grounded>,
        ),
        With<Player>,
    >,
) {
    for (mut player_vel, config, locomotion, mut lin_vel, grounded) in &mut query {
        if !locomotion.enabled {
            continue;
        }

        // Clamp horizontal speed
        if config.max_horizontal_speed > 0.0 {
            let h_speed = Vec2::new(player_vel.x, player_vel.z).length();
            if h_speed > config.max_horizontal_speed {
                let scale = config.max_horizontal_speed / h_speed;
                player_vel.x *= scale;
                player_vel.z *= scale;
            }
        }

        lin_vel.x = player_vel.x;
        lin_vel.z = player_vel.z;
        lin_vel.y = if grounded {
            // Keep a small downward push so slopes don't launch the player
            player_vel.y.min(-0.5)
        } else {
            player_vel.y
        };
    }
}
