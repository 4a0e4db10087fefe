use avian3d::prelude::*;
use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;

use super::input::{
    handle_jump_start, handle_move_end, handle_move_input, handle_sprint_end, handle_sprint_start,
    JumpAction, JumpPressed, MoveAction, MoveInput, SprintAction, SprintInput,
};
use super::jump::*;
use super::movement::*;
use super::state::*;
use crate::ledge::{AnimationSignals, LedgeConfig, LedgeController};
use crate::physics::GameLayer;

/// Ordering of the fixed-step player systems. Controllers that take over
/// the character run between `Sense` and `Act`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerSet {
    /// Ground checks and other queries of the world
    Sense,
    /// Regular locomotion
    Act,
}

/// Plugin for the third-person player locomotion
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<EnhancedInputPlugin>() {
            app.add_plugins(EnhancedInputPlugin);
        }

        // Register input context for player
        app.add_input_context::<Player>();

        // Input observers
        app.add_observer(handle_move_input);
        app.add_observer(handle_move_end);
        app.add_observer(handle_sprint_start);
        app.add_observer(handle_sprint_end);
        app.add_observer(handle_jump_start);

        app.configure_sets(FixedUpdate, (PlayerSet::Sense, PlayerSet::Act).chain());

        app.add_systems(FixedUpdate, update_grounded_state.in_set(PlayerSet::Sense));
        app.add_systems(
            FixedUpdate,
            (
                update_sprint_state,
                handle_jump,
                ground_movement,
                air_movement,
                apply_gravity,
                face_movement_direction,
                apply_velocity,
            )
                .chain()
                .in_set(PlayerSet::Act),
        );
    }
}

/// Spawns a player that can walk, jump and grab ledges.
///
/// `position` is the capsule center.
pub fn spawn_player(commands: &mut Commands, position: Vec3) -> Entity {
    let config = PlayerConfig::default();
    let capsule_height = config.stand_height - config.radius * 2.0;

    commands
        .spawn((
            Player,
            config,
            PlayerVelocity::default(),
            CoyoteTime::default(),
            Locomotion::default(),
        ))
        .insert((
            // Ledge interaction
            LedgeController::default(),
            LedgeConfig::default(),
            AnimationSignals::ledge(),
        ))
        .insert((
            // Input state
            MoveInput::default(),
            SprintInput::default(),
            JumpPressed::default(),
        ))
        .insert((
            // Physics - Dynamic body with locked rotation, let Avian handle collisions
            RigidBody::Dynamic,
            Collider::capsule(config.radius, capsule_height),
            CollisionLayers::new(GameLayer::Player, [GameLayer::World, GameLayer::Ledge]),
            LockedAxes::ROTATION_LOCKED,
            LinearVelocity::default(),
            TranslationInterpolation,
            Friction::new(0.0),  // No friction - we handle movement ourselves
            Restitution::new(0.0),  // No bounce
            GravityScale(0.0),  // Locomotion integrates gravity itself
        ))
        .insert((Transform::from_translation(position), Visibility::default()))
        .insert(
            // Input bindings
            actions!(Player[
                (
                    Action::<MoveAction>::new(),
                    bindings![
                        (KeyCode::KeyW, SwizzleAxis::YXZ),
                        (KeyCode::KeyS, SwizzleAxis::YXZ, Negate::all()),
                        KeyCode::KeyD,
                        (KeyCode::KeyA, Negate::all()),
                    ],
                ),
                (
                    Action::<JumpAction>::new(),
                    bindings![KeyCode::Space, GamepadButton::South],
                ),
                (
                    Action::<SprintAction>::new(),
                    bindings![KeyCode::ShiftLeft, GamepadButton::LeftTrigger],
                ),
            ]),
        )
        .id()
}
