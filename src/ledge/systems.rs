use avian3d::prelude::*;
use bevy::color::palettes::css::{LIME, RED};
use bevy::prelude::*;

use super::bridge::*;
use super::collaborators::{AnimationSink, LocomotionGate, MovementInput};
use super::controller::{LedgeConfig, LedgeContext, LedgeController, LedgeTransition};
use super::probe::{LedgeQuery, SpatialRayProbe};
use super::signals::AnimationSignals;
use crate::player::{
    CoyoteTime, Grounded, JumpPressed, Locomotion, MoveInput, PlayerConfig, PlayerVelocity,
    SprintInput,
};

/// Emitted whenever a character's ledge state changes.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct LedgeMessage {
    pub character: Entity,
    pub transition: LedgeTransition,
}

/// Runs every ledge controller for one fixed step.
///
/// Input, locomotion and animation signals are optional on the character;
/// the body components are not.
pub fn tick_ledge_controllers(
    mut commands: Commands,
    spatial_query: SpatialQuery,
    ledges: LedgeQuery,
    mut climbers: Query<(
        Entity,
        &mut LedgeController,
        &LedgeConfig,
        (
            &mut Transform,
            &mut LinearVelocity,
            &mut RigidBody,
            &PlayerConfig,
            Has<Grounded>,
        ),
        Option<(&mut MoveInput, &mut JumpPressed, &mut SprintInput)>,
        Option<(&mut Locomotion, &mut PlayerVelocity, &mut CoyoteTime)>,
        Option<&mut AnimationSignals>,
    )>,
    mut writer: MessageWriter<LedgeMessage>,
    time: Res<Time>,
) {
    let dt = time.delta_secs();

    for (entity, mut controller, config, body, input, locomotion, mut signals) in &mut climbers {
        let (transform, velocity, rigid_body, player, grounded) = body;
        let mut body = ClimberBody {
            transform,
            velocity,
            rigid_body,
            half_height: player.half_height(),
            grounded,
        };

        let probe = SpatialRayProbe {
            spatial_query: &spatial_query,
            ledges: &ledges,
            exclude: entity,
        };

        let mut input = input.map(|(movement, jump, sprint)| PlayerInput {
            movement,
            jump,
            sprint,
        });

        let mut locomotion = locomotion.map(|(locomotion, velocity, coyote)| PlayerLocomotion {
            locomotion,
            velocity,
            coyote,
            commands: commands.entity(entity),
        });

        let mut ctx = LedgeContext {
            body: &mut body,
            probe: &probe,
            input: input.as_mut().map(|input| input as &mut dyn MovementInput),
            locomotion: locomotion
                .as_mut()
                .map(|locomotion| locomotion as &mut dyn LocomotionGate),
            animation: signals.as_mut().map(|signals| signals as &mut dyn AnimationSink),
        };

        if let Some(transition) = controller.tick(dt, config, &mut ctx) {
            writer.write(LedgeMessage {
                character: entity,
                transition,
            });
        }
    }
}

/// Reports ledge controllers that were added to something that isn't a
/// physics character. They would silently never run otherwise.
pub fn report_incomplete_climbers(
    query: Query<
        (
            Entity,
            Has<LedgeConfig>,
            Has<Transform>,
            Has<LinearVelocity>,
            Has<RigidBody>,
            Has<PlayerConfig>,
        ),
        Added<LedgeController>,
    >,
) {
    for (entity, config, transform, velocity, rigid_body, player) in &query {
        let missing: Vec<&str> = [
            (config, "LedgeConfig"),
            (transform, "Transform"),
            (velocity, "LinearVelocity"),
            (rigid_body, "RigidBody"),
            (player, "PlayerConfig"),
        ]
        .into_iter()
        .filter_map(|(present, name)| (!present).then_some(name))
        .collect();

        if !missing.is_empty() {
            error!(
                "ledge controller on {entity} is missing {}; it will never run",
                missing.join(", ")
            );
        }
    }
}

/// Draws each character's ledge detection ray
pub fn draw_ledge_probes(
    mut gizmos: Gizmos,
    query: Query<(&Transform, &PlayerConfig, &LedgeConfig, &LedgeController)>,
) {
    for (transform, player, config, controller) in &query {
        let origin = feet_position(transform, player.half_height()) + Vec3::Y * player.stand_height;
        let end = origin + horizontal_forward(transform) * config.reach_distance;
        let color = if controller.is_idle() { RED } else { LIME };
        gizmos.line(origin, end, color);
    }
}
