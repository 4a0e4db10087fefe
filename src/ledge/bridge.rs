//! ECS-backed implementations of the controller's collaborator traits.

use avian3d::prelude::*;
use bevy::prelude::*;

use super::collaborators::{CharacterBody, LocomotionGate, MovementInput};
use crate::player::{CoyoteTime, Grounded, JumpPressed, Locomotion, MoveInput, PlayerVelocity, SprintInput};

/// Feet position of a character whose transform sits at its capsule center
pub fn feet_position(transform: &Transform, half_height: f32) -> Vec3 {
    transform.translation - Vec3::Y * half_height
}

/// Horizontal facing of a transform
pub fn horizontal_forward(transform: &Transform) -> Vec3 {
    let forward = transform.forward().as_vec3();
    Vec3::new(forward.x, 0.0, forward.z).normalize_or_zero()
}

/// An Avian rigid body character. Suspending it turns the body kinematic so
/// the solver neither moves it nor pushes it out of the ledge.
pub struct ClimberBody<'a> {
    pub transform: Mut<'a, Transform>,
    pub velocity: Mut<'a, LinearVelocity>,
    pub rigid_body: Mut<'a, RigidBody>,
    pub half_height: f32,
    pub grounded: bool,
}

impl CharacterBody for ClimberBody<'_> {
    fn position(&self) -> Vec3 {
        feet_position(&self.transform, self.half_height)
    }

    fn set_position(&mut self, position: Vec3) {
        self.transform.translation = position + Vec3::Y * self.half_height;
    }

    fn forward(&self) -> Vec3 {
        horizontal_forward(&self.transform)
    }

    fn set_rotation(&mut self, rotation: Quat) {
        self.transform.rotation = rotation;
    }

    fn is_grounded(&self) -> bool {
        self.grounded
    }

    fn vertical_velocity(&self) -> f32 {
        self.velocity.y
    }

    fn height(&self) -> f32 {
        self.half_height * 2.0
    }

    fn set_suspended(&mut self, suspended: bool) {
        if suspended {
            self.rigid_body.set_if_neq(RigidBody::Kinematic);
            self.velocity.0 = Vec3::ZERO;
        } else {
            self.rigid_body.set_if_neq(RigidBody::Dynamic);
        }
    }
}

/// The player's input components
pub struct PlayerInput<'a> {
    pub movement: Mut<'a, MoveInput>,
    pub jump: Mut<'a, JumpPressed>,
    pub sprint: Mut<'a, SprintInput>,
}

impl MovementInput for PlayerInput<'_> {
    fn move_vector(&self) -> Vec2 {
        self.movement.value()
    }

    fn clear_move(&mut self) {
        self.movement.clear();
    }

    fn clear_jump(&mut self) {
        self.jump.0 = false;
    }

    fn clear_sprint(&mut self) {
        self.sprint.0 = false;
    }
}

/// The player's locomotion systems, switched through [`Locomotion`]
pub struct PlayerLocomotion<'a> {
    pub locomotion: Mut<'a, Locomotion>,
    pub velocity: Mut<'a, PlayerVelocity>,
    pub coyote: Mut<'a, CoyoteTime>,
    pub commands: EntityCommands<'a>,
}

impl LocomotionGate for PlayerLocomotion<'_> {
    fn set_enabled(&mut self, enabled: bool) {
        self.locomotion.enabled = enabled;
        if !enabled {
            self.velocity.0 = Vec3::ZERO;
        }
    }

    fn force_grounded(&mut self) {
        self.velocity.0 = Vec3::ZERO;
        self.coyote.timer = 0.0;
        self.commands.insert(Grounded);
    }
}
