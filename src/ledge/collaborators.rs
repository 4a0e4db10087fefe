//! Seams between the ledge controller and the rest of the character.
//!
//! The controller only talks to the world through these traits. The ECS
//! implementations live in `bridge`; tests provide their own.

use bevy::prelude::*;
use thiserror::Error;

/// The character's movement primitive. Positions are at the character's feet.
pub trait CharacterBody {
    fn position(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);
    /// Horizontal facing direction
    fn forward(&self) -> Vec3;
    fn set_rotation(&mut self, rotation: Quat);
    fn is_grounded(&self) -> bool;
    fn vertical_velocity(&self) -> f32;
    /// Full standing height
    fn height(&self) -> f32;
    /// Stops (or resumes) the physics engine from moving or colliding the body.
    /// Position writes made while suspended are not fought by the solver.
    fn set_suspended(&mut self, suspended: bool);

    /// Moves the body instantly, bypassing collision response.
    fn teleport(&mut self, position: Vec3) {
        self.set_suspended(true);
        self.set_position(position);
        self.set_suspended(false);
    }
}

/// Player movement intent owned by the input layer.
pub trait MovementInput {
    fn move_vector(&self) -> Vec2;
    fn clear_move(&mut self);
    fn clear_jump(&mut self);
    fn clear_sprint(&mut self);
}

/// The character's regular locomotion.
pub trait LocomotionGate {
    fn set_enabled(&mut self, enabled: bool);
    /// Resynchronises locomotion to "standing on ground" after the controller
    /// moved the character behind its back.
    fn force_grounded(&mut self) {}
}

/// Named boolean parameters sent to the animation engine.
pub trait AnimationSink {
    fn set_signal(&mut self, name: &str, value: bool) -> Result<(), AnimationSignalError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnimationSignalError {
    #[error("animation signal `{0}` is not declared on the target")]
    UnknownSignal(String),
    #[error("animation target is no longer available")]
    TargetMissing,
}

/// The signals the ledge controller drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LedgeSignal {
    Hang,
    Climb,
}

impl LedgeSignal {
    pub const ALL: [LedgeSignal; 2] = [LedgeSignal::Hang, LedgeSignal::Climb];

    pub fn name(self) -> &'static str {
        match self {
            LedgeSignal::Hang => "hang",
            LedgeSignal::Climb => "climb",
        }
    }
}

/// Sends `signal` if a sink is attached. A failing sink is logged and ignored
/// so the caller's state changes always complete.
pub fn signal_best_effort(
    sink: Option<&mut (dyn AnimationSink + '_)>,
    signal: LedgeSignal,
    value: bool,
) {
    let Some(sink) = sink else {
        return;
    };

    if let Err(err) = sink.set_signal(signal.name(), value) {
        warn!("ledge animation signal `{}` = {value} dropped: {err}", signal.name());
    }
}
