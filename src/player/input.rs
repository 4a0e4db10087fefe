use bevy::ecs::observer::On;
use bevy::prelude::{Component, Deref, DerefMut, EntityEvent, Query, Vec2};
use bevy_enhanced_input::prelude::*;

/// Move in a direction (WASD)
#[derive(Debug, InputAction)]
#[action_output(Vec2)]
pub struct MoveAction;

/// Jump action
#[derive(Debug, InputAction)]
#[action_output(bool)]
pub struct JumpAction;

/// Sprint action (hold)
#[derive(Debug, InputAction)]
#[action_output(bool)]
pub struct SprintAction;

/// Stores the current movement input vector.
///
/// The action fires every frame while a key is held, so the raw value is
/// remembered separately: a vector cleared by gameplay code stays cleared
/// until the player actually changes their input.
#[derive(Component, Default, Debug)]
pub struct MoveInput {
    value: Vec2,
    raw: Vec2,
}

impl MoveInput {
    pub fn value(&self) -> Vec2 {
        self.value
    }

    /// Feeds a fresh reading from the input device
    pub fn update(&mut self, raw: Vec2) {
        if raw != self.raw {
            self.raw = raw;
            self.value = raw;
        }
    }

    /// Zeroes the vector until the device reading changes
    pub fn clear(&mut self) {
        self.value = Vec2::ZERO;
    }
}

/// Stores whether sprint is held
#[derive(Component, Default, Deref, DerefMut)]
pub struct SprintInput(pub bool);

/// Stores whether jump was pressed this frame
#[derive(Component, Default)]
pub struct JumpPressed(pub bool);

/// System to handle move input via observer
pub fn handle_move_input(trigger: On<Fire<MoveAction>>, mut query: Query<&mut MoveInput>) {
    if let Ok(mut move_input) = query.get_mut(trigger.event_target()) {
        move_input.update(trigger.value);
    }
}

/// Clear move input when all movement keys are released
pub fn handle_move_end(trigger: On<Complete<MoveAction>>, mut query: Query<&mut MoveInput>) {
    if let Ok(mut move_input) = query.get_mut(trigger.event_target()) {
        move_input.update(Vec2::ZERO);
    }
}

/// Handle sprint start
pub fn handle_sprint_start(trigger: On<Start<SprintAction>>, mut query: Query<&mut SprintInput>) {
    if let Ok(mut sprint) = query.get_mut(trigger.event_target()) {
        sprint.0 = true;
    }
}

/// Handle sprint end
pub fn handle_sprint_end(trigger: On<Complete<SprintAction>>, mut query: Query<&mut SprintInput>) {
    if let Ok(mut sprint) = query.get_mut(trigger.event_target()) {
        sprint.0 = false;
    }
}

/// Handle jump press
pub fn handle_jump_start(trigger: On<Start<JumpAction>>, mut query: Query<&mut JumpPressed>) {
    if let Ok(mut jump) = query.get_mut(trigger.event_target()) {
        jump.0 = true;
    }
}
