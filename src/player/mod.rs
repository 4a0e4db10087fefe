pub mod input;
mod jump;
mod movement;
mod plugin;
mod state;

pub use input::{JumpPressed, MoveInput, SprintInput};
pub use movement::walkable_layers;
pub use plugin::{spawn_player, PlayerPlugin, PlayerSet};
pub use state::*;
