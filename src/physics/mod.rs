mod layers;
mod plugin;

pub use layers::GameLayer;
pub use plugin::PhysicsPlugin;
