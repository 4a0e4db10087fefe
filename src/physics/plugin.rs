use avian3d::prelude::*;
use bevy::prelude::*;

/// Plugin that sets up the Avian3D physics engine in metre units
pub struct PhysicsPlugin {
    /// Downward acceleration in m/s², also read by the locomotion integrator
    pub gravity: f32,
}

impl Default for PhysicsPlugin {
    fn default() -> Self {
        Self { gravity: 20.0 } // Slightly higher than earth for a snappy feel
    }
}

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(PhysicsPlugins::default().with_length_unit(1.0));
        app.insert_resource(Gravity(Vec3::NEG_Y * self.gravity));
    }
}
