use bevy::prelude::*;

/// Marker component for the player entity (also used as input context)
#[derive(Component, Default)]
pub struct Player;

/// Player movement configuration
#[derive(Component, Clone, Copy)]
pub struct PlayerConfig {
    /// Walking speed in m/s
    pub walk_speed: f32,
    /// Sprinting speed in m/s
    pub sprint_speed: f32,
    /// Ground acceleration
    pub ground_accel: f32,
    /// Ground friction/deceleration
    pub ground_friction: f32,
    /// Air acceleration (reduced control)
    pub air_accel: f32,
    /// How quickly the character turns to face its movement (radians/s)
    pub turn_speed: f32,
    /// Jump impulse velocity
    pub jump_velocity: f32,
    /// Coyote time duration in seconds
    pub coyote_time: f32,
    /// Standing height, feet to head
    pub stand_height: f32,
    /// Collider radius
    pub radius: f32,
    /// Maximum horizontal speed (m/s), 0.0 = uncapped
    pub max_horizontal_speed: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            walk_speed: 4.0,
            sprint_speed: 7.0,
            ground_accel: 50.0,
            ground_friction: 40.0,
            air_accel: 10.0,
            turn_speed: 12.0,
            jump_velocity: 8.0,
            coyote_time: 0.15,
            stand_height: 1.8,
            radius: 0.35,
            max_horizontal_speed: 20.0,
        }
    }
}

impl PlayerConfig {
    pub fn half_height(&self) -> f32 {
        self.stand_height / 2.0
    }
}

/// Current player velocity
#[derive(Component, Default, Deref, DerefMut)]
pub struct PlayerVelocity(pub Vec3);

/// Marker: player is on the ground
#[derive(Component)]
#[component(storage = "SparseSet")]
pub struct Grounded;

/// Marker: player is sprinting
#[derive(Component)]
#[component(storage = "SparseSet")]
pub struct Sprinting;

/// Coyote time tracking
#[derive(Component, Default)]
pub struct CoyoteTime {
    /// Time since leaving ground
    pub timer: f32,
}

/// Switch for the regular movement systems.
///
/// Other controllers (ledges, cutscenes) turn this off while they drive the
/// character themselves.
#[derive(Component, Debug)]
pub struct Locomotion {
    pub enabled: bool,
}

impl Default for Locomotion {
    fn default() -> Self {
        Self { enabled: true }
    }
}
