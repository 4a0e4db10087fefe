mod anchor;
mod bridge;
mod collaborators;
mod controller;
mod plugin;
mod probe;
mod signals;
mod systems;

pub use anchor::{LedgeAnchor, LedgeSurface};
pub use collaborators::{
    signal_best_effort, AnimationSignalError, AnimationSink, CharacterBody, LedgeSignal,
    LocomotionGate, MovementInput,
};
pub use controller::{
    ClimbTransition, ControllerState, LedgeConfig, LedgeContext, LedgeController, LedgeState,
    LedgeTransition,
};
pub use plugin::{LedgeDebugPlugin, LedgePlugin};
pub use probe::{DetectionResult, LedgeQuery, RayProbe, SpatialRayProbe};
pub use signals::AnimationSignals;
pub use systems::LedgeMessage;
