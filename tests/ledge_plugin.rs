//! Integration tests for the ledge plugin with Avian3D.
//!
//! A real physics world provides the ray casts and collider bounds; the
//! character's locomotion systems are left out so nothing but the ledge
//! controller moves it.

use avian3d::prelude::*;
use bevy::ecs::system::RunSystemOnce;
use bevy::prelude::*;
use bevy_ledge_climb::ledge::{LedgeQuery, RayProbe, SpatialRayProbe};
use bevy_ledge_climb::player::{CoyoteTime, JumpPressed, SprintInput};
use bevy_ledge_climb::prelude::*;

const FIXED_UPDATE_HZ: f64 = 60.0;

/// Create a minimal test app with physics and the ledge plugin.
fn create_test_app() -> App {
    let mut app = App::new();

    app.add_plugins(MinimalPlugins);
    app.add_plugins(TransformPlugin);
    app.add_plugins(AssetPlugin::default());
    app.init_asset::<Mesh>();
    // Insert SceneSpawner resource to satisfy Avian's ColliderHierarchyPlugin
    app.insert_resource(bevy::scene::SceneSpawner::default());
    app.add_plugins(PhysicsPlugins::default().with_length_unit(1.0));
    app.add_plugins(LedgePlugin);
    app.insert_resource(Time::<Fixed>::from_hz(FIXED_UPDATE_HZ));

    app.finish();
    app.cleanup();
    app
}

/// Advance time by one fixed timestep and run one update.
fn tick(app: &mut App) {
    let timestep = std::time::Duration::from_secs_f64(1.0 / FIXED_UPDATE_HZ);
    app.world_mut()
        .resource_mut::<Time<Virtual>>()
        .advance_by(timestep);
    app.update();
}

fn run_frames(app: &mut App, frames: usize) {
    for _ in 0..frames {
        tick(app);
    }
}

/// A 4x3x4 block whose wall faces +Z at z = -1 and whose top is at y = 3.
fn spawn_block(app: &mut App, anchor: Option<LedgeAnchor>) -> Entity {
    let transform = Transform::from_xyz(0.0, 1.5, -3.0);
    let mut block = app.world_mut().spawn((
        transform,
        GlobalTransform::from(transform),
        RigidBody::Static,
        Collider::cuboid(4.0, 3.0, 4.0),
        CollisionLayers::new(GameLayer::Ledge, [GameLayer::Player]),
    ));
    if let Some(anchor) = anchor {
        block.insert(anchor);
    }
    block.id()
}

/// An airborne character facing -Z, head just below the block top.
fn spawn_climber(app: &mut App) -> Entity {
    let config = PlayerConfig::default();
    let transform = Transform::from_xyz(0.0, 0.9 + config.half_height(), 0.0);

    app.world_mut()
        .spawn((
            transform,
            GlobalTransform::from(transform),
            RigidBody::Dynamic,
            Collider::capsule(config.radius, config.stand_height - config.radius * 2.0),
            CollisionLayers::new(GameLayer::Player, [GameLayer::World, GameLayer::Ledge]),
            LockedAxes::ROTATION_LOCKED,
            LinearVelocity::default(),
            GravityScale(0.0),
            config,
        ))
        .insert((
            LedgeController::default(),
            LedgeConfig::default(),
            AnimationSignals::ledge(),
            Locomotion::default(),
            PlayerVelocity::default(),
            CoyoteTime::default(),
            MoveInput::default(),
            JumpPressed::default(),
            SprintInput::default(),
        ))
        .id()
}

fn phase(app: &App, entity: Entity) -> ControllerState {
    app.world()
        .get::<LedgeController>(entity)
        .map(LedgeController::phase)
        .unwrap()
}

fn hold_move(app: &mut App, entity: Entity, value: Vec2) {
    app.world_mut()
        .get_mut::<MoveInput>(entity)
        .unwrap()
        .update(value);
}

/// Runs until the character leaves `from`, or panics after `max_frames`.
fn run_until_not(app: &mut App, entity: Entity, from: ControllerState, max_frames: usize) {
    for _ in 0..max_frames {
        tick(app);
        if phase(app, entity) != from {
            return;
        }
    }
    panic!("character stayed {from:?} for {max_frames} frames");
}

#[test]
fn spatial_probe_reports_anchor_and_top() {
    let mut app = create_test_app();
    let block = spawn_block(&mut app, Some(LedgeAnchor::new(0.5, 1.9)));
    run_frames(&mut app, 2);

    let hit = app
        .world_mut()
        .run_system_once(|spatial_query: SpatialQuery, ledges: LedgeQuery| {
            let probe = SpatialRayProbe {
                spatial_query: &spatial_query,
                ledges: &ledges,
                exclude: Entity::PLACEHOLDER,
            };
            probe.probe(
                Vec3::new(0.0, 2.7, 0.0),
                Dir3::NEG_Z,
                1.5,
                GameLayer::Ledge.into(),
            )
        })
        .unwrap()
        .expect("ray should hit the block wall");

    assert!(hit.point.distance(Vec3::new(0.0, 2.7, -1.0)) < 1e-3);
    assert!(hit.normal.dot(Vec3::Z) > 0.99);

    let surface = hit.surface.expect("anchored block should be a ledge");
    assert_eq!(surface.entity, block);
    assert_eq!(surface.anchor, LedgeAnchor::new(0.5, 1.9));
    assert!((surface.top - 3.0).abs() < 1e-2);
}

#[test]
fn airborne_character_grabs_anchored_ledge() {
    let mut app = create_test_app();
    let block = spawn_block(&mut app, Some(LedgeAnchor::new(0.5, 1.9)));
    let character = spawn_climber(&mut app);

    run_until_not(&mut app, character, ControllerState::Idle, 30);
    assert_eq!(phase(&app, character), ControllerState::Grabbing);

    let controller = app.world().get::<LedgeController>(character).unwrap();
    assert_eq!(controller.current_ledge().map(|l| l.entity), Some(block));
    assert!((controller.current_ledge().unwrap().top - 3.0).abs() < 1e-2);

    // Hang: feet at top - vertical offset, half a metre out from the wall
    let transform = app.world().get::<Transform>(character).unwrap();
    let feet = transform.translation - Vec3::Y * PlayerConfig::default().half_height();
    assert!(
        feet.distance(Vec3::new(0.0, 1.1, -0.5)) < 0.05,
        "unexpected hang position {feet}"
    );

    let forward = transform.forward().as_vec3();
    assert!(forward.dot(Vec3::NEG_Z) > 0.99, "should face the wall, got {forward}");

    assert!(!app.world().get::<Locomotion>(character).unwrap().enabled);
    assert!(app.world().get::<AnimationSignals>(character).unwrap().is_on("hang"));
}

#[test]
fn geometry_without_anchor_is_ignored() {
    let mut app = create_test_app();
    spawn_block(&mut app, None);
    let character = spawn_climber(&mut app);

    run_frames(&mut app, 20);

    assert_eq!(phase(&app, character), ControllerState::Idle);
    assert!(app.world().get::<Locomotion>(character).unwrap().enabled);
}

#[test]
fn grounded_character_does_not_grab() {
    let mut app = create_test_app();
    spawn_block(&mut app, Some(LedgeAnchor::new(0.5, 1.9)));
    let character = spawn_climber(&mut app);
    app.world_mut().entity_mut(character).insert(Grounded);

    run_frames(&mut app, 20);

    assert_eq!(phase(&app, character), ControllerState::Idle);
}

#[test]
fn climb_ends_standing_on_ledge() {
    let mut app = create_test_app();
    spawn_block(&mut app, Some(LedgeAnchor::new(0.5, 1.9)));
    let character = spawn_climber(&mut app);
    run_until_not(&mut app, character, ControllerState::Idle, 30);

    hold_move(&mut app, character, Vec2::Y);
    tick(&mut app);
    assert_eq!(phase(&app, character), ControllerState::Climbing);
    assert_eq!(
        *app.world().get::<RigidBody>(character).unwrap(),
        RigidBody::Kinematic
    );
    let signals = app.world().get::<AnimationSignals>(character).unwrap();
    assert!(signals.is_on("climb"));
    assert!(!signals.is_on("hang"));

    // One second of climbing at 60 Hz, plus slack
    run_until_not(&mut app, character, ControllerState::Climbing, 75);
    assert_eq!(phase(&app, character), ControllerState::Idle);

    let world = app.world();
    let transform = world.get::<Transform>(character).unwrap();
    let feet = transform.translation - Vec3::Y * PlayerConfig::default().half_height();
    assert!((feet.y - 3.0).abs() < 0.05, "feet should be on the ledge top, got {feet}");
    assert!(feet.z < -0.9, "should have moved onto the ledge, got {feet}");

    assert!(world.get::<Locomotion>(character).unwrap().enabled);
    assert!(world.get::<Grounded>(character).is_some());
    assert_eq!(*world.get::<RigidBody>(character).unwrap(), RigidBody::Dynamic);
    assert_eq!(world.get::<MoveInput>(character).unwrap().value(), Vec2::ZERO);

    let signals = world.get::<AnimationSignals>(character).unwrap();
    assert!(!signals.is_on("climb"));
    assert!(!signals.is_on("hang"));
}

#[test]
fn backward_input_drops_and_restores_locomotion() {
    let mut app = create_test_app();
    spawn_block(&mut app, Some(LedgeAnchor::new(0.5, 1.9)));
    let character = spawn_climber(&mut app);
    run_until_not(&mut app, character, ControllerState::Idle, 30);

    hold_move(&mut app, character, Vec2::NEG_Y);
    tick(&mut app);

    assert_eq!(phase(&app, character), ControllerState::Idle);
    let world = app.world();
    assert!(world.get::<Locomotion>(character).unwrap().enabled);
    assert!(!world.get::<AnimationSignals>(character).unwrap().is_on("hang"));
}
