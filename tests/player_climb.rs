//! Full host tests: physics, player locomotion and ledge climbing together,
//! with the character spawned the way a game would spawn it.

use avian3d::prelude::*;
use bevy::prelude::*;
use bevy_ledge_climb::player::JumpPressed;
use bevy_ledge_climb::prelude::*;

const FIXED_UPDATE_HZ: f64 = 60.0;

fn create_test_app() -> App {
    let mut app = App::new();

    app.add_plugins(MinimalPlugins);
    app.add_plugins(TransformPlugin);
    app.add_plugins(bevy::input::InputPlugin);
    app.add_plugins(AssetPlugin::default());
    app.init_asset::<Mesh>();
    // Insert SceneSpawner resource to satisfy Avian's ColliderHierarchyPlugin
    app.insert_resource(bevy::scene::SceneSpawner::default());
    app.add_plugins(LedgeClimbPlugin);
    app.insert_resource(Time::<Fixed>::from_hz(FIXED_UPDATE_HZ));

    app.finish();
    app.cleanup();
    app
}

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

/// A 4x3x4 ledge block whose wall faces +Z at z = -1 and whose top is at y = 3.
fn spawn_block(app: &mut App) {
    let transform = Transform::from_xyz(0.0, 1.5, -3.0);
    app.world_mut().spawn((
        transform,
        GlobalTransform::from(transform),
        RigidBody::Static,
        Collider::cuboid(4.0, 3.0, 4.0),
        CollisionLayers::new(GameLayer::Ledge, [GameLayer::Player]),
        LedgeAnchor::new(0.5, 1.9),
    ));
}

/// Spawns through the public entry point, falling just in front of the wall.
fn spawn_hero(app: &mut App) -> Entity {
    let world = app.world_mut();
    let player = spawn_player(&mut world.commands(), Vec3::new(0.0, 2.0, 0.0));
    world.flush();
    player
}

fn phase(app: &App, entity: Entity) -> ControllerState {
    app.world()
        .get::<LedgeController>(entity)
        .map(LedgeController::phase)
        .unwrap()
}

fn run_until(app: &mut App, entity: Entity, to: ControllerState, max_frames: usize) {
    for _ in 0..max_frames {
        tick(app);
        if phase(app, entity) == to {
            return;
        }
    }
    panic!("character never reached {to:?} in {max_frames} frames");
}

fn hold_move(app: &mut App, entity: Entity, value: Vec2) {
    app.world_mut()
        .get_mut::<MoveInput>(entity)
        .unwrap()
        .update(value);
}

#[test]
fn hanging_in_the_dead_zone_stays_snapped() {
    let mut app = create_test_app();
    spawn_block(&mut app);
    let player = spawn_hero(&mut app);

    run_until(&mut app, player, ControllerState::Grabbing, 30);
    run_frames(&mut app, 5);
    let snapped = *app.world().get::<Transform>(player).unwrap();

    // Too small to climb or drop, large enough to steer in the air
    hold_move(&mut app, player, Vec2::new(0.08, 0.08));
    app.world_mut().get_mut::<JumpPressed>(player).unwrap().0 = true;
    run_frames(&mut app, 60);

    assert_eq!(phase(&app, player), ControllerState::Grabbing);

    let world = app.world();
    let transform = world.get::<Transform>(player).unwrap();
    assert!(
        transform.translation.distance(snapped.translation) < 1e-4,
        "moved while hanging: {} -> {}",
        snapped.translation,
        transform.translation
    );
    assert!(transform.rotation.angle_between(snapped.rotation) < 1e-4);

    assert!(!world.get::<Locomotion>(player).unwrap().enabled);
    assert_eq!(world.get::<PlayerVelocity>(player).unwrap().0, Vec3::ZERO);
    assert!(!world.get::<JumpPressed>(player).unwrap().0);
}

#[test]
fn locomotion_resumes_grounded_after_climbing() {
    let mut app = create_test_app();
    spawn_block(&mut app);
    let player = spawn_hero(&mut app);
    // Finish well clear of the wall edge
    app.world_mut().entity_mut(player).insert(LedgeConfig {
        forward_climb_offset: 1.0,
        ..default()
    });

    run_until(&mut app, player, ControllerState::Grabbing, 30);
    hold_move(&mut app, player, Vec2::Y);
    run_until(&mut app, player, ControllerState::Idle, 90);
    run_frames(&mut app, 10);

    assert_eq!(phase(&app, player), ControllerState::Idle);

    let world = app.world();
    assert!(world.get::<Locomotion>(player).unwrap().enabled);
    assert!(
        world.get::<Grounded>(player).is_some(),
        "ground check should agree with the forced grounding"
    );
    assert_eq!(*world.get::<RigidBody>(player).unwrap(), RigidBody::Dynamic);

    let transform = world.get::<Transform>(player).unwrap();
    let feet = transform.translation - Vec3::Y * PlayerConfig::default().half_height();
    assert!((feet.y - 3.0).abs() < 0.05, "should stand on the ledge, got {feet}");
    assert!(feet.z < -1.2, "should stand past the edge, got {feet}");
}

#[test]
fn spawned_player_collides_with_world_and_ledges_only() {
    let mut app = create_test_app();
    let player = spawn_hero(&mut app);

    let layers = app.world().get::<CollisionLayers>(player).unwrap();
    assert_eq!(layers.memberships, LayerMask::from(GameLayer::Player));
    assert_eq!(
        layers.filters,
        LayerMask::from([GameLayer::World, GameLayer::Ledge])
    );
}
