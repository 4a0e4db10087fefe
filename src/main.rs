use avian3d::prelude::*;
use bevy::prelude::*;
use bevy_ledge_climb::prelude::*;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Ledge Climb".into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins((LedgeClimbPlugin, LedgeDebugPlugin))
        .add_systems(Startup, setup_scene)
        .add_systems(Update, (follow_player, log_ledge_messages))
        .run();
}

/// Marker for the chase camera
#[derive(Component)]
struct ChaseCamera;

fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let ground_material = materials.add(Color::srgb(0.3, 0.35, 0.3));
    let ledge_material = materials.add(Color::srgb(0.55, 0.45, 0.35));

    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(40.0, 1.0, 40.0))),
        MeshMaterial3d(ground_material),
        Transform::from_xyz(0.0, -0.5, 0.0),
        RigidBody::Static,
        Collider::cuboid(40.0, 1.0, 40.0),
        CollisionLayers::new(GameLayer::World, [GameLayer::Player]),
    ));

    // Blocks of increasing height, each one a ledge
    for (i, height) in [2.2_f32, 2.8, 3.4].into_iter().enumerate() {
        let x = -6.0 + i as f32 * 6.0;
        commands.spawn((
            Mesh3d(meshes.add(Cuboid::new(4.0, height, 4.0))),
            MeshMaterial3d(ledge_material.clone()),
            Transform::from_xyz(x, height / 2.0, -6.0),
            RigidBody::Static,
            Collider::cuboid(4.0, height, 4.0),
            CollisionLayers::new(GameLayer::Ledge, [GameLayer::Player]),
            LedgeAnchor::new(0.45, 1.9),
        ));
    }

    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 10.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn((
        ChaseCamera,
        Camera3d::default(),
        Transform::from_xyz(0.0, 5.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    spawn_player(&mut commands, Vec3::new(0.0, 1.0, 0.0));
}

fn follow_player(
    player: Query<&Transform, With<Player>>,
    mut camera: Query<&mut Transform, (With<ChaseCamera>, Without<Player>)>,
    time: Res<Time>,
) {
    let (Ok(player), Ok(mut camera)) = (player.single(), camera.single_mut()) else {
        return;
    };

    let target = player.translation + Vec3::new(0.0, 4.0, 8.0);
    let t = (4.0 * time.delta_secs()).min(1.0);
    camera.translation = camera.translation.lerp(target, t);
    camera.look_at(player.translation + Vec3::Y, Vec3::Y);
}

fn log_ledge_messages(mut reader: MessageReader<LedgeMessage>) {
    for message in reader.read() {
        info!("{:?}: {:?}", message.character, message.transition);
    }
}
