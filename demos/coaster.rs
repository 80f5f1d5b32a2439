//! Roller coaster example.
//!
//! A closed track through six waypoints with a five-car train riding it.
//!
//! Run with: `cargo run --example coaster`

use bevy::prelude::*;
use bevy_coaster_spline::prelude::*;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(CurvePlugin)
        .add_plugins(CoasterFollowPlugin)
        .add_systems(Startup, setup)
        .add_systems(
            Update,
            (
                handle_input,
                draw_track.after(CurveSystems::Recompute),
                log_curve_changes,
                log_laps,
            ),
        )
        .run();
}

#[derive(Resource)]
struct Track(Entity);

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    // Camera
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 12.0, 16.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Lighting
    commands.spawn(AmbientLight {
        color: Color::WHITE,
        brightness: 300.0,
        affects_lightmapped_meshes: true,
    });

    commands.spawn((
        DirectionalLight {
            illuminance: 10000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 8.0, 4.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    let track = commands
        .spawn((TrackCurve::closed(), Transform::default(), Visibility::default()))
        .id();
    commands.insert_resource(Track(track));

    // Waypoint flags, children of the track so their transforms are in curve space
    let flag_mesh = meshes.add(Cuboid::new(0.2, 0.6, 0.05));
    let flag_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.9, 0.8, 0.2),
        ..default()
    });
    for (i, p) in [
        Vec3::new(-6.0, 4.0, 0.0),
        Vec3::new(-2.0, 1.0, -5.0),
        Vec3::new(3.0, 2.5, -4.0),
        Vec3::new(6.0, 0.5, 0.0),
        Vec3::new(3.0, 1.5, 5.0),
        Vec3::new(-2.0, 0.5, 4.0),
    ]
    .into_iter()
    .enumerate()
    {
        commands.spawn((
            Mesh3d(flag_mesh.clone()),
            MeshMaterial3d(flag_material.clone()),
            Transform::from_translation(p),
            CurvePoint::new(track, i as u32),
            ChildOf(track),
        ));
    }

    // Train
    let car_mesh = meshes.add(Cuboid::new(0.3, 0.2, 0.22));
    let car_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.9, 0.2, 0.2),
        ..default()
    });
    let cart = commands
        .spawn((
            CoasterFollower::new(track).with_spacing(0.25),
            Transform::default(),
            ChildOf(track),
        ))
        .id();
    for index in 0..DEFAULT_CAR_COUNT {
        commands.spawn((
            Mesh3d(car_mesh.clone()),
            MeshMaterial3d(car_material.clone()),
            Transform::default(),
            FollowerCar::new(cart, index),
            ChildOf(track),
        ));
    }

    println!("\n=== Coaster Example ===");
    println!("Controls:");
    println!("  Space  - Pause/Resume the train");
    println!("  R      - Reset the train to the station");
    println!("  C      - Toggle closed/open track");
    println!("  T      - Cycle tension (0.0 / 0.25 / 0.5)");
    println!("=======================\n");
}

fn handle_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    track: Res<Track>,
    mut curves: Query<&mut TrackCurve>,
    mut followers: Query<&mut CoasterFollower>,
) {
    if keyboard.just_pressed(KeyCode::Space) {
        for mut follower in &mut followers {
            if follower.is_playing() {
                follower.pause();
            } else {
                follower.play();
            }
        }
    }

    if keyboard.just_pressed(KeyCode::KeyR) {
        for mut follower in &mut followers {
            follower.reset();
        }
    }

    let Ok(mut curve) = curves.get_mut(track.0) else {
        return;
    };

    if keyboard.just_pressed(KeyCode::KeyC) {
        let closed = !curve.is_closed();
        curve.set_closed(closed);
    }

    if keyboard.just_pressed(KeyCode::KeyT) {
        let tension = match curve.tension() {
            t if t < 0.1 => 0.25,
            t if t < 0.4 => 0.5,
            _ => 0.0,
        };
        curve.set_tension(tension);
    }
}

fn draw_track(mut gizmos: Gizmos, curves: Query<(&TrackCurve, &GlobalTransform)>) {
    for (track, global) in &curves {
        let Ok(curve) = track.curve() else {
            continue;
        };
        let count = curve.instance_count(0.1).max(2);
        let points = curve.spaced_points(count);
        for window in points.windows(2) {
            gizmos.line(
                global.transform_point(window[0]),
                global.transform_point(window[1]),
                Color::srgb(0.9, 0.3, 0.3),
            );
        }
    }
}

fn log_curve_changes(
    mut updated: MessageReader<CurveUpdated>,
    mut shifted: MessageReader<CurveShifted>,
    curves: Query<&TrackCurve>,
) {
    for message in updated.read() {
        let length = curves
            .get(message.curve)
            .ok()
            .and_then(|curve| curve.length().ok());
        println!("Track rebuilt (v{}), length {:?}", message.version, length);
    }
    for message in shifted.read() {
        println!("Track shifted (v{})", message.version);
    }
}

fn log_laps(mut laps: MessageReader<FollowerLapped>) {
    for _ in laps.read() {
        println!("Lap!");
    }
}
