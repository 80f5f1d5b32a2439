use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy_coaster_spline::path_follow::advance_followers;
use bevy_coaster_spline::prelude::*;

fn app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(CoasterFollowPlugin)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(16)));
    app
}

/// A closed loop that starts high and drops toward the far side.
fn spawn_hill(app: &mut App) -> Entity {
    let curve = app
        .world_mut()
        .spawn((TrackCurve::closed(), Transform::default()))
        .id();
    for (i, p) in [
        Vec3::new(0.0, 3.0, 0.0),
        Vec3::new(4.0, 1.5, 0.0),
        Vec3::new(4.0, 0.0, 4.0),
        Vec3::new(0.0, 1.5, 4.0),
    ]
    .into_iter()
    .enumerate()
    {
        app.world_mut()
            .spawn((CurvePoint::new(curve, i as u32), Transform::from_translation(p)));
    }
    curve
}

/// it should carry a follower downhill from rest without exceeding terminal velocity
#[test]
fn follower_rides_downhill() {
    let mut app = app();
    let curve = spawn_hill(&mut app);
    let cart = app
        .world_mut()
        .spawn((CoasterFollower::new(curve), Transform::default()))
        .id();

    for _ in 0..30 {
        app.update();
    }

    let physics = *app.world().resource::<FollowerPhysics>();
    let follower = app.world().get::<CoasterFollower>(cart).unwrap();
    assert!(follower.t > 0.0 && follower.t < 1.0, "t {}", follower.t);
    assert!(follower.speed > physics.min_speed, "speed {}", follower.speed);
    assert!(follower.speed <= follower.terminal_velocity(&physics));
    assert!(follower.curve_length() > 0.0);

    // The cart sits on the curve at its progress
    let track = app.world().get::<TrackCurve>(curve).unwrap();
    let expected = track.point_at_arc_length(follower.t).unwrap();
    let transform = app.world().get::<Transform>(cart).unwrap();
    assert!((transform.translation - expected).length() < 1e-4);
}

/// it should place each car of the train around the follower
#[test]
fn cars_trail_the_follower() {
    let mut app = app();
    let curve = spawn_hill(&mut app);
    let cart = app
        .world_mut()
        .spawn((CoasterFollower::new(curve).with_start_t(0.5), Transform::default()))
        .id();
    let cars: Vec<Entity> = (0..DEFAULT_CAR_COUNT)
        .map(|i| {
            app.world_mut()
                .spawn((FollowerCar::new(cart, i), Transform::default()))
                .id()
        })
        .collect();

    app.update();
    app.update();

    let follower = app.world().get::<CoasterFollower>(cart).unwrap();
    let track = app.world().get::<TrackCurve>(curve).unwrap();
    let length = track.length().unwrap();

    let middle = app.world().get::<Transform>(cars[2]).unwrap();
    let cart_transform = app.world().get::<Transform>(cart).unwrap();
    assert!((middle.translation - cart_transform.translation).length() < 1e-4);

    for pair in cars.windows(2) {
        let a = app.world().get::<Transform>(pair[0]).unwrap().translation;
        let b = app.world().get::<Transform>(pair[1]).unwrap().translation;
        // Chords are a little shorter than the arc between cars
        let gap = a.distance(b);
        assert!(gap > follower.spacing * 0.9 && gap <= follower.spacing + 1e-3, "gap {gap}");
    }
    assert!(length > 0.0);
}

/// it should wait for the curve to be ready before moving
#[test]
fn follower_waits_for_curve() {
    let mut app = app();
    let curve = app
        .world_mut()
        .spawn((TrackCurve::closed(), Transform::default()))
        .id();
    app.world_mut()
        .spawn((CurvePoint::new(curve, 0), Transform::default()));
    let cart = app
        .world_mut()
        .spawn(CoasterFollower::new(curve).with_start_t(0.25))
        .id();

    for _ in 0..5 {
        app.update();
    }

    let follower = app.world().get::<CoasterFollower>(cart).unwrap();
    assert_eq!(follower.t, 0.25);
    assert_eq!(follower.speed, 0.0);
}

/// it should keep other followers running when one curve goes away
#[test]
fn removing_a_curve_only_stops_its_followers() {
    let mut app = app();
    let kept = spawn_hill(&mut app);
    let removed = spawn_hill(&mut app);
    let a = app.world_mut().spawn(CoasterFollower::new(kept)).id();
    let b = app.world_mut().spawn(CoasterFollower::new(removed)).id();

    app.update();
    app.update();
    app.world_mut().despawn(removed);

    let a_before = app.world().get::<CoasterFollower>(a).unwrap().t;
    let b_before = app.world().get::<CoasterFollower>(b).unwrap().t;
    for _ in 0..5 {
        app.update();
    }

    assert!(app.world().get::<CoasterFollower>(a).unwrap().t != a_before);
    assert_eq!(app.world().get::<CoasterFollower>(b).unwrap().t, b_before);
}

/// it should announce laps
#[test]
fn follower_announces_laps() {
    #[derive(Resource, Default)]
    struct Laps(usize);

    fn count(mut laps: ResMut<Laps>, mut messages: MessageReader<FollowerLapped>) {
        laps.0 += messages.read().count();
    }

    let mut app = app();
    app.init_resource::<Laps>()
        .add_systems(Update, count.after(advance_followers));
    let curve = spawn_hill(&mut app);
    app.world_mut().spawn(
        CoasterFollower::new(curve)
            .with_start_t(0.999)
            .with_speed(0.05),
    );

    app.update();
    app.update();
    app.update();

    assert_eq!(app.world().resource::<Laps>().0, 1);
}
