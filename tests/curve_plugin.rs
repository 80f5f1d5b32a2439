use bevy::prelude::*;
use bevy_coaster_spline::prelude::*;

#[derive(Resource, Default)]
struct Seen {
    updated: Vec<CurveUpdated>,
    shifted: Vec<CurveShifted>,
}

impl Seen {
    fn clear(&mut self) {
        self.updated.clear();
        self.shifted.clear();
    }
}

fn record(
    mut seen: ResMut<Seen>,
    mut updated: MessageReader<CurveUpdated>,
    mut shifted: MessageReader<CurveShifted>,
) {
    seen.updated.extend(updated.read().copied());
    seen.shifted.extend(shifted.read().copied());
}

fn app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(CurvePlugin)
        .init_resource::<Seen>()
        .add_systems(Update, record.after(CurveSystems::Recompute));
    app
}

fn spawn_track(app: &mut App, track: TrackCurve, points: &[(u32, Vec3)]) -> (Entity, Vec<Entity>) {
    let curve = app.world_mut().spawn((track, Transform::default())).id();
    let points = points
        .iter()
        .map(|&(order, p)| {
            app.world_mut()
                .spawn((CurvePoint::new(curve, order), Transform::from_translation(p)))
                .id()
        })
        .collect();
    (curve, points)
}

fn seen(app: &App) -> &Seen {
    app.world().resource::<Seen>()
}

fn clear_seen(app: &mut App) {
    app.world_mut().resource_mut::<Seen>().clear();
}

const SQUARE: [(u32, Vec3); 4] = [
    (0, Vec3::new(0.0, 0.0, 0.0)),
    (10, Vec3::new(4.0, 0.0, 0.0)),
    (20, Vec3::new(4.0, 0.0, 4.0)),
    (30, Vec3::new(0.0, 0.0, 4.0)),
];

/// it should build a curve once enough points exist and announce it
#[test]
fn builds_and_announces_curve() {
    let mut app = app();
    let (curve, _) = spawn_track(&mut app, TrackCurve::closed(), &SQUARE);

    app.update();

    let track = app.world().get::<TrackCurve>(curve).expect("TrackCurve exists");
    assert!(track.is_ready());
    let length = track.length().unwrap();
    assert!(length > 16.0 && length < 17.0, "length {length}");

    let seen = seen(&app);
    assert_eq!(seen.updated.len(), 1);
    assert_eq!(seen.updated[0].curve, curve);
    assert!(seen.shifted.is_empty());
}

/// it should coalesce an insertion and several moves into one rebuild
#[test]
fn coalesces_changes_within_a_frame() {
    let mut app = app();
    let (curve, points) = spawn_track(&mut app, TrackCurve::closed(), &SQUARE);
    app.update();
    clear_seen(&mut app);

    // Insert a point between the first two, then move points five times
    app.world_mut().spawn((
        CurvePoint::new(curve, 5),
        Transform::from_xyz(2.0, 0.0, -1.0),
    ));
    for i in 0..5 {
        let point = points[i % points.len()];
        let mut transform = app.world_mut().get_mut::<Transform>(point).unwrap();
        transform.translation.y += 0.25;
    }

    app.update();

    let track = app.world().get::<TrackCurve>(curve).unwrap();
    assert_eq!(track.control_points().len(), 5);
    assert_eq!(track.control_points()[1].position, Vec3::new(2.0, 0.0, -1.0));

    let seen = seen(&app);
    assert_eq!(seen.updated.len(), 1);
    assert!(seen.shifted.is_empty());
}

/// it should refresh rather than rebuild when points only move
#[test]
fn moving_points_shifts_curve() {
    let mut app = app();
    let (curve, points) = spawn_track(&mut app, TrackCurve::new(), &SQUARE);
    app.update();
    let before = app.world().get::<TrackCurve>(curve).unwrap().version();
    clear_seen(&mut app);

    for &point in &points {
        let mut transform = app.world_mut().get_mut::<Transform>(point).unwrap();
        transform.translation *= 2.0;
    }
    app.update();

    let seen_now = seen(&app);
    assert!(seen_now.updated.is_empty());
    assert_eq!(seen_now.shifted.len(), 1);
    assert_eq!(seen_now.shifted[0].version, before + 1);

    // A quiet frame announces nothing
    clear_seen(&mut app);
    app.update();
    let quiet = seen(&app);
    assert!(quiet.updated.is_empty() && quiet.shifted.is_empty());
}

/// it should turn waypoint objects to face along the track after a rebuild
#[test]
fn aligns_points_to_track() {
    let mut app = app();
    let (curve, points) = spawn_track(
        &mut app,
        TrackCurve::new(),
        &[
            (0, Vec3::new(0.0, 0.0, 0.0)),
            (1, Vec3::new(4.0, 0.0, 0.0)),
            (2, Vec3::new(8.0, 0.0, 0.0)),
        ],
    );
    app.update();

    let track = app.world().get::<TrackCurve>(curve).unwrap();
    let tangent = track.closest_point(Vec3::new(4.0, 0.0, 0.0)).unwrap().tangent;

    let rotation = app.world().get::<Transform>(points[1]).unwrap().rotation;
    let forward = rotation * Vec3::NEG_Z;
    assert!(forward.dot(tangent) > 0.99, "forward {forward:?}");
    assert!((forward - Vec3::X).length() < 1e-2);
}

/// it should drop back to not ready when points are removed
#[test]
fn removing_points_tears_down() {
    let mut app = app();
    let (curve, points) = spawn_track(&mut app, TrackCurve::new(), &SQUARE);
    app.update();
    assert!(app.world().get::<TrackCurve>(curve).unwrap().is_ready());

    for &point in &points[1..] {
        app.world_mut().despawn(point);
    }
    app.update();

    let track = app.world().get::<TrackCurve>(curve).unwrap();
    assert!(!track.is_ready());
    assert_eq!(track.point_at_arc_length(0.0), Err(CurveError::NotReady));
}

/// it should suspend a curve with an unsupported type, and resume once fixed
#[test]
fn suspends_unsupported_curve_type() {
    let mut app = app();
    let (curve, _) = spawn_track(
        &mut app,
        TrackCurve::new().with_curve_type(CurveType::Line),
        &SQUARE,
    );
    app.update();

    assert!(app.world().get::<CurveSuspended>(curve).is_some());
    assert!(!app.world().get::<TrackCurve>(curve).unwrap().is_ready());
    assert!(seen(&app).updated.is_empty());

    app.world_mut()
        .get_mut::<TrackCurve>(curve)
        .unwrap()
        .set_curve_type(CurveType::CatmullRom);
    app.update();
    app.update();

    assert!(app.world().get::<CurveSuspended>(curve).is_none());
    assert!(app.world().get::<TrackCurve>(curve).unwrap().is_ready());
    assert_eq!(seen(&app).updated.len(), 1);
}

/// it should order points by their order field, not by spawn order
#[test]
fn orders_points_by_index() {
    let mut app = app();
    let (curve, _) = spawn_track(
        &mut app,
        TrackCurve::new(),
        &[
            (2, Vec3::new(8.0, 0.0, 0.0)),
            (0, Vec3::new(0.0, 0.0, 0.0)),
            (1, Vec3::new(4.0, 0.0, 0.0)),
        ],
    );
    app.update();

    let track = app.world().get::<TrackCurve>(curve).unwrap();
    assert!(track.point_at_arc_length(0.0).unwrap().length() < 1e-4);
    assert!((track.point_at_arc_length(1.0).unwrap() - Vec3::new(8.0, 0.0, 0.0)).length() < 1e-3);
    assert!((track.length().unwrap() - 8.0).abs() < 1e-2);
}
