use bevy::prelude::*;

use crate::spline::{CurveSuspended, TrackCurve};

use super::{CoasterFollower, FollowerCar, FollowerLapped, FollowerPhysics};

/// System that advances all coaster followers.
///
/// Followers whose curve is gone, suspended or not built yet sit out the tick.
pub fn advance_followers(
    mut followers: Query<(Entity, &mut CoasterFollower, Option<&mut Transform>)>,
    curves: Query<&TrackCurve, Without<CurveSuspended>>,
    physics: Res<FollowerPhysics>,
    time: Res<Time>,
    mut lapped: MessageWriter<FollowerLapped>,
) {
    let delta_ms = time.delta_secs() * 1000.0;

    for (entity, mut follower, transform) in &mut followers {
        if !follower.is_playing() {
            continue;
        }

        let Ok(track) = curves.get(follower.curve) else {
            continue;
        };

        let curve = match track.curve() {
            Ok(curve) => curve,
            Err(err) => {
                trace!("Follower {entity:?} waiting: {err}");
                continue;
            }
        };

        if follower.seen.is_stale(track) {
            follower.curve_length = curve.length();
            follower.seen.mark_seen(track);
        }

        let outcome = physics.step(
            follower.motion(),
            follower.curve_length,
            follower.terminal_velocity(&physics),
            delta_ms,
            |s| curve.tangent_at_arc_length(s),
        );

        follower.t = outcome.state.t;
        follower.speed = outcome.state.speed;

        if outcome.lapped {
            lapped.write(FollowerLapped { follower: entity });
        }

        if let Some(mut transform) = transform {
            let frame = curve.frame_at_arc_length(follower.t);
            transform.translation = frame.position;
            transform.rotation = frame.rotation;
        }
    }
}

/// System that places every car of a train on the curve around its follower.
pub fn place_follower_cars(
    mut cars: Query<(&FollowerCar, &mut Transform), Without<CoasterFollower>>,
    followers: Query<&CoasterFollower>,
    curves: Query<&TrackCurve, Without<CurveSuspended>>,
) {
    for (car, mut transform) in &mut cars {
        let Ok(follower) = followers.get(car.follower) else {
            continue;
        };
        if car.index >= follower.car_count {
            continue;
        }
        let Ok(track) = curves.get(follower.curve) else {
            continue;
        };
        let Ok(curve) = track.curve() else {
            continue;
        };

        let s = follower.car_parameter(car.index, curve.length());
        let frame = curve.frame_at_arc_length(s);
        transform.translation = frame.position;
        transform.rotation = frame.rotation;
    }
}
