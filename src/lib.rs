//! # bevy_coaster_spline
//!
//! A Bevy plugin for roller coaster tracks built from placed waypoints.
//!
//! ## Features
//!
//! - Catmull-Rom track curves (open or closed, with tension) through ordered control points
//! - Uniform-speed queries through an arc length table sampled every centimetre
//! - Closest point queries and automatic alignment of waypoint objects to the track
//! - Gravity-driven coaster trains with terminal velocity and friction
//! - Lazy, coalesced recomputation with change messages and a version counter
//!
//! ## Quick Start
//!
//! ```ignore
//! use bevy::prelude::*;
//! use bevy_coaster_spline::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(CurvePlugin)
//!         .add_plugins(CoasterFollowPlugin)  // Optional: adds coaster trains
//!         .add_systems(Startup, setup)
//!         .run();
//! }
//!
//! fn setup(mut commands: Commands) {
//!     let track = commands.spawn((TrackCurve::closed(), Transform::default())).id();
//!
//!     for (i, p) in [
//!         Vec3::new(-3.0, 2.0, 0.0),
//!         Vec3::new(0.0, 0.5, -3.0),
//!         Vec3::new(3.0, 1.0, 0.0),
//!         Vec3::new(0.0, 0.0, 3.0),
//!     ]
//!     .into_iter()
//!     .enumerate()
//!     {
//!         commands.spawn((CurvePoint::new(track, i as u32), Transform::from_translation(p)));
//!     }
//!
//!     commands.spawn((CoasterFollower::new(track), Transform::default()));
//! }
//! ```
//!
//! ## Plugins
//!
//! - [`CurvePlugin`]: Keeps track curves in sync with their points (required)
//! - [`CoasterFollowPlugin`]: Rides followers along curves under gravity (optional)
//!
//! ## Queries
//!
//! Every query on a [`spline::TrackCurve`] returns [`CurveError::NotReady`]
//! until the curve has been built from at least two points:
//!
//! ```ignore
//! fn report(tracks: Query<&TrackCurve>) {
//!     for track in &tracks {
//!         match track.closest_point(Vec3::ZERO) {
//!             Ok(hit) => info!("nearest at s = {:.3}", hit.parameter),
//!             Err(err) => debug!("{err}"),
//!         }
//!     }
//! }
//! ```

pub mod error;
pub mod geometry;
pub mod path_follow;
pub mod spline;

pub use error::CurveError;
pub use path_follow::CoasterFollowPlugin;
pub use spline::CurvePlugin;

/// Convenient re-exports of commonly used types.
pub mod prelude {
    pub use crate::error::CurveError;
    pub use crate::geometry::{normal_from_tangent, CurveFrame};
    pub use crate::path_follow::{
        CoasterFollowPlugin, CoasterFollower, FollowerCar, FollowerLapped, FollowerPhysics,
        FollowerState, DEFAULT_CAR_COUNT,
    };
    pub use crate::spline::{
        closest_point, ClosestPoint, ControlPoint, Curve, CurvePlugin, CurvePoint, CurveShifted,
        CurveSuspended, CurveSystems, CurveType, CurveUpdated, CurveVersionStamp, TrackCurve,
    };
}
