//! Coaster plugin for riding entities along track curves under gravity.
//!
//! A [`CoasterFollower`] keeps a progress parameter and a speed. Each frame it
//! moves forward by its speed, speeds up on descents, slows down on climbs and
//! loses a little to friction. Its speed is capped at a terminal velocity
//! derived from the spacing between cars.
//!
//! # Example
//!
//! ```rust,ignore
//! use bevy::prelude::*;
//! use bevy_coaster_spline::prelude::*;
//!
//! fn setup(mut commands: Commands) {
//!     let track = commands.spawn((TrackCurve::closed(), Transform::default())).id();
//!     for (i, p) in [
//!         Vec3::new(0.0, 2.0, 0.0),
//!         Vec3::new(4.0, 0.5, 0.0),
//!         Vec3::new(4.0, 1.0, 4.0),
//!         Vec3::new(0.0, 0.0, 4.0),
//!     ]
//!     .into_iter()
//!     .enumerate()
//!     {
//!         commands.spawn((CurvePoint::new(track, i as u32), Transform::from_translation(p)));
//!     }
//!
//!     let cart = commands.spawn((CoasterFollower::new(track), Transform::default())).id();
//!     for index in 0..DEFAULT_CAR_COUNT {
//!         commands.spawn((FollowerCar::new(cart, index), Transform::default()));
//!     }
//! }
//! ```

mod components;
mod physics;
mod systems;

pub use components::*;
pub use physics::*;
pub use systems::{advance_followers, place_follower_cars};

use bevy::prelude::*;

use crate::spline::{CurvePlugin, CurveSystems};

/// Plugin that lets entities ride track curves.
///
/// Add [`CoasterFollower`] components to the entities that should ride and
/// [`FollowerCar`] components to the cars trailing them. Followers always read
/// curves after [`CurveSystems::Recompute`] has run for the frame.
pub struct CoasterFollowPlugin;

impl Plugin for CoasterFollowPlugin {
    fn build(&self, app: &mut App) {
        // Ensure CurvePlugin is added
        if !app.is_plugin_added::<CurvePlugin>() {
            app.add_plugins(CurvePlugin);
        }

        app.init_resource::<FollowerPhysics>()
            .register_type::<FollowerPhysics>()
            .register_type::<CoasterFollower>()
            .register_type::<FollowerState>()
            .register_type::<FollowerCar>()
            .add_message::<FollowerLapped>()
            .add_systems(
                Update,
                (systems::advance_followers, systems::place_follower_cars)
                    .chain()
                    .after(CurveSystems::Recompute),
            );
    }
}
