use bevy::prelude::*;

use crate::spline::{wrap_unit, CurveVersionStamp};

use super::physics::{FollowerPhysics, MotionState};

/// Default distance between cars of a coaster train.
pub const DEFAULT_SPACING: f32 = 0.25;

/// Default number of cars in a train.
pub const DEFAULT_CAR_COUNT: usize = 5;

/// Current state of a coaster follower.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Default)]
pub enum FollowerState {
    /// Follower is riding.
    #[default]
    Playing,
    /// Follower is held in place.
    Paused,
}

/// Component that makes an entity ride a track curve under gravity.
///
/// The entity's [`Transform`], if any, is placed on the curve each frame with
/// its +Z axis along the direction of travel. The curve is expected to share
/// the follower's parent space.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component, Default)]
pub struct CoasterFollower {
    /// The curve entity to ride.
    pub curve: Entity,

    /// Current arc length parameter on the curve, in [0, 1).
    pub t: f32,

    /// Current speed in world units per 16 ms reference frame.
    pub speed: f32,

    /// Distance between consecutive cars; also sets the terminal velocity.
    pub spacing: f32,

    /// Number of cars in the train.
    pub car_count: usize,

    /// Current playback state.
    pub state: FollowerState,

    /// Curve length as of `seen`.
    #[reflect(ignore)]
    pub(crate) curve_length: f32,

    #[reflect(ignore)]
    pub(crate) seen: CurveVersionStamp,
}

impl Default for CoasterFollower {
    fn default() -> Self {
        Self {
            curve: Entity::PLACEHOLDER,
            t: 0.0,
            speed: 0.0,
            spacing: DEFAULT_SPACING,
            car_count: DEFAULT_CAR_COUNT,
            state: FollowerState::Playing,
            curve_length: 0.0,
            seen: CurveVersionStamp::default(),
        }
    }
}

impl CoasterFollower {
    /// Create a new follower for the given curve.
    pub fn new(curve: Entity) -> Self {
        Self {
            curve,
            ..default()
        }
    }

    /// Set the car spacing.
    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    /// Set the starting position, wrapped into [0, 1).
    pub fn with_start_t(mut self, t: f32) -> Self {
        self.t = wrap_unit(t);
        self
    }

    /// Set the starting speed.
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed.max(0.0);
        self
    }

    /// Set the number of cars.
    pub fn with_car_count(mut self, car_count: usize) -> Self {
        self.car_count = car_count;
        self
    }

    /// Terminal velocity under the given physics.
    pub fn terminal_velocity(&self, physics: &FollowerPhysics) -> f32 {
        physics.terminal_velocity(self.spacing)
    }

    /// Curve length the follower last synced with.
    pub fn curve_length(&self) -> f32 {
        self.curve_length
    }

    /// Progress and speed.
    pub fn motion(&self) -> MotionState {
        MotionState {
            t: self.t,
            speed: self.speed,
        }
    }

    /// Arc length parameter of car `index`, for a curve of the given length.
    ///
    /// The train is centred on `t`: the middle car sits at `t`, the others
    /// `spacing` apart behind and ahead of it.
    pub fn car_parameter(&self, index: usize, curve_length: f32) -> f32 {
        if curve_length <= 0.0 {
            return self.t;
        }
        let offset = index as f32 - (self.car_count / 2) as f32;
        wrap_unit(self.t + offset * self.spacing / curve_length)
    }

    /// Arc length parameters of every car, rear first.
    pub fn car_parameters(&self, curve_length: f32) -> Vec<f32> {
        (0..self.car_count)
            .map(|i| self.car_parameter(i, curve_length))
            .collect()
    }

    /// Start or resume riding.
    pub fn play(&mut self) {
        self.state = FollowerState::Playing;
    }

    /// Hold in place.
    pub fn pause(&mut self) {
        self.state = FollowerState::Paused;
    }

    /// Back to the start of the track, at rest.
    pub fn reset(&mut self) {
        self.t = 0.0;
        self.speed = 0.0;
        self.state = FollowerState::Playing;
    }

    /// Check if the follower is currently riding.
    pub fn is_playing(&self) -> bool {
        self.state == FollowerState::Playing
    }
}

/// One car of a coaster train, placed on the curve behind or ahead of its
/// follower.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct FollowerCar {
    /// The entity with the [`CoasterFollower`] component.
    pub follower: Entity,
    /// Position in the train, 0 being the rearmost car.
    pub index: usize,
}

impl FollowerCar {
    /// Create a car for the given follower.
    pub fn new(follower: Entity, index: usize) -> Self {
        Self { follower, index }
    }
}

/// Message written when a follower completes a lap.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowerLapped {
    /// The entity with the [`CoasterFollower`] component.
    pub follower: Entity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let follower = CoasterFollower::default();
        assert_eq!(follower.spacing, 0.25);
        assert_eq!(follower.t, 0.0);
        assert!((follower.terminal_velocity(&FollowerPhysics::default()) - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_start_t_stays_below_one() {
        let follower = CoasterFollower::default().with_start_t(-1e-9);
        assert!((0.0..1.0).contains(&follower.t), "t {}", follower.t);

        let follower = CoasterFollower::default().with_start_t(1.25);
        assert!((follower.t - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_cars_centred_on_t() {
        let follower = CoasterFollower::default().with_start_t(0.5);
        let params = follower.car_parameters(10.0);

        assert_eq!(params.len(), 5);
        assert!((params[2] - 0.5).abs() < 1e-6);
        assert!((params[0] - 0.45).abs() < 1e-5);
        assert!((params[4] - 0.55).abs() < 1e-5);
    }

    #[test]
    fn test_cars_wrap_around_start() {
        let follower = CoasterFollower::default();
        let params = follower.car_parameters(10.0);
        assert!((params[0] - 0.95).abs() < 1e-5);
        assert!(params.iter().all(|p| (0.0..1.0).contains(p)));
    }

    #[test]
    fn test_start_t_wraps() {
        let follower = CoasterFollower::default().with_start_t(1.25);
        assert!((follower.t - 0.25).abs() < 1e-6);
    }
}
