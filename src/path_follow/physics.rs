//! Gravity and friction model for coaster followers.
//!
//! Tuned for a believable ride rather than physical accuracy. Time is measured
//! in milliseconds and normalized to a 16 ms reference frame, so speeds are in
//! world units per reference frame.

use bevy::prelude::*;

use crate::spline::wrap_unit;

/// Constants of the follower motion model.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Resource, Default)]
pub struct FollowerPhysics {
    /// Longest frame gap integrated in one tick, in milliseconds.
    pub max_delta_ms: f32,
    /// Frame length speeds are expressed against, in milliseconds.
    pub reference_frame_ms: f32,
    /// Speed floor so a follower never stalls on an uphill section.
    pub min_speed: f32,
    /// Gravitational constant.
    pub gravity: f32,
    /// Cap on deceleration per unit of parameter travelled.
    pub max_deceleration: f32,
    /// Multiplicative friction per millisecond.
    pub friction: f32,
    /// Terminal velocity is the car spacing divided by this.
    pub terminal_velocity_divisor: f32,
}

impl Default for FollowerPhysics {
    fn default() -> Self {
        Self {
            max_delta_ms: 100.0,
            reference_frame_ms: 16.0,
            min_speed: 0.005,
            gravity: 9.8,
            max_deceleration: 0.133,
            friction: 0.0001,
            terminal_velocity_divisor: 5.0,
        }
    }
}

/// Progress and speed of a follower.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionState {
    /// Arc length parameter in [0, 1).
    pub t: f32,
    /// Current speed, never negative.
    pub speed: f32,
}

/// Outcome of one [`FollowerPhysics::step`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// State after the tick.
    pub state: MotionState,
    /// Parameter distance travelled.
    pub distance: f32,
    /// Whether `t` wrapped past 1.
    pub lapped: bool,
}

impl FollowerPhysics {
    /// Terminal velocity for followers with the given car spacing.
    pub fn terminal_velocity(&self, spacing: f32) -> f32 {
        spacing / self.terminal_velocity_divisor
    }

    /// Advance a follower by one tick of `delta_ms` milliseconds.
    ///
    /// `tangent_at` returns the unit tangent at an arc length parameter; only
    /// its vertical component matters. Descending sections speed the follower
    /// up, climbing ones slow it down, never below zero and never above
    /// `terminal_velocity`.
    pub fn step(
        &self,
        state: MotionState,
        curve_length: f32,
        terminal_velocity: f32,
        delta_ms: f32,
        tangent_at: impl Fn(f32) -> Vec3,
    ) -> StepOutcome {
        let delta = delta_ms.clamp(0.0, self.max_delta_ms);
        let speed = state.speed.max(self.min_speed);

        if curve_length <= 0.0 {
            return StepOutcome {
                state,
                distance: 0.0,
                lapped: false,
            };
        }

        let distance = (delta / self.reference_frame_ms) * speed / curve_length;
        let advanced = state.t + distance;
        let lapped = advanced >= 1.0;
        let t = wrap_unit(advanced);

        let tangent = tangent_at(t);
        let gravity = -0.5 * self.gravity * distance * tangent.y;
        let acceleration = (-self.max_deceleration * distance).max(gravity);
        let mut new_speed = (speed + acceleration).min(terminal_velocity);
        new_speed *= 1.0 - delta * self.friction;

        StepOutcome {
            state: MotionState {
                t,
                speed: new_speed.max(0.0),
            },
            distance,
            lapped,
        }
    }
}
