//! Closest point queries against a built curve.
//!
//! A coarse scan over uniform arc length samples finds the neighbourhood of
//! the nearest point, then a bounded bisection narrows the parameter down to
//! the requested resolution.

use bevy::prelude::*;

use crate::geometry::normal_from_tangent;

use super::curve::Curve;

/// Number of uniform samples in the coarse scan.
pub const COARSE_SAMPLES: usize = 20;

/// Default resolution in world units; divided by the curve length to get a
/// parameter resolution.
pub const DEFAULT_RESOLUTION_DISTANCE: f32 = 0.1;

/// Hard cap on refinement iterations.
const MAX_REFINE_ITERATIONS: usize = 64;

/// Result of a closest point query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestPoint {
    /// Arc length parameter `s` of the nearest point.
    pub parameter: f32,
    /// Position of the nearest point on the curve.
    pub position: Vec3,
    /// Distance from the query point.
    pub distance: f32,
    /// Unit tangent at the nearest point.
    pub tangent: Vec3,
    /// Normal at the nearest point, see [`normal_from_tangent`].
    pub normal: Vec3,
}

/// Tuning for [`closest_point_with`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestPointOptions {
    /// Uniform samples in the coarse scan.
    pub coarse_samples: usize,
    /// Parameter resolution to stop at. `None` uses `0.1 / length`.
    pub resolution: Option<f32>,
}

impl Default for ClosestPointOptions {
    fn default() -> Self {
        Self {
            coarse_samples: COARSE_SAMPLES,
            resolution: None,
        }
    }
}

impl ClosestPointOptions {
    /// Parameter resolution for the given curve.
    pub fn resolution_for(&self, curve: &Curve) -> f32 {
        self.resolution.unwrap_or_else(|| {
            let length = curve.length();
            if length > 0.0 {
                DEFAULT_RESOLUTION_DISTANCE / length
            } else {
                1.0
            }
        })
    }
}

/// Find the point on `curve` nearest to `query` with default options.
pub fn closest_point(curve: &Curve, query: Vec3) -> ClosestPoint {
    closest_point_with(curve, query, ClosestPointOptions::default())
}

/// Find the point on `curve` nearest to `query`.
pub fn closest_point_with(curve: &Curve, query: Vec3, options: ClosestPointOptions) -> ClosestPoint {
    let samples = options.coarse_samples.max(2);
    let resolution = options.resolution_for(curve).max(f32::EPSILON);

    // Closed curves would sample the seam twice
    let last_sample = if curve.is_closed() { samples - 1 } else { samples };

    let mut best = 0.0;
    let mut best_distance = f32::INFINITY;
    for i in 0..=last_sample {
        let s = i as f32 / samples as f32;
        let distance = curve.point_at_arc_length(s).distance(query);
        if distance < best_distance {
            best = s;
            best_distance = distance;
        }
    }

    let mut step = 1.0 / samples as f32;
    for _ in 0..refine_iterations(step, resolution) {
        step *= 0.5;

        let a = curve.wrap_parameter(best + step);
        let b = curve.wrap_parameter(best - step);
        let a_distance = curve.point_at_arc_length(a).distance(query);
        let b_distance = curve.point_at_arc_length(b).distance(query);

        (best, best_distance) = match a_distance.partial_cmp(&b_distance) {
            Some(std::cmp::Ordering::Less) => (a, a_distance),
            Some(std::cmp::Ordering::Greater) => (b, b_distance),
            _ if a <= b => (a, a_distance),
            _ => (b, b_distance),
        };

        if step < resolution {
            break;
        }
    }

    let position = curve.point_at_arc_length(best);
    let tangent = curve.tangent_at_arc_length(best);
    ClosestPoint {
        parameter: best,
        position,
        distance: best_distance,
        tangent,
        normal: normal_from_tangent(tangent),
    }
}

/// Iterations needed to halve `step` below `resolution`.
fn refine_iterations(step: f32, resolution: f32) -> usize {
    let ratio = (step / resolution).max(1.0);
    (ratio.log2().ceil() as usize + 1).min(MAX_REFINE_ITERATIONS)
}
