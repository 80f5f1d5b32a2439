//! Orient control point objects so they face along the curve.

use bevy::prelude::*;

use crate::geometry::nearest_point_in_plane;

use super::closest_point::closest_point;
use super::components::ControlPoint;
use super::curve::Curve;

/// Distance ahead along the tangent used as the look-at target.
pub const ALIGNMENT_LOOK_AHEAD: f32 = 1.0;

/// Corrective rotation for an object at `position` with `orientation`.
///
/// The object's forward axis (-Z) is turned toward a point just ahead on the
/// curve, projected into the object's own horizontal plane so it does not
/// pitch. Only the forward axis is corrected; roll is not preserved.
/// Pre-multiply the result onto `orientation`.
pub fn align_point(curve: &Curve, position: Vec3, orientation: Quat) -> Quat {
    let nearest = closest_point(curve, position);
    let target = position + nearest.tangent * ALIGNMENT_LOOK_AHEAD;

    let up = orientation * Vec3::Y;
    let direction = (nearest_point_in_plane(position, up, target) - position).normalize_or_zero();
    if direction == Vec3::ZERO {
        return Quat::IDENTITY;
    }

    let forward = (orientation * Vec3::NEG_Z).normalize_or_zero();
    if forward == Vec3::ZERO {
        return Quat::IDENTITY;
    }

    Quat::from_rotation_arc(forward, direction)
}

/// Corrective rotations for every point in a snapshot, keyed by point entity.
pub fn align_points(curve: &Curve, points: &[ControlPoint]) -> Vec<(Entity, Quat)> {
    points
        .iter()
        .map(|point| (point.id, align_point(curve, point.position, point.orientation)))
        .collect()
}
