//! Geometry utilities for curve-based calculations.

use bevy::prelude::*;

/// Reference axis that curve-following objects point along their tangent.
pub const REFERENCE_AXIS: Vec3 = Vec3::Z;

/// Reference up vector carried onto the tangent to derive normals.
pub const REFERENCE_UP: Vec3 = Vec3::Y;

/// A sampled frame on a curve: where it is, which way it runs, and how an
/// object placed there is oriented.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveFrame {
    /// Position on the curve.
    pub position: Vec3,
    /// Unit tangent in the direction of travel.
    pub tangent: Vec3,
    /// Normal obtained from [`normal_from_tangent`].
    pub normal: Vec3,
    /// Rotation mapping [`REFERENCE_AXIS`] onto the tangent.
    pub rotation: Quat,
}

impl CurveFrame {
    /// Build a frame from a position and an arbitrary-length tangent.
    pub fn new(position: Vec3, tangent: Vec3) -> Self {
        let tangent = tangent.normalize_or_zero();
        let rotation = rotation_from_tangent(tangent);
        Self {
            position,
            tangent,
            normal: rotation * REFERENCE_UP,
            rotation,
        }
    }

    /// Convert to a transform placing an object on the curve.
    pub fn to_transform(&self) -> Transform {
        Transform::from_translation(self.position).with_rotation(self.rotation)
    }
}

/// The minimal rotation taking [`REFERENCE_AXIS`] onto `tangent`.
///
/// A zero tangent yields the identity.
pub fn rotation_from_tangent(tangent: Vec3) -> Quat {
    let tangent = tangent.normalize_or_zero();
    if tangent == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    Quat::from_rotation_arc(REFERENCE_AXIS, tangent)
}

/// Normal for a unit tangent: the reference up vector carried by the minimal
/// rotation from the reference axis onto the tangent.
///
/// The field does not twist as long as the tangent varies smoothly.
pub fn normal_from_tangent(tangent: Vec3) -> Vec3 {
    rotation_from_tangent(tangent) * REFERENCE_UP
}

/// Project `point` onto the plane through `origin` with the given `normal`.
pub fn nearest_point_in_plane(origin: Vec3, normal: Vec3, point: Vec3) -> Vec3 {
    let normal = normal.normalize_or_zero();
    point - normal * normal.dot(point - origin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_for_forward_tangent_is_up() {
        let normal = normal_from_tangent(Vec3::Z);
        assert!((normal - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn test_normal_is_perpendicular() {
        for tangent in [
            Vec3::X,
            Vec3::new(1.0, 1.0, 0.0).normalize(),
            Vec3::new(0.3, -0.4, 0.866).normalize(),
            Vec3::NEG_Z,
        ] {
            let normal = normal_from_tangent(tangent);
            assert!(normal.dot(tangent).abs() < 1e-4, "{tangent:?}");
            assert!((normal.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_frame_rotation_points_reference_axis_along_tangent() {
        let frame = CurveFrame::new(Vec3::ONE, Vec3::new(0.0, 0.0, -2.0));
        assert!((frame.rotation * REFERENCE_AXIS - Vec3::NEG_Z).length() < 1e-4);
        assert!((frame.tangent - Vec3::NEG_Z).length() < 1e-6);
        assert_eq!(frame.to_transform().translation, Vec3::ONE);
    }

    #[test]
    fn test_nearest_point_in_plane() {
        let projected = nearest_point_in_plane(
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::Y,
            Vec3::new(2.0, 5.0, -1.0),
        );
        assert!((projected - Vec3::new(2.0, 1.0, -1.0)).length() < 1e-6);
    }
}
