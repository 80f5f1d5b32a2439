use bevy::prelude::*;

use crate::error::CurveError;
use crate::geometry::CurveFrame;

use super::arc_length::ArcLengthTable;
use super::types::{CurveType, SplineEvaluator};

/// A built curve: control point positions plus the arc length table derived
/// from them.
///
/// Two parameterizations are available. The raw parameter `u` follows the
/// spline's own segmentation and does not move at uniform speed; the arc
/// length parameter `s` does. Closed curves take both modulo 1.
#[derive(Debug, Clone)]
pub struct Curve {
    points: Vec<Vec3>,
    closed: bool,
    tension: f32,
    curve_type: CurveType,
    table: ArcLengthTable,
}

impl Curve {
    /// Build a curve through `points`.
    ///
    /// Fails with [`CurveError::InsufficientPoints`] for fewer than two points
    /// and [`CurveError::UnsupportedCurveType`] for a family without an evaluator.
    pub fn build(
        points: Vec<Vec3>,
        closed: bool,
        tension: f32,
        curve_type: CurveType,
    ) -> Result<Self, CurveError> {
        if !curve_type.has_evaluator() {
            return Err(CurveError::UnsupportedCurveType {
                name: curve_type.name().to_string(),
            });
        }
        if points.len() < curve_type.min_points() {
            return Err(CurveError::InsufficientPoints {
                count: points.len(),
            });
        }

        let mut curve = Self {
            points,
            closed,
            tension,
            curve_type,
            table: ArcLengthTable::default(),
        };
        curve.rebuild_arc_length_table();
        Ok(curve)
    }

    /// Replace control point positions without changing their count, then
    /// refresh the arc length table.
    ///
    /// Returns `false` (leaving the curve untouched) when the count differs;
    /// such a change needs a full [`Curve::build`].
    pub fn update_points(&mut self, points: &[Vec3]) -> bool {
        if points.len() != self.points.len() {
            return false;
        }
        self.points.copy_from_slice(points);
        self.rebuild_arc_length_table();
        true
    }

    /// Recompute the arc length table from the current points.
    pub fn rebuild_arc_length_table(&mut self) {
        let table = ArcLengthTable::compute(|u| self.raw_point(u));
        self.table = table;
    }

    /// Control point positions.
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Whether the curve wraps from the last point back to the first.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Tension the curve was built with.
    pub fn tension(&self) -> f32 {
        self.tension
    }

    /// Interpolation family.
    pub fn curve_type(&self) -> CurveType {
        self.curve_type
    }

    /// The arc length table.
    pub fn arc_length_table(&self) -> &ArcLengthTable {
        &self.table
    }

    /// Total arc length.
    pub fn length(&self) -> f32 {
        self.table.total_length()
    }

    /// Wrap (closed) or clamp (open) a parameter into [0, 1].
    pub fn wrap_parameter(&self, u: f32) -> f32 {
        if self.closed {
            wrap_unit(u)
        } else {
            u.clamp(0.0, 1.0)
        }
    }

    /// Position at raw parameter `u`.
    pub fn point_at(&self, u: f32) -> Vec3 {
        self.raw_point(self.wrap_parameter(u))
    }

    /// Unit tangent at raw parameter `u`.
    pub fn tangent_at(&self, u: f32) -> Vec3 {
        self.curve_type
            .evaluate_tangent(&self.points, self.wrap_parameter(u), self.closed, self.tension)
            .unwrap_or(Vec3::ZERO)
            .normalize_or_zero()
    }

    /// Raw parameter corresponding to arc length parameter `s`.
    pub fn arc_to_raw(&self, s: f32) -> f32 {
        self.table.arc_to_raw(self.wrap_parameter(s))
    }

    /// Arc length from the start of the curve to raw parameter `u`.
    pub fn arc_length_at(&self, u: f32) -> f32 {
        self.table.raw_to_length(self.wrap_parameter(u))
    }

    /// Position at arc length parameter `s`.
    pub fn point_at_arc_length(&self, s: f32) -> Vec3 {
        self.raw_point(self.arc_to_raw(s))
    }

    /// Unit tangent at arc length parameter `s`.
    pub fn tangent_at_arc_length(&self, s: f32) -> Vec3 {
        self.tangent_at(self.arc_to_raw(s))
    }

    /// Frame (position, tangent, normal, rotation) at arc length parameter `s`.
    pub fn frame_at_arc_length(&self, s: f32) -> CurveFrame {
        let u = self.arc_to_raw(s);
        CurveFrame::new(self.raw_point(u), self.tangent_at(u))
    }

    /// `count + 1` points evenly spaced by arc length, first to last.
    pub fn spaced_points(&self, count: usize) -> Vec<Vec3> {
        let count = count.max(1);
        (0..=count)
            .map(|i| self.point_at_arc_length(i as f32 / count as f32))
            .collect()
    }

    /// How many copies of an object fit along the curve at the given spacing.
    pub fn instance_count(&self, spacing: f32) -> usize {
        if spacing <= 0.0 {
            return 0;
        }
        (self.length() / spacing).ceil() as usize
    }

    /// Frames for objects repeated along the curve every `spacing` units.
    ///
    /// The sample count comes from [`Curve::instance_count`]; consumers must
    /// re-derive it whenever the curve is rebuilt.
    pub fn spaced_frames(&self, spacing: f32) -> Vec<CurveFrame> {
        let count = self.instance_count(spacing);
        (0..count)
            .map(|i| self.frame_at_arc_length(i as f32 / count as f32))
            .collect()
    }

    fn raw_point(&self, u: f32) -> Vec3 {
        self.curve_type
            .evaluate(&self.points, u, self.closed, self.tension)
            .unwrap_or(Vec3::ZERO)
    }
}

/// Wrap a loop parameter into [0, 1).
pub fn wrap_unit(u: f32) -> f32 {
    let wrapped = u.rem_euclid(1.0);
    // rem_euclid can round up to exactly 1.0 for tiny negative inputs
    if wrapped >= 1.0 {
        0.0
    } else {
        wrapped
    }
}
