use std::str::FromStr;

use bevy::prelude::*;

use crate::error::CurveError;

/// The interpolation family a track curve asks for.
///
/// Only [`CurveType::CatmullRom`] has an evaluator; the remaining families are
/// recognised so that a track requesting them fails loudly instead of silently
/// falling back to another shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
#[reflect(Default)]
pub enum CurveType {
    /// Cardinal Catmull-Rom spline - passes through all control points.
    #[default]
    CatmullRom,
    /// Cubic Bézier spline.
    CubicBezier,
    /// Quadratic Bézier spline.
    QuadraticBezier,
    /// Polyline.
    Line,
}

impl CurveType {
    /// Get the name used to request this family.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CatmullRom => "CatmullRom",
            Self::CubicBezier => "CubicBezier",
            Self::QuadraticBezier => "QuadraticBezier",
            Self::Line => "Line",
        }
    }

    /// Whether this family can be evaluated.
    pub fn has_evaluator(&self) -> bool {
        matches!(self, Self::CatmullRom)
    }

    /// Minimum number of control points required to build a curve.
    pub fn min_points(&self) -> usize {
        2
    }
}

impl FromStr for CurveType {
    type Err = CurveError;

    /// Parse a family name. Names are case sensitive.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "CatmullRom" => Ok(Self::CatmullRom),
            "CubicBezier" => Ok(Self::CubicBezier),
            "QuadraticBezier" => Ok(Self::QuadraticBezier),
            "Line" => Ok(Self::Line),
            _ => Err(CurveError::UnsupportedCurveType {
                name: name.to_string(),
            }),
        }
    }
}

/// Trait for evaluating spline curves over raw parameter `u` in [0, 1].
pub trait SplineEvaluator {
    /// Evaluate the spline at raw parameter u (0.0 to 1.0 across the entire spline).
    fn evaluate(&self, points: &[Vec3], u: f32, closed: bool, tension: f32) -> Option<Vec3>;

    /// Evaluate the derivative with respect to u.
    fn evaluate_tangent(&self, points: &[Vec3], u: f32, closed: bool, tension: f32)
        -> Option<Vec3>;

    /// Get the number of segments in the spline.
    fn segment_count(&self, points: &[Vec3], closed: bool) -> usize;
}

impl SplineEvaluator for CurveType {
    fn evaluate(&self, points: &[Vec3], u: f32, closed: bool, tension: f32) -> Option<Vec3> {
        match self {
            Self::CatmullRom => {
                let (segment, [p0, p1, p2, p3]) = catmull_rom_segment(points, u, closed)?;
                Some(cardinal(p0, p1, p2, p3, segment, tension))
            }
            _ => None,
        }
    }

    fn evaluate_tangent(
        &self,
        points: &[Vec3],
        u: f32,
        closed: bool,
        tension: f32,
    ) -> Option<Vec3> {
        match self {
            Self::CatmullRom => {
                let (segment, [p0, p1, p2, p3]) = catmull_rom_segment(points, u, closed)?;
                let segments = self.segment_count(points, closed) as f32;
                Some(cardinal_derivative(p0, p1, p2, p3, segment, tension) * segments)
            }
            _ => None,
        }
    }

    fn segment_count(&self, points: &[Vec3], closed: bool) -> usize {
        if points.len() < self.min_points() {
            0
        } else if closed {
            points.len()
        } else {
            points.len() - 1
        }
    }
}

/// Locate the segment containing `u` and return its local blend together with
/// the four points that shape it.
///
/// Open curves extrapolate a phantom point past each end so the curve still
/// passes through the first and last control points.
fn catmull_rom_segment(points: &[Vec3], u: f32, closed: bool) -> Option<(f32, [Vec3; 4])> {
    let n = points.len();
    if n < 2 {
        return None;
    }

    let num_segments = if closed { n } else { n - 1 };
    let u_scaled = u.clamp(0.0, 1.0) * num_segments as f32;
    let segment = (u_scaled.floor() as usize).min(num_segments - 1);
    let local_u = u_scaled - segment as f32;

    let quad = if closed {
        [
            points[(segment + n - 1) % n],
            points[segment],
            points[(segment + 1) % n],
            points[(segment + 2) % n],
        ]
    } else {
        let p0 = if segment == 0 {
            2.0 * points[0] - points[1]
        } else {
            points[segment - 1]
        };
        let p3 = if segment + 2 < n {
            points[segment + 2]
        } else {
            2.0 * points[n - 1] - points[n - 2]
        };
        [p0, points[segment], points[segment + 1], p3]
    };

    Some((local_u, quad))
}

/// Cardinal spline in Hermite form; `tension = 0` is the classic Catmull-Rom.
fn cardinal(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32, tension: f32) -> Vec3 {
    let scale = (1.0 - tension) * 0.5;
    let m1 = (p2 - p0) * scale;
    let m2 = (p3 - p1) * scale;

    let t2 = t * t;
    let t3 = t2 * t;

    p1 * (2.0 * t3 - 3.0 * t2 + 1.0)
        + m1 * (t3 - 2.0 * t2 + t)
        + p2 * (-2.0 * t3 + 3.0 * t2)
        + m2 * (t3 - t2)
}

fn cardinal_derivative(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32, tension: f32) -> Vec3 {
    let scale = (1.0 - tension) * 0.5;
    let m1 = (p2 - p0) * scale;
    let m2 = (p3 - p1) * scale;

    let t2 = t * t;

    p1 * (6.0 * t2 - 6.0 * t)
        + m1 * (3.0 * t2 - 4.0 * t + 1.0)
        + p2 * (-6.0 * t2 + 6.0 * t)
        + m2 * (3.0 * t2 - 2.0 * t)
}
