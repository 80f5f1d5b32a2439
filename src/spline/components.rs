use bevy::prelude::*;

use crate::error::CurveError;

use super::alignment::align_points;
use super::closest_point::{closest_point, ClosestPoint};
use super::curve::Curve;
use super::types::CurveType;

/// Default tension for new track curves.
pub const DEFAULT_TENSION: f32 = 0.25;

/// Read-only snapshot of a control point, already resolved into curve space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPoint {
    /// Stable handle of the point object.
    pub id: Entity,
    /// Position in curve space.
    pub position: Vec3,
    /// Orientation in curve space, used by point alignment.
    pub orientation: Quat,
}

impl ControlPoint {
    /// Snapshot a point with identity orientation.
    pub fn new(id: Entity, position: Vec3) -> Self {
        Self {
            id,
            position,
            orientation: Quat::IDENTITY,
        }
    }

    /// Set the orientation.
    pub fn with_orientation(mut self, orientation: Quat) -> Self {
        self.orientation = orientation;
        self
    }
}

/// Marker component placing an entity on a track curve.
///
/// Points are ordered by `order`, then by entity; the order along the path
/// has nothing to do with when the point was spawned. The point's local
/// [`Transform`] is taken as its position in curve space.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct CurvePoint {
    /// The entity that owns the [`TrackCurve`].
    pub curve: Entity,
    /// Position of this point along the path.
    pub order: u32,
}

impl CurvePoint {
    /// Create a point for the given curve at the given order.
    pub fn new(curve: Entity, order: u32) -> Self {
        Self { curve, order }
    }
}

/// What a [`TrackCurve::recompute`] pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveChange {
    /// Topology or attributes changed; the curve was rebuilt from scratch.
    Updated,
    /// Only positions moved; the arc length table was refreshed.
    Shifted,
}

/// Marker inserted on a curve whose configuration cannot be built.
///
/// Suspended curves are no longer recomputed.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct CurveSuspended;

/// A track curve through an ordered set of control points.
///
/// The curve is rebuilt lazily: staging a new snapshot or changing an
/// attribute only sets a flag, and the next [`TrackCurve::recompute`] does at
/// most one rebuild no matter how many changes were staged. Every rebuild or
/// refresh bumps [`TrackCurve::version`] so consumers can tell whether data
/// they derived from the curve is stale.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component, Default)]
pub struct TrackCurve {
    /// Interpolation family.
    curve_type: CurveType,
    /// Whether the path wraps from the last point back to the first.
    closed: bool,
    /// Catmull-Rom tension, 0 for the classic curve.
    tension: f32,
    #[reflect(ignore)]
    snapshot: Vec<ControlPoint>,
    #[reflect(ignore)]
    curve: Option<Curve>,
    #[reflect(ignore)]
    alignments: Vec<(Entity, Quat)>,
    #[reflect(ignore)]
    needs_rebuild: bool,
    #[reflect(ignore)]
    needs_refresh: bool,
    #[reflect(ignore)]
    version: u64,
}

impl Default for TrackCurve {
    fn default() -> Self {
        Self {
            curve_type: CurveType::default(),
            closed: false,
            tension: DEFAULT_TENSION,
            snapshot: Vec::new(),
            curve: None,
            alignments: Vec::new(),
            needs_rebuild: true,
            needs_refresh: false,
            version: 0,
        }
    }
}

impl TrackCurve {
    /// Create an open Catmull-Rom track.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a closed Catmull-Rom track.
    pub fn closed() -> Self {
        Self {
            closed: true,
            ..default()
        }
    }

    /// Set the tension.
    pub fn with_tension(mut self, tension: f32) -> Self {
        self.tension = tension;
        self
    }

    /// Set the interpolation family.
    pub fn with_curve_type(mut self, curve_type: CurveType) -> Self {
        self.curve_type = curve_type;
        self
    }

    /// Interpolation family.
    pub fn curve_type(&self) -> CurveType {
        self.curve_type
    }

    /// Whether the path is a closed loop.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Catmull-Rom tension.
    pub fn tension(&self) -> f32 {
        self.tension
    }

    /// Change the interpolation family; takes effect on the next recompute.
    pub fn set_curve_type(&mut self, curve_type: CurveType) {
        if self.curve_type != curve_type {
            self.curve_type = curve_type;
            self.mark_dirty();
        }
    }

    /// Open or close the loop; takes effect on the next recompute.
    pub fn set_closed(&mut self, closed: bool) {
        if self.closed != closed {
            self.closed = closed;
            self.mark_dirty();
        }
    }

    /// Change the tension; takes effect on the next recompute.
    pub fn set_tension(&mut self, tension: f32) {
        if self.tension != tension {
            self.tension = tension;
            self.mark_dirty();
        }
    }

    /// Request a full rebuild on the next recompute.
    pub fn mark_dirty(&mut self) {
        self.needs_rebuild = true;
    }

    /// Whether a full rebuild is pending.
    pub fn is_dirty(&self) -> bool {
        self.needs_rebuild
    }

    /// Stage a fresh snapshot of the control points, in path order.
    ///
    /// A change in membership or order marks the curve dirty. The same points
    /// at new positions only schedule an arc length refresh.
    pub fn set_control_points(&mut self, points: impl IntoIterator<Item = ControlPoint>) {
        let points: Vec<ControlPoint> = points.into_iter().collect();

        let same_members = points.len() == self.snapshot.len()
            && points.iter().zip(&self.snapshot).all(|(a, b)| a.id == b.id);

        if !same_members {
            self.mark_dirty();
        } else if points
            .iter()
            .zip(&self.snapshot)
            .any(|(a, b)| a.position != b.position)
        {
            self.needs_refresh = true;
        }

        self.snapshot = points;
    }

    /// The currently staged snapshot.
    pub fn control_points(&self) -> &[ControlPoint] {
        &self.snapshot
    }

    /// Bring the built curve up to date with the staged snapshot.
    ///
    /// Returns which kind of change happened, if any. A snapshot with fewer
    /// than two points leaves the curve not ready and is not an error; an
    /// interpolation family without an evaluator is.
    pub fn recompute(&mut self) -> Result<Option<CurveChange>, CurveError> {
        if self.needs_rebuild {
            self.needs_rebuild = false;
            self.needs_refresh = false;
            return self.rebuild();
        }

        if self.needs_refresh {
            self.needs_refresh = false;
            let positions: Vec<Vec3> = self.snapshot.iter().map(|p| p.position).collect();
            if let Some(curve) = self.curve.as_mut() {
                if curve.update_points(&positions) {
                    self.version += 1;
                    return Ok(Some(CurveChange::Shifted));
                }
            }
            // Same members but no usable curve: fall back to a full build
            return self.rebuild();
        }

        Ok(None)
    }

    fn rebuild(&mut self) -> Result<Option<CurveChange>, CurveError> {
        let positions: Vec<Vec3> = self.snapshot.iter().map(|p| p.position).collect();
        let was_ready = self.curve.is_some();

        match Curve::build(positions, self.closed, self.tension, self.curve_type) {
            Ok(curve) => {
                self.alignments = align_points(&curve, &self.snapshot);
                debug!(
                    "Rebuilt {} curve: {} points, length {:.3}, {} arc length divisions",
                    self.curve_type.name(),
                    self.snapshot.len(),
                    curve.length(),
                    curve.arc_length_table().divisions()
                );
                self.curve = Some(curve);
                self.version += 1;
                Ok(Some(CurveChange::Updated))
            }
            Err(CurveError::InsufficientPoints { count }) => {
                debug!("Curve waiting for points: {count} available");
                self.curve = None;
                self.alignments.clear();
                if was_ready {
                    self.version += 1;
                }
                Ok(None)
            }
            Err(err) => {
                self.curve = None;
                self.alignments.clear();
                Err(err)
            }
        }
    }

    /// Tear the curve down. It stays not ready until points are staged again.
    pub fn clear(&mut self) {
        self.snapshot.clear();
        self.alignments.clear();
        self.curve = None;
        self.needs_rebuild = false;
        self.needs_refresh = false;
        self.version += 1;
    }

    /// Whether a built curve is available for queries.
    pub fn is_ready(&self) -> bool {
        self.curve.is_some()
    }

    /// Counter bumped on every rebuild, refresh and teardown.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The built curve.
    pub fn curve(&self) -> Result<&Curve, CurveError> {
        self.curve.as_ref().ok_or(CurveError::NotReady)
    }

    /// Corrective rotations computed by the last rebuild, keyed by point entity.
    ///
    /// Each rotation is meant to be pre-multiplied onto the point's orientation.
    pub fn take_alignments(&mut self) -> Vec<(Entity, Quat)> {
        std::mem::take(&mut self.alignments)
    }

    /// Position at raw parameter `u`.
    pub fn point_at(&self, u: f32) -> Result<Vec3, CurveError> {
        Ok(self.curve()?.point_at(u))
    }

    /// Unit tangent at raw parameter `u`.
    pub fn tangent_at(&self, u: f32) -> Result<Vec3, CurveError> {
        Ok(self.curve()?.tangent_at(u))
    }

    /// Position at arc length parameter `s`.
    pub fn point_at_arc_length(&self, s: f32) -> Result<Vec3, CurveError> {
        Ok(self.curve()?.point_at_arc_length(s))
    }

    /// Unit tangent at arc length parameter `s`.
    pub fn tangent_at_arc_length(&self, s: f32) -> Result<Vec3, CurveError> {
        Ok(self.curve()?.tangent_at_arc_length(s))
    }

    /// Total arc length.
    pub fn length(&self) -> Result<f32, CurveError> {
        Ok(self.curve()?.length())
    }

    /// Nearest point on the curve to `point`, given in curve space.
    pub fn closest_point(&self, point: Vec3) -> Result<ClosestPoint, CurveError> {
        Ok(closest_point(self.curve()?, point))
    }
}

/// The version of a [`TrackCurve`] a consumer last derived data from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
pub struct CurveVersionStamp(Option<u64>);

impl CurveVersionStamp {
    /// Whether the curve changed since [`CurveVersionStamp::mark_seen`].
    pub fn is_stale(&self, curve: &TrackCurve) -> bool {
        self.0 != Some(curve.version())
    }

    /// Record the curve's current version.
    pub fn mark_seen(&mut self, curve: &TrackCurve) {
        self.0 = Some(curve.version());
    }
}

/// Message written when a curve was rebuilt.
///
/// Consumers should re-derive anything sized from the curve's length.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurveUpdated {
    /// The entity with the [`TrackCurve`] component.
    pub curve: Entity,
    /// Version after the rebuild.
    pub version: u64,
}

/// Message written when a curve's points moved without changing topology.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurveShifted {
    /// The entity with the [`TrackCurve`] component.
    pub curve: Entity,
    /// Version after the refresh.
    pub version: u64,
}
