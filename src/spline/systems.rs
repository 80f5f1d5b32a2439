use std::collections::HashMap;

use bevy::prelude::*;

use super::{
    ControlPoint, CurveChange, CurvePoint, CurveShifted, CurveSuspended, CurveUpdated, TrackCurve,
};

/// Lift the suspension of curves that were reconfigured to a buildable family.
pub fn resume_reconfigured_curves(
    mut commands: Commands,
    curves: Query<(Entity, &TrackCurve), (With<CurveSuspended>, Changed<TrackCurve>)>,
) {
    for (entity, curve) in &curves {
        if curve.curve_type().has_evaluator() {
            info!("Resuming curve {entity:?} as {}", curve.curve_type().name());
            commands.entity(entity).remove::<CurveSuspended>();
        }
    }
}

/// Stage a fresh control point snapshot on every active curve.
///
/// A point's local transform is its position in curve space. Curves with no
/// points left receive an empty snapshot.
pub fn sync_control_points(
    mut curves: Query<(Entity, &mut TrackCurve), Without<CurveSuspended>>,
    points: Query<(Entity, &CurvePoint, &Transform)>,
) {
    let mut by_curve: HashMap<Entity, Vec<(u32, ControlPoint)>> = HashMap::new();
    for (entity, point, transform) in &points {
        by_curve.entry(point.curve).or_default().push((
            point.order,
            ControlPoint::new(entity, transform.translation).with_orientation(transform.rotation),
        ));
    }

    for (entity, mut curve) in &mut curves {
        let mut points = by_curve.remove(&entity).unwrap_or_default();
        points.sort_by_key(|(order, point)| (*order, point.id));
        curve.set_control_points(points.into_iter().map(|(_, point)| point));
    }
}

/// Recompute curves with staged changes and announce what happened.
///
/// At most one message is written per curve per frame. Rebuilds also turn
/// every control point to face along the curve. A curve that cannot be built
/// is suspended.
pub fn recompute_curves(
    mut commands: Commands,
    mut curves: Query<(Entity, &mut TrackCurve), Without<CurveSuspended>>,
    mut point_transforms: Query<&mut Transform, With<CurvePoint>>,
    mut updated: MessageWriter<CurveUpdated>,
    mut shifted: MessageWriter<CurveShifted>,
) {
    for (entity, mut curve) in &mut curves {
        match curve.recompute() {
            Ok(Some(CurveChange::Updated)) => {
                for (point, correction) in curve.take_alignments() {
                    if let Ok(mut transform) = point_transforms.get_mut(point) {
                        transform.rotation = (correction * transform.rotation).normalize();
                    }
                }
                updated.write(CurveUpdated {
                    curve: entity,
                    version: curve.version(),
                });
            }
            Ok(Some(CurveChange::Shifted)) => {
                shifted.write(CurveShifted {
                    curve: entity,
                    version: curve.version(),
                });
            }
            Ok(None) => {}
            Err(err) => {
                error!("Suspending curve {entity:?}: {err}");
                commands.entity(entity).insert(CurveSuspended);
            }
        }
    }
}
