mod alignment;
mod arc_length;
mod closest_point;
mod components;
mod curve;
mod systems;
mod types;

pub use alignment::*;
pub use arc_length::*;
pub use closest_point::*;
pub use components::*;
pub use curve::*;
pub use curve::Curve;
pub use systems::{recompute_curves, resume_reconfigured_curves, sync_control_points};
pub use types::*;

use bevy::prelude::*;

/// System sets for curve maintenance.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum CurveSystems {
    /// Snapshot control points and rebuild or refresh curves.
    ///
    /// Anything reading a curve in `Update` should run after this set.
    Recompute,
}

/// Plugin that keeps [`TrackCurve`]s in sync with their [`CurvePoint`]s.
///
/// Each frame every curve gets a fresh point snapshot and is recomputed at most
/// once, writing [`CurveUpdated`] after a rebuild or [`CurveShifted`] after a
/// position-only refresh.
pub struct CurvePlugin;

impl Plugin for CurvePlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<CurveType>()
            .register_type::<TrackCurve>()
            .register_type::<CurvePoint>()
            .register_type::<CurveSuspended>()
            .add_message::<CurveUpdated>()
            .add_message::<CurveShifted>()
            .add_systems(
                Update,
                (
                    systems::resume_reconfigured_curves,
                    systems::sync_control_points,
                    systems::recompute_curves,
                )
                    .chain()
                    .in_set(CurveSystems::Recompute),
            );
    }
}
