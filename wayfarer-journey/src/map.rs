//! Map framing for the current leg: endpoints, midpoint and transit stop
//! waypoints, ready for a map presenter.

use crate::model::{Leg, TransitTables};
use crate::sequencer::SequencerState;
use crate::view::stops_for;
use wayfarer_common::LatLng;

/// What the map presenter needs to frame the current leg. Read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct MapFrame {
    pub center: LatLng,
    pub start: LatLng,
    pub end: LatLng,
    /// Stop coordinates along a transit leg; empty for walking legs.
    pub waypoints: Vec<LatLng>,
    /// Encoded walking path, passed through undecoded.
    pub polyline: Option<String>,
}

pub fn map_frame(state: &SequencerState, tables: &TransitTables) -> MapFrame {
    let step = state.current_leg();
    let (waypoints, polyline) = match &step.leg {
        Leg::Walking { encoded_path, .. } => (Vec::new(), encoded_path.clone()),
        Leg::Transit => {
            let waypoints = tables
                .details
                .get(step.step_number)
                .and_then(|d| stops_for(d, &tables.stops))
                .map(|list| list.waypoints())
                .unwrap_or_default();
            (waypoints, None)
        }
    };

    MapFrame {
        center: step.start_location.midpoint(&step.end_location),
        start: step.start_location,
        end: step.end_location,
        waypoints,
        polyline,
    }
}
