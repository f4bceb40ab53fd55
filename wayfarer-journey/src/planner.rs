//! Decoding of route planner responses into a [`ParsedRoute`] and its
//! transit side-table.
//!
//! The planner answers with a status-tagged envelope:
//!
//! ```json
//! {"status": "success", "data": {"origin": ..., "destination": ..., "duration": "48 mins",
//!  "distance": "25.1 km", "steps": [{"instruction": "...", "travel_mode": "walking", ...}]}}
//! {"status": "error", "message": "No route found"}
//! ```

use crate::error::{JourneyError, Result};
use crate::model::{Leg, ParsedRoute, Step, TransitDetail, TransitDetails};
use serde::Deserialize;
use tracing::debug;
use wayfarer_common::LatLng;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PlannerResponse {
    Success { data: PlannedRoute },
    Error { message: String },
}

/// Origin or destination as the planner echoes it: either a bare address or
/// an address with resolved coordinates.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PlannedPlace {
    Located { address: String, location: LatLng },
    Address(String),
}

impl PlannedPlace {
    pub fn address(&self) -> &str {
        match self {
            PlannedPlace::Located { address, .. } => address,
            PlannedPlace::Address(address) => address,
        }
    }

    pub fn location(&self) -> Option<LatLng> {
        match self {
            PlannedPlace::Located { location, .. } => Some(*location),
            PlannedPlace::Address(_) => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlannedRoute {
    pub origin: PlannedPlace,
    pub destination: PlannedPlace,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub distance: Option<String>,
    #[serde(default)]
    pub steps: Vec<PlannedStep>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlannedStep {
    #[serde(default)]
    pub instruction: String,
    #[serde(default)]
    pub distance: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    pub travel_mode: String,
    #[serde(default)]
    pub start_location: Option<LatLng>,
    #[serde(default)]
    pub end_location: Option<LatLng>,
    #[serde(default)]
    pub polyline: Option<String>,
    #[serde(default)]
    pub transit: Option<PlannedTransit>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlannedTransit {
    #[serde(default)]
    pub line: PlannedLine,
    #[serde(default)]
    pub departure: PlannedCall,
    #[serde(default)]
    pub arrival: PlannedCall,
    #[serde(default)]
    pub num_stops: Option<u32>,
    #[serde(default)]
    pub headsign: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlannedLine {
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub color: Option<String>,
    pub vehicle: Option<String>,
}

/// A timed call at a stop.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlannedCall {
    pub stop: Option<String>,
    pub time: Option<String>,
    pub location: Option<LatLng>,
}

/// A decoded journey ready to load: legs, their transit details and the
/// summary the planner gave.
#[derive(Debug, Clone)]
pub struct PlannedJourney {
    pub origin: String,
    pub destination: String,
    pub duration: Option<String>,
    pub distance: Option<String>,
    pub route: ParsedRoute,
    pub transit_details: TransitDetails,
}

impl PlannerResponse {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| JourneyError::Decode(e.to_string()))
    }

    /// Turn a successful response into a journey. An error response becomes
    /// [`JourneyError::Planner`] carrying the planner's message.
    ///
    /// ```
    /// use wayfarer_journey::{JourneyError, PlannerResponse};
    ///
    /// let ok = PlannerResponse::from_json(r#"{"status": "success", "data": {
    ///   "origin": "DE22 3FY", "destination": "Queens Medical Centre",
    ///   "steps": [{"instruction": "Walk to <b>Derby Bus Station</b>", "travel_mode": "WALKING", "duration": "4 mins"}]
    /// }}"#).unwrap();
    /// let journey = ok.into_journey().unwrap();
    /// assert_eq!(journey.route.len(), 1);
    ///
    /// let err = PlannerResponse::from_json(r#"{"status": "error", "message": "No route found"}"#).unwrap();
    /// assert_eq!(err.into_journey().unwrap_err(), JourneyError::Planner("No route found".into()));
    /// ```
    pub fn into_journey(self) -> Result<PlannedJourney> {
        match self {
            PlannerResponse::Error { message } => Err(JourneyError::Planner(message)),
            PlannerResponse::Success { data } => data.into_journey(),
        }
    }
}

impl PlannedRoute {
    pub fn into_journey(self) -> Result<PlannedJourney> {
        let origin_location = self.origin.location();
        let destination_location = self.destination.location();

        let mut steps = Vec::with_capacity(self.steps.len());
        let mut details = TransitDetails::new();
        let mut cursor = origin_location.unwrap_or_default();

        for (idx, planned) in self.steps.into_iter().enumerate() {
            let step_number = idx as u32 + 1;
            let transit = planned.transit.as_ref();

            let start = planned
                .start_location
                .or_else(|| transit.and_then(|t| t.departure.location))
                .unwrap_or(cursor);
            let end = planned
                .end_location
                .or_else(|| transit.and_then(|t| t.arrival.location))
                .or(destination_location)
                .unwrap_or(start);
            cursor = end;

            let leg = match planned.travel_mode.to_ascii_lowercase().as_str() {
                "walking" => Leg::Walking {
                    instruction_html: planned.instruction,
                    encoded_path: planned.polyline,
                },
                "transit" => {
                    if let Some(t) = planned.transit {
                        details.insert(TransitDetail {
                            step_number,
                            line_name: t.line.name,
                            line_short_name: t.line.short_name,
                            vehicle: t.line.vehicle,
                            headsign: t.headsign,
                            departure_stop: t.departure.stop,
                            departure_time: t.departure.time,
                            arrival_stop: t.arrival.stop,
                            arrival_time: t.arrival.time,
                            duration: planned.duration.clone(),
                            num_stops: t.num_stops,
                        });
                    }
                    Leg::Transit
                }
                _ => return Err(JourneyError::UnsupportedTravelMode(planned.travel_mode)),
            };

            steps.push(Step {
                step_number,
                start_location: start,
                end_location: end,
                duration_text: planned.duration,
                leg,
            });
        }

        let route = ParsedRoute::new(steps)?;
        debug!(
            target: "wayfarer::planner",
            legs = route.len(),
            transit_legs = details.len(),
            "planner response decoded"
        );

        Ok(PlannedJourney {
            origin: self.origin.address().to_string(),
            destination: self.destination.address().to_string(),
            duration: self.duration,
            distance: self.distance,
            route,
            transit_details: details,
        })
    }
}
