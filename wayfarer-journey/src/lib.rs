//! Journey sequencing for multi-modal trips.
//!
//! A journey is an ordered list of walking and transit legs. This crate keeps
//! the current-leg index, advances it one leg at a time towards a terminal
//! completion state, and joins the current leg with the planner's transit
//! side-tables to produce everything a screen or a voice needs to present it.
//!
//! # Overview
//!
//! - [`ParsedRoute`], [`Step`] and the side-tables in [`model`]
//! - [`SequencerState`] and [`JourneyState`]: the forward-only state machine
//! - [`derive_leg_view`]: per-leg view data with placeholders for gaps
//! - [`announcement_text`]: the sentence read out for a leg
//! - [`map_frame`]: coordinates to frame the current leg
//! - [`PlannerResponse`]: decoding of route planner output
//!
//! # Examples
//!
//! ```rust
//! use wayfarer_journey::{
//!     JourneyState, PlannerResponse, TransitTables, Transition, announcement_text, derive_leg_view,
//! };
//!
//! let plan = PlannerResponse::from_json(r#"{"status": "success", "data": {
//!   "origin": "Derby", "destination": "Nottingham",
//!   "steps": [
//!     {"instruction": "Walk to Derby Bus Station", "travel_mode": "walking", "duration": "5 mins"},
//!     {"travel_mode": "transit", "duration": "40 mins", "transit": {
//!        "line": {"name": "Skylink"},
//!        "departure": {"stop": "Derby Bus Station"},
//!        "arrival": {"stop": "Nottingham"}}}
//!   ]}}"#).unwrap().into_journey().unwrap();
//!
//! let tables = TransitTables { details: plan.transit_details, ..Default::default() };
//! let state = JourneyState::initialize(plan.route);
//! let (state, transition) = state.advance();
//! assert_eq!(transition, Transition::Moved { from: 0, to: 1 });
//!
//! let view = derive_leg_view(state.active().unwrap(), &tables);
//! assert_eq!(
//!     announcement_text(&view),
//!     "Step 2 of 2. Take the Skylink from Derby Bus Station to Nottingham. \
//!      Next stop: unknown. Arriving in 40 mins."
//! );
//! ```

pub mod announce;
pub mod error;
pub mod map;
pub mod markup;
pub mod model;
pub mod planner;
pub mod sequencer;
pub mod view;

pub use announce::announcement_text;
pub use error::{JourneyError, Result};
pub use map::{MapFrame, map_frame};
pub use markup::strip_markup;
pub use model::{
    Direction, Leg, LegKind, ParsedRoute, Step, StopPattern, TransitDetail, TransitDetails,
    TransitStop, TransitStopList, TransitStops, TransitTables,
};
pub use planner::{PlannedJourney, PlannerResponse};
pub use sequencer::{
    Advance, JourneyComplete, JourneyState, LegPosition, SequencerState, Transition,
};
pub use view::{
    LegView, TransitLegView, WalkingLegView, derive_leg_view, derive_transit_view,
    derive_walking_view,
};
