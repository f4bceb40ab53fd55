//! Per-leg view data: the current leg joined with the transit side-tables.
//!
//! Joins never fail. Any field the side-tables cannot supply is replaced by a
//! documented placeholder and the gap is logged at `warn`.

use crate::markup::strip_markup;
use crate::model::{
    Leg, LegKind, TransitDetail, TransitDetails, TransitStopList, TransitStops, TransitTables,
};
use crate::sequencer::{LegPosition, SequencerState};
use tracing::warn;

/// Substituted for any textual field the side-tables do not provide.
pub const PLACEHOLDER: &str = "unknown";
/// Substituted when a walking leg's instruction is empty after stripping markup.
pub const WALKING_INSTRUCTION_PLACEHOLDER: &str = "Follow the path";
/// Next stop announced on the final walking leg.
pub const FINAL_DESTINATION: &str = "your destination";
/// Progress reported when the route length is unknown.
pub const PROGRESS_FALLBACK: f32 = 50.0;

/// Share of the journey behind the traveler, `index / len * 100`, clamped to
/// `[0, 100]`; [`PROGRESS_FALLBACK`] when `len` is zero.
///
/// ```
/// use wayfarer_journey::view::progress_percent;
///
/// assert_eq!(progress_percent(0, 4), 0.0);
/// assert_eq!(progress_percent(2, 4), 50.0);
/// assert_eq!(progress_percent(9, 4), 100.0);
/// assert_eq!(progress_percent(0, 0), 50.0);
/// ```
pub fn progress_percent(index: usize, len: usize) -> f32 {
    if len == 0 {
        return PROGRESS_FALLBACK;
    }
    ((index as f32 / len as f32) * 100.0).clamp(0.0, 100.0)
}

#[derive(Debug, Clone, PartialEq)]
pub struct WalkingLegView {
    pub position: LegPosition,
    pub step_number: u32,
    /// Instruction with markup removed.
    pub instruction: String,
    pub duration: String,
    pub next_stop_name: String,
    pub progress_percent: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransitLegView {
    pub position: LegPosition,
    pub step_number: u32,
    pub line_name: String,
    pub vehicle: String,
    pub headsign: String,
    pub departure_stop: String,
    pub departure_time: String,
    pub arrival_stop: String,
    pub arrival_time: String,
    /// Ride duration from the transit detail.
    pub duration: String,
    /// The leg's own duration estimate from the route.
    pub step_duration: String,
    /// Stops to ride, when the planner reported it.
    pub num_stops: Option<u32>,
    pub next_stop_name: String,
    pub progress_percent: f32,
    /// Whether a transit detail row was found for this leg.
    pub detail_found: bool,
    /// Whether an outbound stop list was found for this leg's line.
    pub stops_found: bool,
}

impl TransitLegView {
    /// Duration to read out: the ride duration, else the leg estimate.
    pub fn arrival_text(&self) -> &str {
        if self.duration != PLACEHOLDER {
            &self.duration
        } else {
            &self.step_duration
        }
    }
}

/// Presentation data for the current leg, one variant per leg kind.
#[derive(Debug, Clone, PartialEq)]
pub enum LegView {
    Walking(WalkingLegView),
    Transit(TransitLegView),
}

impl LegView {
    pub fn kind(&self) -> LegKind {
        match self {
            LegView::Walking(_) => LegKind::Walking,
            LegView::Transit(_) => LegKind::Transit,
        }
    }

    pub fn position(&self) -> LegPosition {
        match self {
            LegView::Walking(w) => w.position,
            LegView::Transit(t) => t.position,
        }
    }

    pub fn progress_percent(&self) -> f32 {
        match self {
            LegView::Walking(w) => w.progress_percent,
            LegView::Transit(t) => t.progress_percent,
        }
    }
}

fn text_or_placeholder(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(PLACEHOLDER)
        .to_string()
}

/// Outbound stops for the line named in `detail`, trying the full name first.
pub(crate) fn stops_for<'a>(
    detail: &TransitDetail,
    stops: &'a TransitStops,
) -> Option<&'a TransitStopList> {
    [detail.line_name.as_deref(), detail.line_short_name.as_deref()]
        .into_iter()
        .flatten()
        .find_map(|line| stops.outbound(line))
}

/// Join the current transit leg with its detail row and outbound stop list.
///
/// Returns `None` only when the current leg is not a transit leg.
pub fn derive_transit_view(
    state: &SequencerState,
    details: &TransitDetails,
    stops: &TransitStops,
) -> Option<TransitLegView> {
    match state.current_leg().leg {
        Leg::Transit => Some(build_transit_view(state, details, stops)),
        Leg::Walking { .. } => None,
    }
}

/// Build the view for the current walking leg.
///
/// The next stop is where the following transit leg boards, the final
/// destination on the last leg, and the placeholder otherwise.
pub fn derive_walking_view(
    state: &SequencerState,
    details: &TransitDetails,
) -> Option<WalkingLegView> {
    match &state.current_leg().leg {
        Leg::Walking {
            instruction_html, ..
        } => Some(build_walking_view(state, instruction_html, details)),
        Leg::Transit => None,
    }
}

/// Derive the view for whichever kind the current leg is.
pub fn derive_leg_view(state: &SequencerState, tables: &TransitTables) -> LegView {
    match &state.current_leg().leg {
        Leg::Walking {
            instruction_html, ..
        } => LegView::Walking(build_walking_view(state, instruction_html, &tables.details)),
        Leg::Transit => {
            LegView::Transit(build_transit_view(state, &tables.details, &tables.stops))
        }
    }
}

fn detail_text<'a>(
    detail: Option<&'a TransitDetail>,
    pick: impl FnOnce(&'a TransitDetail) -> Option<&'a str>,
) -> String {
    text_or_placeholder(detail.and_then(pick))
}

fn build_transit_view(
    state: &SequencerState,
    details: &TransitDetails,
    stops: &TransitStops,
) -> TransitLegView {
    let step = state.current_leg();

    let detail = details.get(step.step_number);
    if detail.is_none() {
        warn!(
            target: "wayfarer::join",
            step_number = step.step_number,
            "no transit detail for leg; using placeholders"
        );
    }

    let stop_list = detail.and_then(|d| stops_for(d, stops));
    if let (Some(d), None) = (detail, stop_list) {
        warn!(
            target: "wayfarer::join",
            step_number = step.step_number,
            line = d.line_name.as_deref().unwrap_or(PLACEHOLDER),
            "no outbound stop list for line; next stop unknown"
        );
    }

    TransitLegView {
        position: state.position(),
        step_number: step.step_number,
        line_name: detail_text(detail, |d| {
            d.line_name.as_deref().or(d.line_short_name.as_deref())
        }),
        vehicle: detail_text(detail, |d| d.vehicle.as_deref()),
        headsign: detail_text(detail, |d| d.headsign.as_deref()),
        departure_stop: detail_text(detail, |d| d.departure_stop.as_deref()),
        departure_time: detail_text(detail, |d| d.departure_time.as_deref()),
        arrival_stop: detail_text(detail, |d| d.arrival_stop.as_deref()),
        arrival_time: detail_text(detail, |d| d.arrival_time.as_deref()),
        duration: detail_text(detail, |d| d.duration.as_deref()),
        step_duration: text_or_placeholder(step.duration_text.as_deref()),
        num_stops: detail.and_then(|d| d.num_stops),
        next_stop_name: text_or_placeholder(
            stop_list
                .and_then(|l| l.next_stop())
                .map(|s| s.name.as_str()),
        ),
        progress_percent: progress_percent(state.current_index(), state.len()),
        detail_found: detail.is_some(),
        stops_found: stop_list.is_some(),
    }
}

fn build_walking_view(
    state: &SequencerState,
    instruction_html: &str,
    details: &TransitDetails,
) -> WalkingLegView {
    let step = state.current_leg();

    let instruction = match strip_markup(instruction_html) {
        text if text.is_empty() => WALKING_INSTRUCTION_PLACEHOLDER.to_string(),
        text => text,
    };

    let next_stop_name = if state.is_last_leg() {
        FINAL_DESTINATION.to_string()
    } else {
        match state.peek_next() {
            Some(next) if next.kind() == LegKind::Transit => text_or_placeholder(
                details
                    .get(next.step_number)
                    .and_then(|d| d.departure_stop.as_deref()),
            ),
            _ => PLACEHOLDER.to_string(),
        }
    };

    WalkingLegView {
        position: state.position(),
        step_number: step.step_number,
        instruction,
        duration: text_or_placeholder(step.duration_text.as_deref()),
        next_stop_name,
        progress_percent: progress_percent(state.current_index(), state.len()),
    }
}
