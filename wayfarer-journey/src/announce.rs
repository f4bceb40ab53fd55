//! Spoken text for the current leg.
//!
//! The sentence shape is fixed so it can be asserted in tests:
//!
//! ```text
//! Step {n} of {m}. Take the {line} from {departure} to {arrival}. Next stop: {next}. Arriving in {duration}.
//! Step {n} of {m}. {instruction}. Next stop: {next}. Arriving in {duration}.
//! ```
//!
//! Every slot is filled from a freshly derived [`LegView`], which already
//! carries placeholders for anything the side-tables lacked.

use crate::view::LegView;

/// Compose the announcement for a derived leg view.
///
/// ```
/// use wayfarer_common::LatLng;
/// use wayfarer_journey::{ParsedRoute, SequencerState, Step, TransitTables, announcement_text, derive_leg_view};
///
/// let p = LatLng::new(52.92, -1.47);
/// let route = ParsedRoute::new(vec![
///     Step::walking(1, p, p, "Walk to <b>Derby Bus Station</b>").with_duration("4 mins"),
/// ]).unwrap();
/// let state = SequencerState::initialize(route).unwrap();
/// let view = derive_leg_view(&state, &TransitTables::default());
///
/// assert_eq!(
///     announcement_text(&view),
///     "Step 1 of 1. Walk to Derby Bus Station. Next stop: your destination. Arriving in 4 mins."
/// );
/// ```
pub fn announcement_text(view: &LegView) -> String {
    match view {
        LegView::Transit(t) => format!(
            "Step {} of {}. Take the {} from {} to {}. Next stop: {}. Arriving in {}.",
            t.position.number,
            t.position.total,
            t.line_name,
            t.departure_stop,
            t.arrival_stop,
            t.next_stop_name,
            t.arrival_text(),
        ),
        LegView::Walking(w) => format!(
            "Step {} of {}. {}. Next stop: {}. Arriving in {}.",
            w.position.number,
            w.position.total,
            w.instruction.trim_end_matches('.'),
            w.next_stop_name,
            w.duration,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencer::LegPosition;
    use crate::view::{PLACEHOLDER, TransitLegView, WalkingLegView};

    fn transit(line: &str, next: &str) -> TransitLegView {
        TransitLegView {
            position: LegPosition { number: 2, total: 3 },
            step_number: 2,
            line_name: line.into(),
            vehicle: "bus".into(),
            headsign: "Nottingham".into(),
            departure_stop: "Derby Bus Station".into(),
            departure_time: "10:05".into(),
            arrival_stop: "Queens Medical Centre".into(),
            arrival_time: "10:50".into(),
            duration: "45 mins".into(),
            step_duration: "44 mins".into(),
            num_stops: Some(20),
            next_stop_name: next.into(),
            progress_percent: 33.3,
            detail_found: true,
            stops_found: true,
        }
    }

    #[test]
    fn transit_sentence_names_line_stops_and_duration() {
        let text = announcement_text(&LegView::Transit(transit("Skylink", "London Road")));
        assert_eq!(
            text,
            "Step 2 of 3. Take the Skylink from Derby Bus Station to Queens Medical Centre. \
             Next stop: London Road. Arriving in 45 mins."
        );
    }

    #[test]
    fn placeholder_duration_falls_back_to_leg_estimate() {
        let mut view = transit("Skylink", "London Road");
        view.duration = PLACEHOLDER.into();
        let text = announcement_text(&LegView::Transit(view));
        assert!(text.ends_with("Arriving in 44 mins."));
    }

    #[test]
    fn walking_sentence_does_not_double_the_full_stop() {
        let view = WalkingLegView {
            position: LegPosition { number: 3, total: 3 },
            step_number: 3,
            instruction: "Walk to Queens Medical Centre.".into(),
            duration: PLACEHOLDER.into(),
            next_stop_name: "your destination".into(),
            progress_percent: 66.7,
        };
        assert_eq!(
            announcement_text(&LegView::Walking(view)),
            "Step 3 of 3. Walk to Queens Medical Centre. Next stop: your destination. Arriving in unknown."
        );
    }
}
