use std::sync::Arc;
use wayfarer_common::LatLng;
use wayfarer_journey::{
    JourneyState, ParsedRoute, Step, TransitDetail, TransitStop, TransitStopList, TransitStops,
    TransitTables,
};
use wayfarer_speech::{AnnouncementCoordinator, RecordingAnnouncer, SpeechEvent, VoiceSettings};

fn tables() -> TransitTables {
    let p = LatLng::new(52.92, -1.47);
    let mut stops = TransitStops::new();
    stops.insert(
        "Red Arrow",
        TransitStopList::new(vec![
            TransitStop { stop_ref: None, name: "Derby Bus Station".into(), location: p },
            TransitStop { stop_ref: None, name: "Nottingham Victoria".into(), location: p },
        ]),
    );
    TransitTables {
        details: [TransitDetail {
            step_number: 2,
            line_name: Some("Red Arrow".into()),
            departure_stop: Some("Derby Bus Station".into()),
            arrival_stop: Some("Nottingham Victoria".into()),
            duration: Some("35 mins".into()),
            ..Default::default()
        }]
        .into_iter()
        .collect(),
        stops,
    }
}

#[test]
fn every_leg_change_cancels_then_speaks_the_new_leg() {
    let p = LatLng::new(52.92, -1.47);
    let route = ParsedRoute::new(vec![
        Step::walking(1, p, p, "Walk to Derby Bus Station"),
        Step::transit(2, p, p),
        Step::walking(3, p, p, "Walk to the Arena"),
    ])
    .unwrap();
    let tables = tables();
    let rec = Arc::new(RecordingAnnouncer::new());
    let mut coord = AnnouncementCoordinator::new(rec.clone(), VoiceSettings::default());

    let mut state = JourneyState::initialize(route);
    coord.announce(state.active().unwrap(), &tables);
    loop {
        let (next, transition) = state.advance();
        state = next;
        if !transition.leg_changed() {
            break;
        }
        coord.announce(state.active().unwrap(), &tables);
    }
    coord.silence();

    let events = rec.events();
    // cancel, speak per leg, plus the closing cancel
    assert_eq!(events.len(), 7);
    for pair in events[..6].chunks(2) {
        assert_eq!(pair[0], SpeechEvent::Cancel);
        assert!(matches!(pair[1], SpeechEvent::Speak(_)));
    }
    assert_eq!(events[6], SpeechEvent::Cancel);

    let spoken = rec.spoken();
    assert!(spoken[1].contains("Red Arrow") && spoken[1].contains("Next stop: Nottingham Victoria"));
    assert!(spoken[2].starts_with("Step 3 of 3. Walk to the Arena."));
    assert!(!spoken[2].contains("Red Arrow"));
}
