use crate::{Announcer, SpeechError, VoiceSettings};
use std::sync::Arc;
use tracing::{info, warn};
use wayfarer_journey::{SequencerState, TransitTables, announcement_text, derive_leg_view};

/// What became of an announcement request.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnouncementOutcome {
    /// Handed to the sink.
    Announced { text: String },
    /// The sink refused it; the journey carries on without audio.
    Silenced { text: String, reason: SpeechError },
}

impl AnnouncementOutcome {
    pub fn text(&self) -> &str {
        match self {
            AnnouncementOutcome::Announced { text } | AnnouncementOutcome::Silenced { text, .. } => {
                text
            }
        }
    }

    pub fn is_silenced(&self) -> bool {
        matches!(self, AnnouncementOutcome::Silenced { .. })
    }
}

/// Keeps narration in step with the current leg.
///
/// Every announcement cancels the previous utterance first, composes its text
/// from a view derived at that moment, and only then speaks. Sink failures
/// are logged and reported, never propagated.
pub struct AnnouncementCoordinator {
    announcer: Arc<dyn Announcer>,
    voice: VoiceSettings,
    repeat_available: bool,
}

impl AnnouncementCoordinator {
    pub fn new(announcer: Arc<dyn Announcer>, voice: VoiceSettings) -> Self {
        Self {
            announcer,
            voice,
            repeat_available: false,
        }
    }

    /// Announce the current leg of `state`.
    pub fn announce(
        &mut self,
        state: &SequencerState,
        tables: &TransitTables,
    ) -> AnnouncementOutcome {
        self.announcer.cancel();
        let text = announcement_text(&derive_leg_view(state, tables));
        self.repeat_available = true;

        match self.announcer.speak(self.voice.request(text.clone())) {
            Ok(()) => {
                info!(
                    target: "wayfarer::speech",
                    leg = state.position().number,
                    "announcement started"
                );
                AnnouncementOutcome::Announced { text }
            }
            Err(reason) => {
                warn!(
                    target: "wayfarer::speech",
                    leg = state.position().number,
                    error = %reason,
                    "announcement unavailable; continuing silently"
                );
                AnnouncementOutcome::Silenced { text, reason }
            }
        }
    }

    /// Re-announce from the state as it is now. Same derivation as
    /// [`announce`](Self::announce); no text is cached between calls.
    pub fn repeat(&mut self, state: &SequencerState, tables: &TransitTables) -> AnnouncementOutcome {
        self.announce(state, tables)
    }

    /// Cancel any utterance and drop the repeat affordance.
    pub fn silence(&mut self) {
        self.announcer.cancel();
        self.repeat_available = false;
    }

    pub fn repeat_available(&self) -> bool {
        self.repeat_available
    }

    pub fn voice(&self) -> &VoiceSettings {
        &self.voice
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RecordingAnnouncer, SpeechEvent};
    use wayfarer_common::LatLng;
    use wayfarer_journey::{Advance, ParsedRoute, Step, TransitDetail};

    fn two_legs() -> (SequencerState, TransitTables) {
        let p = LatLng::new(52.92, -1.47);
        let route = ParsedRoute::new(vec![
            Step::walking(1, p, p, "Walk to Derby Bus Station").with_duration("5 mins"),
            Step::transit(2, p, p).with_duration("40 mins"),
        ])
        .unwrap();
        let tables = TransitTables {
            details: [TransitDetail {
                step_number: 2,
                line_name: Some("Skylink".into()),
                departure_stop: Some("Derby Bus Station".into()),
                arrival_stop: Some("Queens Medical Centre".into()),
                ..Default::default()
            }]
            .into_iter()
            .collect(),
            ..Default::default()
        };
        (SequencerState::initialize(route).unwrap(), tables)
    }

    #[test]
    fn cancel_comes_before_speak() {
        let rec = Arc::new(RecordingAnnouncer::new());
        let mut coord = AnnouncementCoordinator::new(rec.clone(), VoiceSettings::default());
        let (state, tables) = two_legs();

        let outcome = coord.announce(&state, &tables);
        assert!(!outcome.is_silenced());

        let events = rec.events();
        assert_eq!(events[0], SpeechEvent::Cancel);
        assert!(matches!(&events[1], SpeechEvent::Speak(r) if r.language == "en-GB"));
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn repeat_follows_the_state_it_is_given() {
        let rec = Arc::new(RecordingAnnouncer::new());
        let mut coord = AnnouncementCoordinator::new(rec.clone(), VoiceSettings::default());
        let (state, tables) = two_legs();

        coord.announce(&state, &tables);
        let Advance::Next(state) = state.advance() else {
            panic!("two legs")
        };
        let outcome = coord.repeat(&state, &tables);
        assert!(outcome.text().contains("Take the Skylink"));
        assert!(rec.spoken()[0].starts_with("Step 1 of 2."));
    }

    #[test]
    fn sink_failure_is_reported_not_raised() {
        let rec = Arc::new(RecordingAnnouncer::failing(SpeechError::EngineUnavailable(
            "no audio device".into(),
        )));
        let mut coord = AnnouncementCoordinator::new(rec.clone(), VoiceSettings::default());
        let (state, tables) = two_legs();

        let outcome = coord.announce(&state, &tables);
        assert!(outcome.is_silenced());
        assert!(outcome.text().starts_with("Step 1 of 2."));
        assert!(coord.repeat_available());
    }

    #[test]
    fn silence_cancels_and_clears_repeat() {
        let rec = Arc::new(RecordingAnnouncer::new());
        let mut coord = AnnouncementCoordinator::new(rec.clone(), VoiceSettings::default());
        let (state, tables) = two_legs();
        coord.announce(&state, &tables);
        rec.clear();

        coord.silence();
        assert_eq!(rec.events(), vec![SpeechEvent::Cancel]);
        assert!(!coord.repeat_available());
    }
}
