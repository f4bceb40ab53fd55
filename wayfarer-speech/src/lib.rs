//! Speech output for journey announcements.
//!
//! An [`Announcer`] is a fire-and-forget sink: `speak` queues an utterance and
//! returns at once, `cancel` silences whatever is playing. The
//! [`AnnouncementCoordinator`] owns the ordering rules on top of a sink.

pub mod console;
pub mod coordinator;
pub mod recording;

pub use console::ConsoleAnnouncer;
pub use coordinator::{AnnouncementCoordinator, AnnouncementOutcome};
pub use recording::{RecordingAnnouncer, SpeechEvent};

/// Why a sink could not take an utterance. Always recovered by the caller.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SpeechError {
    #[error("speech engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("utterance rejected: {0}")]
    Rejected(String),
}

/// One utterance handed to a sink.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechRequest {
    pub text: String,
    /// BCP 47 tag such as `en-GB`.
    pub language: String,
    /// Relative speaking rate, `1.0` being the engine default.
    pub rate: Option<f32>,
}

/// Voice parameters applied to every announcement.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceSettings {
    pub language: String,
    pub rate: Option<f32>,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            language: "en-GB".to_string(),
            rate: None,
        }
    }
}

impl VoiceSettings {
    pub fn request(&self, text: impl Into<String>) -> SpeechRequest {
        SpeechRequest {
            text: text.into(),
            language: self.language.clone(),
            rate: self.rate,
        }
    }
}

/// A speech-output sink.
///
/// Neither method blocks on playback. Implementations must tolerate `cancel`
/// with nothing playing.
pub trait Announcer: Send + Sync {
    fn speak(&self, request: SpeechRequest) -> Result<(), SpeechError>;
    fn cancel(&self);
}

/// Sink used when speech is switched off. Accepts everything, says nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAnnouncer;

impl Announcer for SilentAnnouncer {
    fn speak(&self, request: SpeechRequest) -> Result<(), SpeechError> {
        tracing::trace!(target: "wayfarer::speech", text = %request.text, "speech disabled; dropping utterance");
        Ok(())
    }

    fn cancel(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voice_settings_fill_the_request() {
        let voice = VoiceSettings {
            language: "fr-FR".into(),
            rate: Some(0.8),
        };
        let req = voice.request("Bonjour");
        assert_eq!(req.language, "fr-FR");
        assert_eq!(req.rate, Some(0.8));
        assert_eq!(req.text, "Bonjour");
    }

    #[test]
    fn silent_sink_accepts_everything() {
        let sink = SilentAnnouncer;
        sink.cancel();
        assert!(sink.speak(VoiceSettings::default().request("anything")).is_ok());
    }
}
