use crate::{Announcer, SpeechError, SpeechRequest};
use std::sync::{Mutex, MutexGuard};

/// What a [`RecordingAnnouncer`] was asked to do, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum SpeechEvent {
    Cancel,
    Speak(SpeechRequest),
}

/// Sink that records calls instead of producing audio.
///
/// A failing recorder still records the `Speak` attempt before returning the
/// configured error.
#[derive(Debug, Default)]
pub struct RecordingAnnouncer {
    events: Mutex<Vec<SpeechEvent>>,
    failure: Mutex<Option<SpeechError>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl RecordingAnnouncer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(error: SpeechError) -> Self {
        let recorder = Self::default();
        recorder.fail_with(Some(error));
        recorder
    }

    /// Make subsequent `speak` calls fail, or succeed again with `None`.
    pub fn fail_with(&self, error: Option<SpeechError>) {
        *lock(&self.failure) = error;
    }

    pub fn events(&self) -> Vec<SpeechEvent> {
        lock(&self.events).clone()
    }

    /// Texts passed to `speak`, in order.
    pub fn spoken(&self) -> Vec<String> {
        lock(&self.events)
            .iter()
            .filter_map(|e| match e {
                SpeechEvent::Speak(req) => Some(req.text.clone()),
                SpeechEvent::Cancel => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        lock(&self.events).clear();
    }
}

impl Announcer for RecordingAnnouncer {
    fn speak(&self, request: SpeechRequest) -> Result<(), SpeechError> {
        lock(&self.events).push(SpeechEvent::Speak(request));
        match lock(&self.failure).clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn cancel(&self) {
        lock(&self.events).push(SpeechEvent::Cancel);
    }
}
