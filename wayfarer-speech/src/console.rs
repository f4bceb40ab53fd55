//! A text stand-in for a speech engine: utterances are written word by word
//! at speaking pace, so cancelling mid-sentence is visible.

use crate::{Announcer, SpeechError, SpeechRequest};
use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Writer plus the utterance allowed to write to it. Both live under one lock
/// so a replaced utterance cannot write once `speak` or `cancel` returns.
struct Output {
    out: Box<dyn Write + Send>,
    current: Option<CancellationToken>,
    /// Whether the current utterance has started a line it has not ended.
    line_open: bool,
}

type SharedOutput = Arc<Mutex<Output>>;

fn lock(output: &SharedOutput) -> MutexGuard<'_, Output> {
    output.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Output {
    fn write_chunk(&mut self, chunk: &str) -> std::io::Result<()> {
        self.out.write_all(chunk.as_bytes())?;
        self.out.flush()
    }

    /// Cancel the current utterance and close its line, then hand the
    /// writer to `next`.
    fn replace(&mut self, next: Option<CancellationToken>) {
        if let Some(previous) = self.current.take() {
            previous.cancel();
        }
        if std::mem::take(&mut self.line_open) {
            if let Err(e) = self.write_chunk(" …\n") {
                warn!(target: "wayfarer::speech", error = %e, "console speech output failed");
            }
        }
        self.current = next;
    }
}

pub struct ConsoleAnnouncer {
    output: SharedOutput,
    words_per_minute: u32,
    prefix: String,
}

impl ConsoleAnnouncer {
    /// Speak to stdout.
    pub fn new(words_per_minute: u32) -> Self {
        Self::with_writer(words_per_minute, std::io::stdout())
    }

    pub fn with_writer(words_per_minute: u32, out: impl Write + Send + 'static) -> Self {
        Self {
            output: Arc::new(Mutex::new(Output {
                out: Box::new(out),
                current: None,
                line_open: false,
            })),
            words_per_minute: words_per_minute.max(1),
            prefix: "(voice) ".to_string(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    fn word_interval(&self, rate: Option<f32>) -> Duration {
        let rate = rate.filter(|r| r.is_finite() && *r > 0.0).unwrap_or(1.0);
        Duration::from_secs_f32(60.0 / self.words_per_minute as f32 / rate)
    }
}

fn check_language(tag: &str) -> Result<(), SpeechError> {
    let mut parts = tag.split('-');
    let primary = parts.next().unwrap_or_default();
    let primary_ok = (2..=3).contains(&primary.len()) && primary.chars().all(|c| c.is_ascii_alphabetic());
    let rest_ok = parts.all(|p| (1..=8).contains(&p.len()) && p.chars().all(|c| c.is_ascii_alphanumeric()));
    if primary_ok && rest_ok {
        Ok(())
    } else {
        Err(SpeechError::UnsupportedLanguage(tag.to_string()))
    }
}

/// Write one chunk on behalf of `token`'s utterance. Returns `false` once the
/// utterance has been replaced or the writer failed.
fn write_for(output: &SharedOutput, token: &CancellationToken, chunk: &str, ends_line: bool) -> bool {
    let mut output = lock(output);
    if token.is_cancelled() {
        return false;
    }
    if let Err(e) = output.write_chunk(chunk) {
        warn!(target: "wayfarer::speech", error = %e, "console speech output failed");
        return false;
    }
    output.line_open = !ends_line;
    true
}

impl Announcer for ConsoleAnnouncer {
    fn speak(&self, request: SpeechRequest) -> Result<(), SpeechError> {
        check_language(&request.language)?;
        if request.text.trim().is_empty() {
            return Err(SpeechError::Rejected("empty utterance".into()));
        }
        let handle = Handle::try_current()
            .map_err(|e| SpeechError::EngineUnavailable(e.to_string()))?;

        let token = CancellationToken::new();
        lock(&self.output).replace(Some(token.clone()));

        let output = self.output.clone();
        let prefix = self.prefix.clone();
        let interval = self.word_interval(request.rate);
        handle.spawn(async move {
            let words: Vec<&str> = request.text.split_whitespace().collect();
            for (i, word) in words.iter().enumerate() {
                let chunk = if i == 0 {
                    format!("{prefix}{word}")
                } else {
                    format!(" {word}")
                };
                if !write_for(&output, &token, &chunk, false) {
                    return;
                }
                tokio::select! {
                    _ = token.cancelled() => return,
                    _ = tokio::time::sleep(interval) => {}
                }
            }
            if write_for(&output, &token, "\n", true) {
                debug!(target: "wayfarer::speech", "utterance finished");
            }
        });
        Ok(())
    }

    fn cancel(&self) {
        lock(&self.output).replace(None);
    }
}

impl Drop for ConsoleAnnouncer {
    fn drop(&mut self) {
        lock(&self.output).replace(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VoiceSettings;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn language_tags_are_checked() {
        assert!(check_language("en-GB").is_ok());
        assert!(check_language("cy").is_ok());
        assert!(check_language("zh-Hant-TW").is_ok());
        assert!(check_language("").is_err());
        assert!(check_language("english please").is_err());
    }

    #[test]
    fn outside_a_runtime_the_engine_is_unavailable() {
        let sink = ConsoleAnnouncer::with_writer(170, Captured::default());
        let err = sink
            .speak(VoiceSettings::default().request("Step 1 of 1."))
            .unwrap_err();
        assert!(matches!(err, SpeechError::EngineUnavailable(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn utterance_is_written_word_by_word() {
        let out = Captured::default();
        let sink = ConsoleAnnouncer::with_writer(60, out.clone()).with_prefix("");
        sink.speak(VoiceSettings::default().request("Next stop: London Road."))
            .unwrap();

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(out.text(), "Next stop: London Road.\n");
    }

    #[tokio::test(start_paused = true)]
    async fn speaking_again_cuts_off_the_previous_utterance() {
        let out = Captured::default();
        let sink = ConsoleAnnouncer::with_writer(60, out.clone()).with_prefix("");
        let voice = VoiceSettings::default();

        sink.speak(voice.request("one two three four five")).unwrap();
        tokio::time::sleep(Duration::from_millis(1500)).await;
        sink.speak(voice.request("six")).unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(out.text(), "one two …\nsix\n");
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_output() {
        let out = Captured::default();
        let sink = ConsoleAnnouncer::with_writer(60, out.clone()).with_prefix("");
        sink.speak(VoiceSettings::default().request("alpha beta gamma")).unwrap();
        tokio::time::sleep(Duration::from_millis(500)).await;
        sink.cancel();
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(out.text(), "alpha …\n");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn replaced_utterance_never_writes_after_the_new_one_starts() {
        let out = Captured::default();
        let sink = ConsoleAnnouncer::with_writer(60_000, out.clone()).with_prefix("");
        let voice = VoiceSettings::default();

        for round in 0..50 {
            let start = out.text().len();
            sink.speak(voice.request("old1 old2 old3 old4 old5 old6")).unwrap();
            tokio::time::sleep(Duration::from_millis(2)).await;
            sink.cancel();
            sink.speak(voice.request("new1 new2")).unwrap();
            tokio::time::sleep(Duration::from_millis(50)).await;

            let text = out.text();
            let round_text = &text[start..];
            let new_at = round_text
                .find("new1")
                .unwrap_or_else(|| panic!("round {round}: no new utterance in {round_text:?}"));
            assert_eq!(&round_text[new_at..], "new1 new2\n", "round {round}");
            if new_at > 0 {
                assert!(round_text[..new_at].ends_with('\n'), "round {round}: {round_text:?}");
            }
        }
    }
}
