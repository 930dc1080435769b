//! On-device speech backend.
//!
//! [`LocalSpeech`] speaks through a [`SpeechPlatform`].  Without SSML it
//! approximates clear mode by turning commas into full stops and lowering
//! rate and pitch.  Only one utterance plays at a time: the previous one is
//! cancelled before a new one starts.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::LocalSpeechConfig;

use super::platform::{PlatformVoice, SpeechPlatform, Utterance};
use super::types::{SpeechMode, UtteranceRequest};
use super::{SpeechBackend, SpeechError};

static COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*,\s*").expect("comma pattern is valid"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Rewrite `text` for clear-mode delivery.
///
/// Commas (with surrounding whitespace) become sentence breaks, whitespace
/// runs collapse to a single space and a final `.` is added unless the text
/// already ends with one.  Applying it twice gives the same result as once.
///
/// ```
/// use clear_speech::speech::clear_speech_text;
///
/// assert_eq!(clear_speech_text("Well ,  I   think so"), "Well. I think so.");
/// ```
pub fn clear_speech_text(text: &str) -> String {
    let broken = COMMA.replace_all(text, ". ");
    let mut out = WHITESPACE.replace_all(&broken, " ").into_owned();
    if !out.ends_with('.') {
        out.push('.');
    }
    out
}

/// Pick a voice for `locale` and `gender`.
///
/// Candidates are voices whose language tag starts with `locale` (ignoring
/// ASCII case).  The first candidate whose name contains `gender` (ignoring
/// case) wins; otherwise the first candidate; otherwise `None`.
pub fn pick_voice<'a>(
    voices: &'a [PlatformVoice],
    locale: &str,
    gender: &str,
) -> Option<&'a PlatformVoice> {
    let locale = locale.to_ascii_lowercase();
    let gender = gender.to_lowercase();
    let candidates: Vec<&PlatformVoice> = voices
        .iter()
        .filter(|v| v.lang.to_ascii_lowercase().starts_with(&locale))
        .collect();

    candidates
        .iter()
        .find(|v| v.name.to_lowercase().contains(&gender))
        .or_else(|| candidates.first())
        .copied()
}

/// `(rate, pitch)` multipliers for `mode`.
pub fn prosody(mode: SpeechMode) -> (f32, f32) {
    match mode {
        SpeechMode::Natural => (1.0, 0.9),
        SpeechMode::Clear => (0.9, 0.8),
    }
}

/// Speaks through the host speech engine.
pub struct LocalSpeech {
    platform: Arc<dyn SpeechPlatform>,
    completion_timeout: Option<Duration>,
}

impl LocalSpeech {
    pub fn new(platform: Arc<dyn SpeechPlatform>, config: &LocalSpeechConfig) -> Self {
        Self {
            platform,
            completion_timeout: config.completion_timeout_secs.map(Duration::from_secs),
        }
    }

    /// Installed voices, or an error when the engine is unusable.
    ///
    /// Probing may start host processes, so it runs off the async workers.
    async fn installed_voices(&self) -> Result<Vec<PlatformVoice>, SpeechError> {
        let platform = Arc::clone(&self.platform);
        tokio::task::spawn_blocking(move || platform.is_available().then(|| platform.voices()))
            .await
            .map_err(|e| SpeechError::UnsupportedPlatform(format!("voice probe failed: {e}")))?
            .ok_or_else(|| {
                SpeechError::UnsupportedPlatform("no on-device speech synthesizer is available".into())
            })
    }

    /// Build the utterance for `request` against `voices`.
    fn utterance(request: &UtteranceRequest, voices: &[PlatformVoice]) -> Utterance {
        let text = match request.mode {
            SpeechMode::Natural => request.text.clone(),
            SpeechMode::Clear => clear_speech_text(&request.text),
        };
        let locale = request.accent.locale();
        let voice = pick_voice(voices, locale, request.gender.as_str()).cloned();
        let (rate, pitch) = prosody(request.mode);

        Utterance {
            text,
            lang: locale.to_string(),
            voice,
            rate,
            pitch,
        }
    }
}

#[async_trait]
impl SpeechBackend for LocalSpeech {
    /// Speak `request` and wait until the engine reports it finished.
    ///
    /// Thought groups are not used; the engine has no pause markup.
    async fn speak(&self, request: &UtteranceRequest, _groups: &[String]) -> Result<(), SpeechError> {
        let voices = self.installed_voices().await?;
        let utterance = Self::utterance(request, &voices);
        log::debug!(
            "local speech: voice={:?} rate={} pitch={}",
            utterance.voice.as_ref().map(|v| v.name.as_str()),
            utterance.rate,
            utterance.pitch
        );

        self.platform.cancel();
        let mut speaking = self.platform.speak(utterance)?;

        let Some(limit) = self.completion_timeout else {
            return speaking.finished().await;
        };
        let outcome = tokio::time::timeout(limit, speaking.finished()).await;
        match outcome {
            Ok(result) => result,
            Err(_) => {
                speaking.stop();
                Err(SpeechError::Timeout)
            }
        }
    }

    fn name(&self) -> &'static str {
        "on-device voice"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::platform::Speaking;
    use crate::speech::types::{Accent, Gender};
    use std::sync::Mutex;
    use tokio::sync::{oneshot, Notify};

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    type Outcome = Result<(), SpeechError>;

    /// Records calls; finishes utterances immediately unless `hang` is set.
    /// `exit_error` makes every utterance fail.
    struct FakePlatform {
        available: bool,
        voices: Vec<PlatformVoice>,
        hang: bool,
        exit_error: Option<String>,
        calls: Mutex<Vec<String>>,
        spoken: Mutex<Vec<Utterance>>,
        pending: Mutex<Vec<oneshot::Sender<Outcome>>>,
        stops: Mutex<Vec<Arc<Notify>>>,
    }

    impl FakePlatform {
        fn new(voices: Vec<PlatformVoice>) -> Self {
            Self {
                available: true,
                voices,
                hang: false,
                exit_error: None,
                calls: Mutex::new(Vec::new()),
                spoken: Mutex::new(Vec::new()),
                pending: Mutex::new(Vec::new()),
                stops: Mutex::new(Vec::new()),
            }
        }
    }

    impl SpeechPlatform for FakePlatform {
        fn is_available(&self) -> bool {
            self.available
        }

        fn voices(&self) -> Vec<PlatformVoice> {
            self.voices.clone()
        }

        fn cancel(&self) {
            self.calls.lock().unwrap().push("cancel".into());
        }

        fn speak(&self, utterance: Utterance) -> Result<Speaking, SpeechError> {
            self.calls.lock().unwrap().push("speak".into());
            self.spoken.lock().unwrap().push(utterance);
            let (tx, rx) = oneshot::channel();
            let stop = Arc::new(Notify::new());
            self.stops.lock().unwrap().push(Arc::clone(&stop));
            if self.hang {
                self.pending.lock().unwrap().push(tx);
            } else {
                let outcome = match &self.exit_error {
                    Some(msg) => Err(SpeechError::UnsupportedPlatform(msg.clone())),
                    None => Ok(()),
                };
                let _ = tx.send(outcome);
            }
            Ok(Speaking::new(rx, stop))
        }
    }

    fn voice(lang: &str, name: &str) -> PlatformVoice {
        PlatformVoice {
            id: name.into(),
            lang: lang.into(),
            name: name.into(),
        }
    }

    fn request(text: &str, mode: SpeechMode) -> UtteranceRequest {
        UtteranceRequest::new(text, Accent::EnGb, Gender::Male, mode)
    }

    // -----------------------------------------------------------------------
    // clear_speech_text
    // -----------------------------------------------------------------------

    #[test]
    fn commas_become_sentence_breaks() {
        assert_eq!(
            clear_speech_text("First, second ,third"),
            "First. second. third."
        );
    }

    #[test]
    fn text_without_commas_is_collapsed_and_terminated() {
        assert_eq!(clear_speech_text("I  go\tto\n the market"), "I go to the market.");
    }

    #[test]
    fn rewrite_is_a_fixed_point() {
        for text in ["Hello, world", "one  two", "trailing space ", "a,b,,c", "done."] {
            let once = clear_speech_text(text);
            assert_eq!(clear_speech_text(&once), once, "input {text:?}");
        }
    }

    // -----------------------------------------------------------------------
    // pick_voice
    // -----------------------------------------------------------------------

    #[test]
    fn prefers_gender_match_within_locale() {
        let voices = vec![
            voice("en-US", "Samantha female"),
            voice("en-GB", "Daniel male"),
            voice("en-GB", "Kate female"),
        ];
        assert_eq!(pick_voice(&voices, "en-GB", "female").unwrap().name, "Kate female");
    }

    #[test]
    fn gender_match_is_a_plain_substring() {
        // "female" contains "male", so a female voice listed first wins.
        let voices = vec![voice("en-GB", "Kate female"), voice("en-GB", "Daniel male")];
        assert_eq!(pick_voice(&voices, "en-GB", "male").unwrap().name, "Kate female");
    }

    #[test]
    fn falls_back_to_first_locale_match() {
        let voices = vec![voice("en-US", "Alex"), voice("en-GB", "Serena"), voice("en-GB", "Oliver")];
        assert_eq!(pick_voice(&voices, "en-GB", "female").unwrap().name, "Serena");
    }

    #[test]
    fn no_locale_match_yields_none() {
        let voices = vec![voice("fr-FR", "Amélie female")];
        assert!(pick_voice(&voices, "en-GB", "female").is_none());
    }

    #[test]
    fn locale_match_ignores_case() {
        let voices = vec![voice("en-gb", "English_(Great_Britain) male")];
        assert!(pick_voice(&voices, "en-GB", "male").is_some());
    }

    // -----------------------------------------------------------------------
    // LocalSpeech
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn unavailable_platform_is_unsupported() {
        let mut platform = FakePlatform::new(vec![]);
        platform.available = false;
        let local = LocalSpeech::new(Arc::new(platform), &LocalSpeechConfig::default());

        let err = local.speak(&request("Hi", SpeechMode::Natural), &[]).await.unwrap_err();
        assert!(matches!(err, SpeechError::UnsupportedPlatform(_)));
    }

    #[tokio::test]
    async fn cancels_before_speaking() {
        let platform = Arc::new(FakePlatform::new(vec![]));
        let local = LocalSpeech::new(platform.clone(), &LocalSpeechConfig::default());

        local.speak(&request("Hi", SpeechMode::Natural), &[]).await.unwrap();

        assert_eq!(*platform.calls.lock().unwrap(), vec!["cancel", "speak"]);
    }

    #[tokio::test]
    async fn natural_mode_passes_text_through() {
        let platform = Arc::new(FakePlatform::new(vec![voice("en-GB", "Daniel male")]));
        let local = LocalSpeech::new(platform.clone(), &LocalSpeechConfig::default());

        local.speak(&request("Well, hello", SpeechMode::Natural), &[]).await.unwrap();

        let spoken = platform.spoken.lock().unwrap();
        assert_eq!(spoken[0].text, "Well, hello");
        assert_eq!(spoken[0].lang, "en-GB");
        assert_eq!((spoken[0].rate, spoken[0].pitch), (1.0, 0.9));
        assert_eq!(spoken[0].voice.as_ref().unwrap().name, "Daniel male");
    }

    #[tokio::test]
    async fn clear_mode_rewrites_and_slows_down() {
        let platform = Arc::new(FakePlatform::new(vec![]));
        let local = LocalSpeech::new(platform.clone(), &LocalSpeechConfig::default());

        local.speak(&request("Well, hello", SpeechMode::Clear), &[]).await.unwrap();

        let spoken = platform.spoken.lock().unwrap();
        assert_eq!(spoken[0].text, "Well. hello.");
        assert_eq!((spoken[0].rate, spoken[0].pitch), (0.9, 0.8));
        assert!(spoken[0].voice.is_none());
    }

    #[tokio::test]
    async fn configured_timeout_bounds_the_wait() {
        let mut platform = FakePlatform::new(vec![]);
        platform.hang = true;
        let platform = Arc::new(platform);
        let config = LocalSpeechConfig {
            completion_timeout_secs: Some(1),
            ..LocalSpeechConfig::default()
        };
        let local = LocalSpeech::new(platform.clone(), &config);

        let err = local.speak(&request("Hi", SpeechMode::Natural), &[]).await.unwrap_err();

        assert!(matches!(err, SpeechError::Timeout));
        // Only the timed-out utterance is stopped; nothing else is cancelled.
        assert_eq!(*platform.calls.lock().unwrap(), vec!["cancel", "speak"]);
        let stop = platform.stops.lock().unwrap()[0].clone();
        tokio::time::timeout(Duration::from_secs(1), stop.notified())
            .await
            .expect("timed-out utterance was stopped");
    }

    #[tokio::test]
    async fn engine_failure_is_an_error() {
        let mut platform = FakePlatform::new(vec![]);
        platform.exit_error = Some("espeak-ng exited with exit status: 3".into());
        let local = LocalSpeech::new(Arc::new(platform), &LocalSpeechConfig::default());

        let err = local.speak(&request("Hi", SpeechMode::Natural), &[]).await.unwrap_err();

        match err {
            SpeechError::UnsupportedPlatform(msg) => assert!(msg.contains("exited with")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn waits_for_completion_signal() {
        let mut platform = FakePlatform::new(vec![]);
        platform.hang = true;
        let platform = Arc::new(platform);
        let local = Arc::new(LocalSpeech::new(platform.clone(), &LocalSpeechConfig::default()));

        let task = {
            let local = Arc::clone(&local);
            tokio::spawn(async move { local.speak(&request("Hi", SpeechMode::Natural), &[]).await })
        };

        // Wait until the utterance has started, then check it is still pending.
        while platform.pending.lock().unwrap().is_empty() {
            tokio::task::yield_now().await;
        }
        assert!(!task.is_finished());

        let done = platform.pending.lock().unwrap().pop().unwrap();
        done.send(Ok(())).unwrap();
        assert!(task.await.unwrap().is_ok());
    }
}
