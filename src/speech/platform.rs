//! Host speech engine abstraction and the `espeak-ng` implementation.
//!
//! [`SpeechPlatform`] is the seam between [`LocalSpeech`](super::LocalSpeech)
//! and whatever synthesizer the host provides.  It lists voices, starts an
//! utterance and cancels the current one.  Starting an utterance returns a
//! [`Speaking`] handle that resolves once the engine reports the utterance
//! finished, failed or was stopped.
//!
//! `is_available` and `voices` may block on the host; async callers run them
//! through `tokio::task::spawn_blocking`.

use std::process::Stdio;
use std::sync::{Arc, Mutex};

use once_cell::sync::OnceCell;
use tokio::process::Command;
use tokio::sync::{oneshot, Notify};

use super::SpeechError;

/// Outcome of one utterance.  A dropped sender counts as a normal finish.
pub type Completion = oneshot::Receiver<Result<(), SpeechError>>;

/// A voice installed on the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformVoice {
    /// Identifier passed back to the engine.
    pub id: String,
    /// Language tag, e.g. `en-GB` or `en-gb`.
    pub lang: String,
    /// Display name.
    pub name: String,
}

/// Everything the engine needs to speak one piece of text.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    /// Requested locale, always set.
    pub lang: String,
    /// Explicit voice; `None` leaves the choice to the engine.
    pub voice: Option<PlatformVoice>,
    /// Speaking rate multiplier (1.0 = engine default).
    pub rate: f32,
    /// Pitch multiplier (1.0 = engine default).
    pub pitch: f32,
}

/// Handle to one running utterance.
#[derive(Debug)]
pub struct Speaking {
    done: Completion,
    stop: Arc<Notify>,
}

impl Speaking {
    /// `done` reports the outcome; notifying `stop` ends this utterance only.
    pub fn new(done: Completion, stop: Arc<Notify>) -> Self {
        Self { done, stop }
    }

    /// Stop this utterance.  A stopped utterance finishes with `Ok(())`.
    pub fn stop(&self) {
        self.stop.notify_one();
    }

    /// Wait for the engine to finish.
    pub async fn finished(&mut self) -> Result<(), SpeechError> {
        (&mut self.done).await.unwrap_or(Ok(()))
    }
}

/// Host speech engine.
pub trait SpeechPlatform: Send + Sync {
    /// Whether the engine can be used at all.  May block.
    fn is_available(&self) -> bool;

    /// Installed voices.  May block.
    fn voices(&self) -> Vec<PlatformVoice>;

    /// Stop the current utterance, if any.
    fn cancel(&self);

    /// Start speaking `utterance`.
    fn speak(&self, utterance: Utterance) -> Result<Speaking, SpeechError>;
}

// ---------------------------------------------------------------------------
// EspeakPlatform
// ---------------------------------------------------------------------------

/// `espeak-ng` default speaking rate in words per minute.
const ESPEAK_DEFAULT_WPM: f32 = 175.0;
/// `espeak-ng` default pitch on its 0–99 scale.
const ESPEAK_DEFAULT_PITCH: f32 = 50.0;

/// Drives the `espeak-ng` command-line synthesizer.
///
/// Each utterance runs as a child process; [`cancel`](SpeechPlatform::cancel)
/// kills it.  Availability and the voice list are probed once and cached.
pub struct EspeakPlatform {
    program: String,
    available: OnceCell<bool>,
    voices: OnceCell<Vec<PlatformVoice>>,
    /// Stop signal of the most recent utterance.
    current: Mutex<Option<Arc<Notify>>>,
}

impl EspeakPlatform {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            available: OnceCell::new(),
            voices: OnceCell::new(),
            current: Mutex::new(None),
        }
    }

    fn probe(&self) -> bool {
        std::process::Command::new(&self.program)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn list_voices(&self) -> Vec<PlatformVoice> {
        match std::process::Command::new(&self.program)
            .arg("--voices=en")
            .output()
        {
            Ok(out) if out.status.success() => {
                parse_voice_list(&String::from_utf8_lossy(&out.stdout))
            }
            Ok(out) => {
                log::warn!("{}: voice listing exited with {}", self.program, out.status);
                Vec::new()
            }
            Err(e) => {
                log::warn!("{}: voice listing failed: {e}", self.program);
                Vec::new()
            }
        }
    }

    fn args(utterance: &Utterance) -> Vec<String> {
        let voice = utterance
            .voice
            .as_ref()
            .map(|v| v.id.clone())
            .unwrap_or_else(|| utterance.lang.to_ascii_lowercase());
        vec![
            "-v".into(),
            voice,
            "-s".into(),
            format!("{}", (utterance.rate * ESPEAK_DEFAULT_WPM).round() as u32),
            "-p".into(),
            format!("{}", (utterance.pitch * ESPEAK_DEFAULT_PITCH).round().min(99.0) as u32),
            "--".into(),
            utterance.text.clone(),
        ]
    }
}

impl SpeechPlatform for EspeakPlatform {
    fn is_available(&self) -> bool {
        *self.available.get_or_init(|| self.probe())
    }

    fn voices(&self) -> Vec<PlatformVoice> {
        self.voices.get_or_init(|| self.list_voices()).clone()
    }

    fn cancel(&self) {
        if let Ok(mut current) = self.current.lock() {
            if let Some(stop) = current.take() {
                stop.notify_one();
            }
        }
    }

    fn speak(&self, utterance: Utterance) -> Result<Speaking, SpeechError> {
        let mut child = Command::new(&self.program)
            .args(Self::args(&utterance))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SpeechError::UnsupportedPlatform(format!("{}: {e}", self.program)))?;

        let stop = Arc::new(Notify::new());
        let (done_tx, done_rx) = oneshot::channel();

        if let Ok(mut current) = self.current.lock() {
            *current = Some(Arc::clone(&stop));
        }

        let program = self.program.clone();
        let stop_signal = Arc::clone(&stop);
        tokio::spawn(async move {
            let outcome = tokio::select! {
                status = child.wait() => match status {
                    Ok(status) if status.success() => Ok(()),
                    Ok(status) => Err(SpeechError::UnsupportedPlatform(format!(
                        "{program} exited with {status}"
                    ))),
                    Err(e) => Err(SpeechError::UnsupportedPlatform(format!("{program}: {e}"))),
                },
                _ = stop_signal.notified() => {
                    log::debug!("local speech: utterance cancelled");
                    let _ = child.kill().await;
                    Ok(())
                }
            };
            if let Err(e) = &outcome {
                log::warn!("local speech: {e}");
            }
            let _ = done_tx.send(outcome);
        });

        Ok(Speaking::new(done_rx, stop))
    }
}

/// Parse `espeak-ng --voices` output.
///
/// ```text
/// Pty Language       Age/Gender VoiceName          File                 Other Languages
///  2  en-gb           --/M      English_(Great_Britain) gmw/en          (en 2)
///  5  en-us           --/F      English_(America)  gmw/en-US            (en 3)
/// ```
///
/// The gender column is appended to the display name as `male`/`female` so
/// that name-based voice matching works.
pub fn parse_voice_list(output: &str) -> Vec<PlatformVoice> {
    output
        .lines()
        .skip(1)
        .filter_map(|line| {
            let cols: Vec<&str> = line.split_whitespace().collect();
            if cols.len() < 5 {
                return None;
            }
            let lang = cols[1];
            let gender = match cols[2].rsplit('/').next() {
                Some("F") => "female",
                Some("M") => "male",
                _ => "",
            };
            let name = if gender.is_empty() {
                cols[3].to_string()
            } else {
                format!("{} {gender}", cols[3])
            };
            Some(PlatformVoice {
                id: lang.to_string(),
                lang: lang.to_string(),
                name,
            })
        })
        .collect()
}
