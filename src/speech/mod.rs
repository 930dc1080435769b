//! Speech output.
//!
//! This module provides:
//! * [`SpeechBackend`]: async trait implemented by both speech backends.
//! * [`LocalSpeech`]: on-device voice through a [`SpeechPlatform`]
//!   ([`EspeakPlatform`] by default).
//! * [`RemoteSpeech`]: neural voice from the `/api/tts` backend, played by
//!   an [`AudioPlayer`] ([`RodioPlayer`] by default).
//! * [`build_ssml`] / [`resolve_voice`]: request building for the backend.
//! * [`SpeechError`]: error variants for speech requests.
//!
//! # Choosing a backend
//!
//! The orchestrator uses [`RemoteSpeech`] whenever a backend URL is
//! configured and [`LocalSpeech`] otherwise.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use clear_speech::config::AppConfig;
//! use clear_speech::speech::{
//!     Accent, EspeakPlatform, Gender, LocalSpeech, SpeechBackend, SpeechMode, UtteranceRequest,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let platform = Arc::new(EspeakPlatform::new(config.local_speech.program.clone()));
//!     let local = LocalSpeech::new(platform, &config.local_speech);
//!
//!     let request = UtteranceRequest::new("Nice to meet you", Accent::EnGb, Gender::Female, SpeechMode::Clear);
//!     local.speak(&request, &[]).await.unwrap();
//! }
//! ```

pub mod local;
pub mod platform;
pub mod playback;
pub mod remote;
pub mod ssml;
pub mod types;
pub mod voices;

use async_trait::async_trait;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use local::{clear_speech_text, pick_voice, LocalSpeech};
pub use platform::{EspeakPlatform, PlatformVoice, SpeechPlatform, Speaking, Utterance};
pub use playback::{AudioPlayer, RodioPlayer};
pub use remote::{RemoteSpeech, SynthesisRequest};
pub use ssml::build_ssml;
pub use types::{Accent, Gender, SpeechMode, UtteranceRequest};
pub use voices::resolve_voice;

// ---------------------------------------------------------------------------
// SpeechError
// ---------------------------------------------------------------------------

/// Errors that can occur while speaking.
#[derive(Debug, Error)]
pub enum SpeechError {
    /// The neural backend was asked to speak but no backend URL is set.
    #[error("no backend URL is configured for neural speech")]
    Configuration,

    /// No usable on-device speech engine.
    #[error("on-device speech is not supported here: {0}")]
    UnsupportedPlatform(String),

    /// The TTS backend answered with a non-success status; carries the body.
    #[error("TTS error: {0}")]
    RemoteSynthesis(String),

    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request or utterance did not finish within the configured timeout.
    #[error("speech timed out")]
    Timeout,

    /// The audio payload could not be played.
    #[error("audio playback failed: {0}")]
    Playback(String),
}

impl From<reqwest::Error> for SpeechError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SpeechError::Timeout
        } else {
            SpeechError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// SpeechBackend trait
// ---------------------------------------------------------------------------

/// Async trait for anything that can speak an [`UtteranceRequest`].
///
/// `groups` are the thought groups currently on display; backends that
/// cannot pace by group ignore them.
#[async_trait]
pub trait SpeechBackend: Send + Sync {
    async fn speak(&self, request: &UtteranceRequest, groups: &[String]) -> Result<(), SpeechError>;

    /// Short human-readable name, used in status notices.
    fn name(&self) -> &'static str;
}
