//! Neural TTS backend client.
//!
//! [`RemoteSpeech`] renders the request as SSML (pauses between thought
//! groups, slower prosody in clear mode), posts it with a neural voice name
//! to `POST {backend}/api/tts` and hands the returned audio to an
//! [`AudioPlayer`].

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::config::BackendConfig;

use super::playback::AudioPlayer;
use super::ssml::build_ssml;
use super::types::{SpeechMode, UtteranceRequest};
use super::voices::resolve_voice;
use super::{SpeechBackend, SpeechError};

/// JSON body of `/api/tts`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynthesisRequest {
    pub ssml: String,
    pub voice: String,
    /// Speaking-rate multiplier.
    pub rate: f32,
    /// Pitch shift in semitones.
    pub pitch: i32,
}

impl SynthesisRequest {
    /// Build the body for `request`.  Without groups the whole text is one
    /// group.
    pub fn new(request: &UtteranceRequest, groups: &[String]) -> Self {
        let whole_text = [request.text.clone()];
        let groups = if groups.is_empty() { &whole_text[..] } else { groups };
        let (rate, pitch) = match request.mode {
            SpeechMode::Natural => (1.0, -1),
            SpeechMode::Clear => (0.95, -2),
        };

        Self {
            ssml: build_ssml(&request.text, groups, request.mode),
            voice: resolve_voice(request.accent.locale(), request.gender.as_str()).to_string(),
            rate,
            pitch,
        }
    }
}

/// Speaks through the remote neural TTS backend.
pub struct RemoteSpeech {
    client: reqwest::Client,
    backend: BackendConfig,
    player: Arc<dyn AudioPlayer>,
}

impl RemoteSpeech {
    pub fn new(backend: &BackendConfig, player: Arc<dyn AudioPlayer>) -> Self {
        Self {
            client: backend.http_client(),
            backend: backend.clone(),
            player,
        }
    }
}

#[async_trait]
impl SpeechBackend for RemoteSpeech {
    /// Synthesize `request` remotely and start playback.
    ///
    /// Returns once the audio has been received; playback continues in the
    /// background.
    async fn speak(&self, request: &UtteranceRequest, groups: &[String]) -> Result<(), SpeechError> {
        let url = self
            .backend
            .endpoint("/api/tts")
            .ok_or(SpeechError::Configuration)?;

        let body = SynthesisRequest::new(request, groups);
        log::debug!("remote speech: POST {url} voice={} groups={}", body.voice, groups.len());

        let response = self.client.post(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let details = response.text().await?;
            return Err(SpeechError::RemoteSynthesis(details));
        }

        let audio = response.bytes().await?;
        self.player.play(audio.to_vec())
    }

    fn name(&self) -> &'static str {
        "neural voice (backend)"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
