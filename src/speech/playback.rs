//! Playback of synthesized audio payloads.
//!
//! The remote backend returns an encoded audio file (MP3, WAV, OGG…).
//! [`RodioPlayer`] decodes it with `rodio` and plays it on the default
//! output device from a detached thread, so the caller only waits for the
//! network round trip, not for playback.

use std::io::Cursor;

use rodio::{Decoder, OutputStreamBuilder, Sink};

use super::SpeechError;

/// Starts playback of an encoded audio payload.
pub trait AudioPlayer: Send + Sync {
    /// Begin playing `audio` and return without waiting for it to finish.
    fn play(&self, audio: Vec<u8>) -> Result<(), SpeechError>;
}

/// Plays payloads on the default output device via `rodio`.
#[derive(Debug, Default, Clone)]
pub struct RodioPlayer;

impl RodioPlayer {
    pub fn new() -> Self {
        Self
    }
}

impl AudioPlayer for RodioPlayer {
    fn play(&self, audio: Vec<u8>) -> Result<(), SpeechError> {
        std::thread::Builder::new()
            .name("tts-playback".into())
            .spawn(move || {
                if let Err(e) = play_blocking(audio) {
                    log::warn!("playback failed: {e}");
                }
            })
            .map(|_| ())
            .map_err(|e| SpeechError::Playback(e.to_string()))
    }
}

/// Decode and play `audio`, blocking until the sink drains.
fn play_blocking(audio: Vec<u8>) -> Result<(), SpeechError> {
    let len = audio.len();
    let stream = OutputStreamBuilder::open_default_stream()
        .map_err(|e| SpeechError::Playback(format!("no audio output: {e}")))?;
    let source = Decoder::new(Cursor::new(audio))
        .map_err(|e| SpeechError::Playback(format!("cannot decode {len} bytes: {e}")))?;

    // rodio 0.21: Sink::connect_new takes &Mixer
    let sink = Sink::connect_new(stream.mixer());
    sink.append(source);
    log::debug!("playback: started ({len} bytes)");
    sink.sleep_until_end();
    Ok(())
}
