//! Clear Speech, a pronunciation practice front-end.
//!
//! Type English text, fetch an IPA transcription and thought-group
//! segmentation from a language-model backend, and hear the text in a
//! natural or a clear speaking style through either an on-device voice or a
//! neural TTS backend.

pub mod analysis;
pub mod app;
pub mod config;
pub mod notice;
pub mod pipeline;
pub mod speech;
