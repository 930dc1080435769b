//! Pipeline module for the pronunciation coach.
//!
//! This module connects the window to the analysis and speech backends and
//! exposes the shared state that the UI reads every frame.
//!
//! # Architecture
//!
//! ```text
//! PipelineCommand (mpsc, from the egui buttons)
//!        │
//!        ▼
//! Orchestrator::run()  ← async tokio task, one task per command
//!        │
//!        ├─ Speak    → RemoteSpeech (backend URL set) or LocalSpeech
//!        └─ Analyze  → Analyzer → IPA + thought groups
//!
//! SharedState (Arc<Mutex<AppState>>) ←─── read by egui update() each frame
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tokio::sync::mpsc;
//! use clear_speech::pipeline::{new_shared_state, Orchestrator, PipelineCommand};
//!
//! # use clear_speech::analysis::Analyzer;
//! # use clear_speech::speech::SpeechBackend;
//! # fn make_analyzer() -> Arc<dyn Analyzer> { unimplemented!() }
//! # fn make_speech() -> Arc<dyn SpeechBackend> { unimplemented!() }
//! #[tokio::main]
//! async fn main() {
//!     let shared_state = new_shared_state();
//!     let orchestrator = Arc::new(Orchestrator::new(
//!         shared_state.clone(),
//!         &Default::default(),
//!         make_analyzer(),
//!         make_speech(),
//!         make_speech(),
//!     ));
//!
//!     let (command_tx, command_rx) = mpsc::channel(16);
//!     tokio::spawn(orchestrator.run(command_rx));
//!
//!     command_tx
//!         .send(PipelineCommand::Analyze { text: "I go to the shop".into() })
//!         .await
//!         .unwrap();
//! }
//! ```

pub mod runner;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use runner::{Orchestrator, PipelineCommand};
pub use state::{new_shared_state, AppState, SharedState};
