//! Shared display state.
//!
//! [`AppState`] holds the three display regions of the window (notice,
//! IPA, thought groups) plus a count of requests in flight.  The
//! orchestrator writes it; the egui update loop reads it each frame.  The
//! thought-groups region is also an input: speaking reads it back to pace
//! the neural voice.
//!
//! [`SharedState`] is a type alias for `Arc<Mutex<AppState>>`, cheap to clone
//! and safe to share across threads.

use std::sync::{Arc, Mutex};

use crate::notice::Notice;

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// Shared application state, the single source of truth for the UI.
#[derive(Debug, Default)]
pub struct AppState {
    /// Status line.  `None` shows nothing.
    pub notice: Option<Notice>,

    /// IPA transcription from the last successful analysis.
    pub ipa: Option<String>,

    /// Thought groups from the last successful analysis, joined for display.
    pub thought_groups: Option<String>,

    /// Number of handlers currently running.  The UI shows a spinner while
    /// this is non-zero.
    pub in_flight: usize,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` while at least one request is being handled.
    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }
}

// ---------------------------------------------------------------------------
// SharedState
// ---------------------------------------------------------------------------

/// Thread-safe handle to [`AppState`].
///
/// Lock for a short critical section; do **not** hold the lock across
/// `.await` points.
pub type SharedState = Arc<Mutex<AppState>>;

/// Construct a new [`SharedState`] wrapping an empty [`AppState`].
pub fn new_shared_state() -> SharedState {
    Arc::new(Mutex::new(AppState::new()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
