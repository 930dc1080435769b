//! Orchestrator: turns UI commands into backend calls and display updates.
//!
//! [`Orchestrator`] receives [`PipelineCommand`]s from the UI over a
//! `tokio::sync::mpsc` channel and writes results into [`SharedState`].
//!
//! # Command flow
//!
//! ```text
//! Speak { text, accent, gender, mode }
//!   └─▶ clear notice, trim text (empty → done)
//!         └─▶ read groups from the thought-groups display
//!               ├─ backend configured → RemoteSpeech (neural voice)
//!               └─ otherwise          → LocalSpeech  (on-device voice)
//!                     ├─ Ok  → notice naming the backend
//!                     └─ Err → error notice
//!
//! Analyze { text }
//!   └─▶ clear notice, trim text (empty → done)
//!         ├─ no backend → warning notice
//!         └─ Analyzer::analyze
//!               ├─ Ok  → write IPA + joined groups, ok notice
//!               └─ Err → error notice
//! ```
//!
//! Every command runs on its own task.  Requests are neither ordered nor
//! cancelled, so a slow response can overwrite the display after a newer
//! request has started.

use std::sync::{Arc, MutexGuard, PoisonError};

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::analysis::Analyzer;
use crate::config::BackendConfig;
use crate::notice::{join_groups, split_groups, Notice};
use crate::speech::{Accent, Gender, SpeechBackend, SpeechMode, UtteranceRequest};

use super::state::{AppState, SharedState};

// ---------------------------------------------------------------------------
// PipelineCommand
// ---------------------------------------------------------------------------

/// Commands sent from the UI thread to the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineCommand {
    /// Speak the input text.  `text` is sent untrimmed.
    Speak {
        text: String,
        accent: Accent,
        gender: Gender,
        mode: SpeechMode,
    },
    /// Fetch IPA and thought groups for the input text.
    Analyze { text: String },
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Drives the speak and analyze actions.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use clear_speech::analysis::ApiAnalyzer;
/// use clear_speech::config::AppConfig;
/// use clear_speech::pipeline::{new_shared_state, Orchestrator};
/// use clear_speech::speech::{EspeakPlatform, LocalSpeech, RemoteSpeech, RodioPlayer};
///
/// # async fn example() {
/// let config = AppConfig::default();
/// let orchestrator = Arc::new(Orchestrator::new(
///     new_shared_state(),
///     &config.backend,
///     Arc::new(ApiAnalyzer::from_config(&config.backend, &config.analysis)),
///     Arc::new(RemoteSpeech::new(&config.backend, Arc::new(RodioPlayer::new()))),
///     Arc::new(LocalSpeech::new(
///         Arc::new(EspeakPlatform::new(config.local_speech.program.clone())),
///         &config.local_speech,
///     )),
/// ));
///
/// let (command_tx, command_rx) = tokio::sync::mpsc::channel(16);
/// tokio::spawn(orchestrator.run(command_rx));
/// # drop(command_tx);
/// # }
/// ```
pub struct Orchestrator {
    state: SharedState,
    backend: BackendConfig,
    analyzer: Arc<dyn Analyzer>,
    remote: Arc<dyn SpeechBackend>,
    local: Arc<dyn SpeechBackend>,
}

impl Orchestrator {
    /// Create a new orchestrator.
    ///
    /// # Arguments
    ///
    /// * `state`   : shared display state (also read by the UI).
    /// * `backend` : decides between the remote and the local speech backend.
    /// * `analyzer`: IPA / thought-group analyzer.
    /// * `remote`  : neural speech backend.
    /// * `local`   : on-device speech backend.
    pub fn new(
        state: SharedState,
        backend: &BackendConfig,
        analyzer: Arc<dyn Analyzer>,
        remote: Arc<dyn SpeechBackend>,
        local: Arc<dyn SpeechBackend>,
    ) -> Self {
        Self {
            state,
            backend: backend.clone(),
            analyzer,
            remote,
            local,
        }
    }

    // -----------------------------------------------------------------------
    // Main async loop
    // -----------------------------------------------------------------------

    /// Run until `command_rx` is closed, then wait for handlers still in
    /// flight.
    pub async fn run(self: Arc<Self>, mut command_rx: mpsc::Receiver<PipelineCommand>) {
        let mut tasks = JoinSet::new();

        loop {
            tokio::select! {
                command = command_rx.recv() => match command {
                    Some(command) => {
                        let this = Arc::clone(&self);
                        tasks.spawn(async move { this.handle(command).await });
                    }
                    None => break,
                },
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                    if let Err(e) = joined {
                        log::error!("pipeline: handler task failed: {e}");
                    }
                }
            }
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                log::error!("pipeline: handler task failed: {e}");
            }
        }

        log::info!("pipeline: command channel closed, orchestrator shutting down");
    }

    /// Handle one command to completion.
    pub async fn handle(&self, command: PipelineCommand) {
        self.update(|st| st.in_flight += 1);

        match command {
            PipelineCommand::Speak {
                text,
                accent,
                gender,
                mode,
            } => self.speak(&text, accent, gender, mode).await,
            PipelineCommand::Analyze { text } => self.analyze(&text).await,
        }

        self.update(|st| st.in_flight = st.in_flight.saturating_sub(1));
    }

    // -----------------------------------------------------------------------
    // Handlers
    // -----------------------------------------------------------------------

    async fn speak(&self, text: &str, accent: Accent, gender: Gender, mode: SpeechMode) {
        self.set_notice(None);
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        let groups = split_groups(self.lock().thought_groups.as_deref());
        let request = UtteranceRequest::new(text, accent, gender, mode);
        let remote = self.backend.is_configured();
        let backend = if remote { &self.remote } else { &self.local };

        log::debug!(
            "pipeline: speak via {} ({:?}, {} groups)",
            backend.name(),
            mode,
            groups.len()
        );

        match backend.speak(&request, &groups).await {
            Ok(()) if remote => {
                self.set_notice(Some(Notice::ok(format!("Playing with the {}.", backend.name()))));
            }
            Ok(()) => {
                self.set_notice(Some(Notice::warn(format!(
                    "Played with the {}. Set a backend URL for a more natural voice.",
                    backend.name()
                ))));
            }
            Err(e) => {
                log::error!("pipeline: speak failed: {e}");
                self.set_notice(Some(Notice::error(e.to_string())));
            }
        }
    }

    async fn analyze(&self, text: &str) {
        self.set_notice(None);
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        if !self.backend.is_configured() {
            self.set_notice(Some(Notice::warn(
                "A backend URL is required to fetch IPA and thought groups.",
            )));
            return;
        }

        match self.analyzer.analyze(text).await {
            Ok(result) => {
                log::debug!(
                    "pipeline: analysis returned {} thought groups",
                    result.thought_groups.len()
                );
                self.update(|st| {
                    st.ipa = Some(result.ipa).filter(|ipa| !ipa.is_empty());
                    st.thought_groups = join_groups(&result.thought_groups);
                    st.notice = Some(Notice::ok("Fetched IPA and thought groups."));
                });
            }
            Err(e) => {
                log::error!("pipeline: analysis failed: {e}");
                self.set_notice(Some(Notice::error(e.to_string())));
            }
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn lock(&self) -> MutexGuard<'_, AppState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update(&self, f: impl FnOnce(&mut AppState)) {
        f(&mut self.lock());
    }

    fn set_notice(&self, notice: Option<Notice>) {
        self.update(|st| st.notice = notice);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
