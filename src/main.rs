//! Application entry point, Clear Speech pronunciation coach.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Create [`tokio`] runtime (multi-thread, 2 workers).
//! 4. Build the analyzer and both speech backends from config.
//! 5. Spawn the orchestrator on the tokio runtime.
//! 6. Run [`eframe::run_native`], which blocks the main thread until the
//!    window is closed.

use std::sync::Arc;

use clear_speech::{
    analysis::{Analyzer, ApiAnalyzer},
    app::SpeechApp,
    config::AppConfig,
    pipeline::{new_shared_state, Orchestrator, PipelineCommand},
    speech::{EspeakPlatform, LocalSpeech, RemoteSpeech, RodioPlayer, SpeechBackend},
};
use eframe::egui;
use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// Native options builder
// ---------------------------------------------------------------------------

fn native_options(config: &AppConfig) -> eframe::NativeOptions {
    let (width, height) = config.ui.window_size;
    let vp = egui::ViewportBuilder::default()
        .with_title("Clear Speech")
        .with_inner_size([width, height])
        .with_min_inner_size([360.0, 300.0]);

    eframe::NativeOptions {
        viewport: vp,
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> eframe::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Clear Speech starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });
    match config.backend.base_url.as_deref() {
        Some(url) if config.backend.is_configured() => log::info!("Backend: {url}"),
        _ => log::info!("No backend configured; using the on-device voice"),
    }

    // 3. Tokio runtime
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("failed to create tokio runtime");

    // 4. Backends
    let analyzer: Arc<dyn Analyzer> =
        Arc::new(ApiAnalyzer::from_config(&config.backend, &config.analysis));
    let remote: Arc<dyn SpeechBackend> =
        Arc::new(RemoteSpeech::new(&config.backend, Arc::new(RodioPlayer::new())));
    let local: Arc<dyn SpeechBackend> = Arc::new(LocalSpeech::new(
        Arc::new(EspeakPlatform::new(config.local_speech.program.clone())),
        &config.local_speech,
    ));

    // 5. Orchestrator
    let state = new_shared_state();
    let (command_tx, command_rx) = mpsc::channel::<PipelineCommand>(16);
    let orchestrator = Arc::new(Orchestrator::new(
        Arc::clone(&state),
        &config.backend,
        analyzer,
        remote,
        local,
    ));
    rt.spawn(orchestrator.run(command_rx));

    // 6. Build the egui app and run it (blocks until the window is closed)
    let app = SpeechApp::new(command_tx, state, &config);
    let options = native_options(&config);

    eframe::run_native(
        "Clear Speech",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
}
