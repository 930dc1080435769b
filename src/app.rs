//! Pronunciation coach window, egui/eframe application.
//!
//! # Architecture
//!
//! [`SpeechApp`] is the top-level [`eframe::App`].  It owns the form state
//! (input text, accent, gender) and two handles to the background side:
//!
//! * `command_tx` sends [`PipelineCommand`] to the orchestrator.
//! * `state` is the [`SharedState`] the orchestrator writes results into.
//!
//! # Layout
//!
//! | Region | Content |
//! |--------|---------|
//! | Input | Multi-line text box |
//! | Voice | Accent and gender pickers |
//! | Actions | "Speak naturally", "Speak clearly", "Analyze" |
//! | Notice | Last status line, coloured by [`NoticeKind`] |
//! | IPA | Transcription, or a placeholder |
//! | Thought groups | Groups joined by ` | `, or a placeholder |

use std::time::Duration;

use eframe::egui;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::config::AppConfig;
use crate::notice::{display_or_placeholder, Notice, NoticeKind};
use crate::pipeline::{PipelineCommand, SharedState};
use crate::speech::{Accent, Gender, SpeechMode};

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// The three buttons of the action row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SpeakNatural,
    SpeakClear,
    Analyze,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::SpeakNatural, Action::SpeakClear, Action::Analyze];

    pub fn label(self) -> &'static str {
        match self {
            Action::SpeakNatural => "Speak naturally",
            Action::SpeakClear => "Speak clearly",
            Action::Analyze => "Analyze",
        }
    }
}

/// Build the command for `action` from the current form values.
pub fn command_for(action: Action, text: &str, accent: Accent, gender: Gender) -> PipelineCommand {
    let speak = |mode| PipelineCommand::Speak {
        text: text.to_string(),
        accent,
        gender,
        mode,
    };
    match action {
        Action::SpeakNatural => speak(SpeechMode::Natural),
        Action::SpeakClear => speak(SpeechMode::Clear),
        Action::Analyze => PipelineCommand::Analyze {
            text: text.to_string(),
        },
    }
}

// ---------------------------------------------------------------------------
// SpeechApp
// ---------------------------------------------------------------------------

/// eframe application, the pronunciation coach window.
pub struct SpeechApp {
    // ── Form ─────────────────────────────────────────────────────────────
    /// Text typed by the user.
    pub input: String,
    pub accent: Accent,
    pub gender: Gender,

    // ── Background side ──────────────────────────────────────────────────
    /// Send commands to the background orchestrator.
    pub command_tx: mpsc::Sender<PipelineCommand>,
    /// Display state written by the orchestrator.
    pub state: SharedState,

    /// Spinner animation phase (increases each frame).
    spinner_phase: f32,
}

impl SpeechApp {
    /// Create a new [`SpeechApp`] with the pickers set from `config.ui`.
    pub fn new(command_tx: mpsc::Sender<PipelineCommand>, state: SharedState, config: &AppConfig) -> Self {
        Self {
            input: String::new(),
            accent: config.ui.default_accent,
            gender: config.ui.default_gender,
            command_tx,
            state,
            spinner_phase: 0.0,
        }
    }

    /// Queue the command for `action`.
    fn trigger(&mut self, action: Action) {
        let command = command_for(action, &self.input, self.accent, self.gender);
        let notice = match self.command_tx.try_send(command) {
            Ok(()) => return,
            Err(TrySendError::Full(_)) => {
                log::warn!("ui: dropped {:?}, command queue is full", action);
                Notice::warn("Still busy, try again in a moment.")
            }
            Err(TrySendError::Closed(_)) => {
                log::error!("ui: dropped {:?}, the background worker has stopped", action);
                Notice::error("The background worker has stopped. Restart the app.")
            }
        };
        let mut st = self.state.lock().unwrap_or_else(|p| p.into_inner());
        st.notice = Some(notice);
    }

    // ── Renderers ────────────────────────────────────────────────────────

    fn draw_input(&mut self, ui: &mut egui::Ui) {
        ui.label(egui::RichText::new("Text").color(egui::Color32::from_rgb(180, 180, 180)));
        ui.add(
            egui::TextEdit::multiline(&mut self.input)
                .hint_text("Type an English sentence…")
                .desired_rows(4)
                .desired_width(f32::INFINITY),
        );
    }

    fn draw_voice_pickers(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            egui::ComboBox::from_label("Accent")
                .selected_text(self.accent.label())
                .show_ui(ui, |ui| {
                    for accent in Accent::ALL {
                        ui.selectable_value(&mut self.accent, accent, accent.label());
                    }
                });
            egui::ComboBox::from_label("Voice")
                .selected_text(self.gender.as_str())
                .show_ui(ui, |ui| {
                    for gender in Gender::ALL {
                        ui.selectable_value(&mut self.gender, gender, gender.as_str());
                    }
                });
        });
    }

    fn draw_actions(&mut self, ui: &mut egui::Ui, busy: bool) {
        ui.horizontal(|ui| {
            for action in Action::ALL {
                if ui.button(action.label()).clicked() {
                    self.trigger(action);
                }
            }
            if busy {
                ui.label(
                    egui::RichText::new(self.spinner_char().to_string())
                        .color(egui::Color32::from_rgb(68, 136, 255)),
                );
            }
        });
    }

    fn draw_notice(ui: &mut egui::Ui, notice: Option<&Notice>) {
        match notice {
            Some(notice) => {
                ui.label(egui::RichText::new(notice.message.as_str()).color(notice_color(notice.kind)));
            }
            None => {
                ui.label("");
            }
        }
    }

    fn draw_field(ui: &mut egui::Ui, title: &str, value: Option<&str>) {
        ui.label(
            egui::RichText::new(title)
                .color(egui::Color32::from_rgb(180, 180, 180))
                .size(12.0),
        );
        ui.label(egui::RichText::new(display_or_placeholder(value)).size(15.0));
        ui.add_space(4.0);
    }

    /// A simple rotating ASCII spinner character driven by `spinner_phase`.
    fn spinner_char(&self) -> char {
        let chars = ['|', '/', '-', '\\'];
        let idx = (self.spinner_phase as usize) % chars.len();
        chars[idx]
    }
}

/// Colour for a notice of the given kind.
fn notice_color(kind: NoticeKind) -> egui::Color32 {
    match kind {
        NoticeKind::Info => egui::Color32::from_rgb(160, 160, 160),
        NoticeKind::Ok => egui::Color32::from_rgb(80, 200, 120),
        NoticeKind::Warn => egui::Color32::from_rgb(230, 180, 60),
        NoticeKind::Error => egui::Color32::from_rgb(255, 100, 80),
    }
}

// ---------------------------------------------------------------------------
// eframe::App impl
// ---------------------------------------------------------------------------

impl eframe::App for SpeechApp {
    /// Called every frame by eframe.  Snapshots the shared state, then
    /// renders the form and the display regions.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let (notice, ipa, groups, busy) = {
            let st = self.state.lock().unwrap_or_else(|p| p.into_inner());
            (st.notice.clone(), st.ipa.clone(), st.thought_groups.clone(), st.is_busy())
        };

        // Results arrive from another thread, so keep polling while idle too.
        if busy {
            self.spinner_phase = (self.spinner_phase + 0.08) % 4.0;
            ctx.request_repaint_after(Duration::from_millis(66));
        } else {
            ctx.request_repaint_after(Duration::from_millis(250));
        }

        let frame = egui::Frame::new()
            .fill(egui::Color32::from_rgb(30, 30, 30))
            .inner_margin(egui::Margin::same(12));

        egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
            ui.heading("Clear Speech");
            ui.separator();

            self.draw_input(ui);
            ui.add_space(6.0);
            self.draw_voice_pickers(ui);
            ui.add_space(6.0);
            self.draw_actions(ui, busy);

            ui.separator();
            Self::draw_notice(ui, notice.as_ref());
            ui.add_space(4.0);
            Self::draw_field(ui, "IPA", ipa.as_deref());
            Self::draw_field(ui, "Thought groups", groups.as_deref());
        });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        log::info!("Clear Speech window closing");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::new_shared_state;

    #[test]
    fn buttons_map_to_commands() {
        assert_eq!(
            command_for(Action::SpeakClear, "Hi", Accent::EnUs, Gender::Male),
            PipelineCommand::Speak {
                text: "Hi".into(),
                accent: Accent::EnUs,
                gender: Gender::Male,
                mode: SpeechMode::Clear,
            }
        );
        assert_eq!(
            command_for(Action::Analyze, "Hi", Accent::EnUs, Gender::Male),
            PipelineCommand::Analyze { text: "Hi".into() }
        );
    }

    #[test]
    fn pickers_start_from_config() {
        let (tx, _rx) = mpsc::channel(1);
        let mut config = AppConfig::default();
        config.ui.default_accent = Accent::EnUs;
        config.ui.default_gender = Gender::Male;

        let app = SpeechApp::new(tx, new_shared_state(), &config);
        assert_eq!(app.accent, Accent::EnUs);
        assert_eq!(app.gender, Gender::Male);
    }

    #[test]
    fn trigger_sends_current_form() {
        let (tx, mut rx) = mpsc::channel(1);
        let mut app = SpeechApp::new(tx, new_shared_state(), &AppConfig::default());
        app.input = "I go to the".into();

        app.trigger(Action::SpeakNatural);

        match rx.try_recv().unwrap() {
            PipelineCommand::Speak { text, accent, mode, .. } => {
                assert_eq!(text, "I go to the");
                assert_eq!(accent, Accent::EnGb);
                assert_eq!(mode, SpeechMode::Natural);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn full_queue_warns_instead_of_blocking() {
        let (tx, _rx) = mpsc::channel(1);
        let state = new_shared_state();
        let mut app = SpeechApp::new(tx, state.clone(), &AppConfig::default());

        app.trigger(Action::Analyze);
        app.trigger(Action::Analyze);

        let st = state.lock().unwrap();
        assert_eq!(st.notice.as_ref().map(|n| n.kind), Some(NoticeKind::Warn));
    }

    #[test]
    fn closed_channel_shows_an_error() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let state = new_shared_state();
        let mut app = SpeechApp::new(tx, state.clone(), &AppConfig::default());

        app.trigger(Action::SpeakClear);

        let st = state.lock().unwrap();
        assert_eq!(st.notice.as_ref().map(|n| n.kind), Some(NoticeKind::Error));
    }
}
