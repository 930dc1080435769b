//! Speech request types shared by both backends.

use std::fmt;

use serde::{Deserialize, Serialize};

/// English accent of the requested voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Accent {
    #[serde(rename = "en-GB")]
    EnGb,
    #[serde(rename = "en-US")]
    EnUs,
}

impl Accent {
    pub const ALL: [Accent; 2] = [Accent::EnGb, Accent::EnUs];

    /// BCP-47 locale tag.
    pub fn locale(self) -> &'static str {
        match self {
            Accent::EnGb => "en-GB",
            Accent::EnUs => "en-US",
        }
    }

    /// Label for the accent picker.
    pub fn label(self) -> &'static str {
        match self {
            Accent::EnGb => "British (en-GB)",
            Accent::EnUs => "American (en-US)",
        }
    }
}

impl fmt::Display for Accent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.locale())
    }
}

/// Voice gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Female, Gender::Male];

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Female => "female",
            Gender::Male => "male",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Speaking style.
///
/// | Mode | Pacing | Pitch |
/// |------|--------|-------|
/// | `Natural` | normal, short pauses between thought groups | slightly lowered |
/// | `Clear` | slower, long pauses, commas become full stops | lowered further |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechMode {
    Natural,
    Clear,
}

/// One "speak this" request from the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtteranceRequest {
    /// Text to speak; callers pass it already trimmed and non-empty.
    pub text: String,
    pub accent: Accent,
    pub gender: Gender,
    pub mode: SpeechMode,
}

impl UtteranceRequest {
    pub fn new(text: impl Into<String>, accent: Accent, gender: Gender, mode: SpeechMode) -> Self {
        Self {
            text: text.into(),
            accent,
            gender,
            mode,
        }
    }
}
