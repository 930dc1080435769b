//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and handed to each
//! component at construction time.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::speech::{Accent, Gender};

// ---------------------------------------------------------------------------
// BackendConfig
// ---------------------------------------------------------------------------

/// Location of the remote backend serving `/api/text` and `/api/tts`.
///
/// When no base URL is set, analysis is unavailable and speech falls back to
/// the on-device voice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL, e.g. `https://speech-backend.example.com`.  `None` or a
    /// blank string means "not configured".
    pub base_url: Option<String>,
    /// Per-request timeout in seconds.  `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
}

impl BackendConfig {
    /// Backend config pointing at `base_url`, without a timeout.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            timeout_secs: None,
        }
    }

    /// Returns `true` when a non-blank base URL is set.
    pub fn is_configured(&self) -> bool {
        self.base().is_some()
    }

    /// Full URL for `path` (which must start with `/`), or `None` when no
    /// backend is configured.
    ///
    /// ```
    /// use clear_speech::config::BackendConfig;
    ///
    /// let cfg = BackendConfig::with_base_url("https://tts.example.com/");
    /// assert_eq!(cfg.endpoint("/api/tts").as_deref(), Some("https://tts.example.com/api/tts"));
    /// assert_eq!(BackendConfig::default().endpoint("/api/tts"), None);
    /// ```
    pub fn endpoint(&self, path: &str) -> Option<String> {
        self.base().map(|base| format!("{base}{path}"))
    }

    /// Build a `reqwest::Client` honouring `timeout_secs`.
    pub fn http_client(&self) -> reqwest::Client {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }
        builder.build().unwrap_or_else(|_| reqwest::Client::new())
    }

    fn base(&self) -> Option<&str> {
        self.base_url
            .as_deref()
            .map(|s| s.trim().trim_end_matches('/'))
            .filter(|s| !s.is_empty())
    }
}

// ---------------------------------------------------------------------------
// AnalysisConfig
// ---------------------------------------------------------------------------

/// Generation settings sent with every `/api/text` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Model identifier placed in the request envelope.
    pub model: String,
    /// Language of the instruction text (`"vi"` or `"en"`).
    pub prompt_language: String,
    /// Sampling temperature.  `0.0` keeps the output deterministic.
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-flash-lite-preview-02-05".into(),
            prompt_language: "vi".into(),
            temperature: 0.0,
            top_k: 1,
            top_p: 0.1,
        }
    }
}

// ---------------------------------------------------------------------------
// LocalSpeechConfig
// ---------------------------------------------------------------------------

/// Settings for the on-device speech engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalSpeechConfig {
    /// Speech synthesizer executable (must accept `espeak-ng` arguments).
    pub program: String,
    /// Seconds to wait for an utterance to finish.  `None` waits for as long
    /// as the engine keeps speaking.
    pub completion_timeout_secs: Option<u64>,
}

impl Default for LocalSpeechConfig {
    fn default() -> Self {
        Self {
            program: "espeak-ng".into(),
            completion_timeout_secs: None,
        }
    }
}

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// Window and form defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Accent pre-selected in the accent picker.
    pub default_accent: Accent,
    /// Gender pre-selected in the voice picker.
    pub default_gender: Gender,
    /// Initial inner window size `(width, height)` in points.
    pub window_size: (f32, f32),
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_accent: Accent::EnGb,
            default_gender: Gender::Female,
            window_size: (520.0, 420.0),
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use clear_speech::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Remote backend location.
    #[serde(default)]
    pub backend: BackendConfig,
    /// `/api/text` generation settings.
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// On-device speech engine settings.
    #[serde(default)]
    pub local_speech: LocalSpeechConfig,
    /// UI defaults.
    #[serde(default)]
    pub ui: UiConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
