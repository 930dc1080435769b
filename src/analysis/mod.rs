//! IPA and thought-group analysis.
//!
//! This module provides:
//! * [`Analyzer`]: async trait implemented by analysis backends.
//! * [`ApiAnalyzer`]: `/api/text` backend client.
//! * [`PromptBuilder`]: the fixed analysis instruction.
//! * [`recover_json`] / [`extract_generated_text`]: lenient parsing of model output.
//! * [`validate_thought_groups`]: the function-word rule for thought groups.
//! * [`AnalysisError`]: error variants for analysis requests.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use clear_speech::analysis::{Analyzer, ApiAnalyzer};
//! use clear_speech::config::AppConfig;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::load().unwrap_or_default();
//!     let analyzer = ApiAnalyzer::from_config(&config.backend, &config.analysis);
//!
//!     let result = analyzer.analyze("I would like a cup of tea").await.unwrap();
//!     println!("{} {}", result.ipa, result.thought_groups.join(" | "));
//! }
//! ```

pub mod client;
pub mod prompt;
pub mod recover;
pub mod validator;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use client::{AnalysisResult, Analyzer, ApiAnalyzer};
pub use prompt::PromptBuilder;
pub use recover::{extract_generated_text, recover_json};
pub use validator::{validate_thought_groups, FUNCTION_WORDS};

// ---------------------------------------------------------------------------
// AnalysisError
// ---------------------------------------------------------------------------

/// Errors that can occur while analysing text.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// No backend URL is configured.
    #[error("no backend URL is configured; set [backend] base_url to fetch IPA and thought groups")]
    Configuration,

    /// The backend answered with a non-success status; carries the body.
    #[error("text API error: {0}")]
    RemoteAnalysis(String),

    /// Neither the envelope nor the generated text yielded the expected JSON.
    #[error("invalid JSON from the text API: {0}")]
    MalformedResponse(String),

    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("text API request timed out")]
    Timeout,
}

impl From<reqwest::Error> for AnalysisError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AnalysisError::Timeout
        } else {
            AnalysisError::Request(e.to_string())
        }
    }
}
