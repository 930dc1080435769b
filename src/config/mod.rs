//! Configuration module for Clear Speech.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for each component,
//! `AppPaths` for cross-platform directories, and TOML persistence via
//! `AppConfig::load` / `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::{AppPaths, CONFIG_DIR_ENV};
pub use settings::{AnalysisConfig, AppConfig, BackendConfig, LocalSpeechConfig, UiConfig};
