//! Where `settings.toml` lives.
//!
//! Resolution order:
//! 1. `$CLEAR_SPEECH_CONFIG_DIR`, if set and non-empty.
//! 2. The platform config dir from `dirs`:
//!    Windows `%APPDATA%\clear-speech\`,
//!    macOS `~/Library/Application Support/clear-speech/`,
//!    Linux `~/.config/clear-speech/`.
//! 3. `./clear-speech/` when the platform has no config dir.

use std::path::{Path, PathBuf};

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "CLEAR_SPEECH_CONFIG_DIR";

const APP_NAME: &str = "clear-speech";
const SETTINGS_FILE: &str = "settings.toml";

/// Resolved configuration locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    /// `config_dir/settings.toml`.
    pub settings_file: PathBuf,
}

impl AppPaths {
    /// Resolve from the environment, then the platform.
    pub fn new() -> Self {
        match std::env::var_os(CONFIG_DIR_ENV) {
            Some(dir) if !dir.is_empty() => Self::in_dir(PathBuf::from(dir)),
            _ => Self::in_dir(default_config_dir()),
        }
    }

    /// Paths rooted at an explicit directory.
    pub fn in_dir(config_dir: impl AsRef<Path>) -> Self {
        let config_dir = config_dir.as_ref().to_path_buf();
        Self {
            settings_file: config_dir.join(SETTINGS_FILE),
            config_dir,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_dir_is_named_after_the_app() {
        let dir = default_config_dir();
        assert!(dir.ends_with(APP_NAME));
    }

    #[test]
    fn explicit_dir_holds_settings_file() {
        let paths = AppPaths::in_dir("/tmp/cs");
        assert_eq!(paths.config_dir, PathBuf::from("/tmp/cs"));
        assert_eq!(paths.settings_file, PathBuf::from("/tmp/cs/settings.toml"));
    }
}
