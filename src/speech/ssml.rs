//! SSML documents for the remote TTS backend.
//!
//! Thought groups are separated by `<break>` pauses; clear mode uses longer
//! pauses and slows the whole document down with a `<prosody>` wrapper.

use super::types::SpeechMode;

const NATURAL_BREAK: &str = r#"<break time="180ms"/>"#;
const CLEAR_BREAK: &str = r#"<break time="350ms"/>"#;
const CLEAR_PROSODY_RATE: &str = "0.95";

/// Escape the characters that would break the markup.
pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Build the `<speak>` document.
///
/// With no groups, `text` is wrapped as-is.  Otherwise each group is escaped
/// and the groups are joined with a pause for `mode`.
pub fn build_ssml(text: &str, groups: &[String], mode: SpeechMode) -> String {
    if groups.is_empty() {
        return format!("<speak>{text}</speak>");
    }

    let parts: Vec<String> = groups.iter().map(|g| escape(g)).collect();
    match mode {
        SpeechMode::Natural => format!("<speak>{}</speak>", parts.join(NATURAL_BREAK)),
        SpeechMode::Clear => format!(
            r#"<speak><prosody rate="{CLEAR_PROSODY_RATE}">{}</prosody></speak>"#,
            parts.join(CLEAR_BREAK)
        ),
    }
}
