//! Neural voice names used by the remote TTS backend.

/// `"accent:gender"` → backend voice name.
pub const NEURAL_VOICES: [(&str, &str); 4] = [
    ("en-GB:female", "en-GB-Neural2-C"),
    ("en-GB:male", "en-GB-Neural2-D"),
    ("en-US:female", "en-US-Neural2-F"),
    ("en-US:male", "en-US-Neural2-J"),
];

const DEFAULT_GB_VOICE: &str = "en-GB-Neural2-C";
const DEFAULT_US_VOICE: &str = "en-US-Neural2-F";

/// Voice name for an accent/gender pair.
///
/// Unknown pairs fall back to the British default when `accent` is `en-GB`
/// and to the American default otherwise.
///
/// ```
/// use clear_speech::speech::resolve_voice;
///
/// assert_eq!(resolve_voice("en-US", "male"), "en-US-Neural2-J");
/// assert_eq!(resolve_voice("fr-FR", "female"), "en-US-Neural2-F");
/// ```
pub fn resolve_voice(accent: &str, gender: &str) -> &'static str {
    let key = format!("{accent}:{gender}");
    NEURAL_VOICES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, voice)| *voice)
        .unwrap_or(if accent == "en-GB" {
            DEFAULT_GB_VOICE
        } else {
            DEFAULT_US_VOICE
        })
}
