//! Thought-group validation.
//!
//! A thought group must not end on a lone closed-class function word
//! ("I go to the | market" is a bad split).  The word list is fixed.

use once_cell::sync::Lazy;
use regex::Regex;

/// Articles, prepositions, conjunctions and copulas that may not end a group.
pub const FUNCTION_WORDS: [&str; 13] = [
    "a", "an", "the", "in", "on", "at", "to", "of", "is", "are", "and", "but", "or",
];

// ASCII word boundaries: "piña" ends in the word "a".
static TRAILING_FUNCTION_WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)(?-u:\b)({})(?-u:\b)$", FUNCTION_WORDS.join("|")))
        .expect("function-word pattern is valid")
});

/// Returns `true` when `group`, trimmed, ends in one of [`FUNCTION_WORDS`].
pub fn ends_with_function_word(group: &str) -> bool {
    TRAILING_FUNCTION_WORD.is_match(group.trim())
}

/// Check a thought-group list.
///
/// `None` is invalid.  Otherwise the list is valid when no element ends in a
/// function word; an empty list is valid.
///
/// ```
/// use clear_speech::analysis::validate_thought_groups;
///
/// let good = vec!["I go".to_string(), "to the market".to_string()];
/// let bad = vec!["I go to the".to_string(), "market".to_string()];
/// assert!(validate_thought_groups(Some(&good)));
/// assert!(!validate_thought_groups(Some(&bad)));
/// assert!(!validate_thought_groups(None));
/// ```
pub fn validate_thought_groups(groups: Option<&[String]>) -> bool {
    match groups {
        Some(groups) => groups.iter().all(|g| !ends_with_function_word(g)),
        None => false,
    }
}
