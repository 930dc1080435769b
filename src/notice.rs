//! Status notices and display-field formatting.
//!
//! The UI has three read-only regions: a one-line notice, the IPA
//! transcription and the thought groups.  Empty regions show
//! [`PLACEHOLDER`]; thought groups are shown joined by [`GROUP_DELIMITER`]
//! and read back with [`split_groups`] when speaking.

use std::fmt;

/// Shown in a display region that has no content.
pub const PLACEHOLDER: &str = "—";

/// Separator between thought groups in the groups display.
pub const GROUP_DELIMITER: &str = " | ";

/// Severity of a [`Notice`]; drives its colour in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Ok,
    Warn,
    Error,
}

/// A one-line status message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Info, message)
    }

    pub fn ok(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Ok, message)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Warn, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Error, message)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Text for a display region: the value itself, or [`PLACEHOLDER`] when it
/// is missing or empty.
pub fn display_or_placeholder(value: Option<&str>) -> &str {
    match value {
        Some(s) if !s.is_empty() => s,
        _ => PLACEHOLDER,
    }
}

/// Join thought groups for display.  Returns `None` for an empty list so the
/// region shows the placeholder.
pub fn join_groups(groups: &[String]) -> Option<String> {
    let joined = groups.join(GROUP_DELIMITER);
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

/// Read thought groups back from the groups display.
///
/// A missing value or the placeholder yields an empty list; otherwise the
/// text is split on [`GROUP_DELIMITER`], trimmed, and empty pieces dropped.
pub fn split_groups(display: Option<&str>) -> Vec<String> {
    match display {
        Some(text) if !text.is_empty() && text != PLACEHOLDER => text
            .split(GROUP_DELIMITER)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}
