use crate::mode::Mode;
use chrono::{Local, SecondsFormat};
use serde::{Deserialize, Serialize};

/// One logged exchange
///
/// Field aliases accept logs written with the older
/// `user_input` / `ai_response` names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationRecord {
    /// When the exchange completed (ISO-8601, local offset)
    pub timestamp: String,
    /// Mode the exchange ran in
    pub mode: Mode,
    /// Text the user supplied
    #[serde(alias = "user_input")]
    pub input: String,
    /// Reply received from the provider
    #[serde(alias = "ai_response")]
    pub output: String,
}

impl ConversationRecord {
    /// Create a record stamped with the current time
    pub fn new(mode: Mode, input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            timestamp: now_iso8601(),
            mode,
            input: input.into(),
            output: output.into(),
        }
    }
}

/// Current local time as an ISO-8601 / RFC 3339 string with second precision
pub fn now_iso8601() -> String {
    Local::now().to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Shorten `text` to at most `max_chars` characters, appending `...` when cut
pub fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}
