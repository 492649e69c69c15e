//! Dispatch modes and their prompt texts
//!
//! - FAQ mode: the input is a question to answer directly
//! - Summary mode: the input is long-form text to condense

use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fmt;

/// System instruction sent with FAQ requests
pub const FAQ_INSTRUCTION: &str = "You are a helpful FAQ assistant. Answer questions clearly, \
concisely, and accurately. If you don't know the answer, say so.";

/// System instruction sent with summary requests
pub const SUMMARY_INSTRUCTION: &str = "You are a text summarization expert. Provide clear, \
concise summaries that capture the main points of the given text.";

const SUMMARY_PREFIX: &str =
    "Please provide a clear and concise summary of the following text:\n\n";

/// Dispatch mode for a single exchange
///
/// Serialized as `"FAQ"` / `"SUMMARY"` in the history log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// Answer the input as a question
    #[serde(rename = "FAQ")]
    Faq,

    /// Condense the input
    #[serde(rename = "SUMMARY", alias = "SUMMARIZE")]
    Summary,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Faq => write!(f, "FAQ"),
            Self::Summary => write!(f, "SUMMARY"),
        }
    }
}

impl Mode {
    /// System instruction for this mode
    pub fn instruction(&self) -> &'static str {
        match self {
            Self::Faq => FAQ_INSTRUCTION,
            Self::Summary => SUMMARY_INSTRUCTION,
        }
    }

    /// Build the content sent to the provider from the user's text
    ///
    /// # Examples
    ///
    /// ```
    /// use qabot::mode::Mode;
    ///
    /// assert_eq!(Mode::Faq.build_content("What is Rust?"), "What is Rust?");
    /// assert!(Mode::Summary.build_content("long text").ends_with("\n\nlong text"));
    /// ```
    pub fn build_content(&self, user_text: &str) -> String {
        match self {
            Self::Faq => user_text.to_string(),
            Self::Summary => format!("{}{}", SUMMARY_PREFIX, user_text),
        }
    }

    /// Status line printed while a request is in flight
    pub fn progress_message(&self) -> &'static str {
        match self {
            Self::Faq => "Processing your question...",
            Self::Summary => "Generating summary...",
        }
    }

    /// Get a colored tag representation of this mode
    pub fn colored_tag(&self) -> String {
        match self {
            Self::Faq => format!("[{}]", "FAQ".cyan()),
            Self::Summary => format!("[{}]", "SUMMARY".purple()),
        }
    }
}
