//! Error types for Qabot
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.
//!
//! Variants fall into three user-facing families:
//!
//! - configuration errors, which are fatal before the menu is shown
//! - API errors, which abort a single turn without logging it
//! - storage errors, which are reported and treated as an empty history

use thiserror::Error;

/// Main error type for Qabot operations
#[derive(Error, Debug)]
pub enum QabotError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// No credential configured for the active provider
    #[error("Missing credentials for provider: {0}")]
    MissingCredentials(String),

    /// Provider-related errors (non-success status, malformed reply, transport)
    #[error("API error: {0}")]
    Api(String),

    /// Provider reported a rate-limit or quota condition
    #[error("Rate limit or quota exceeded: {0}")]
    RateLimited(String),

    /// Provider rejected the credential (401/403)
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Provider answered without any usable text
    #[error("Empty response from provider: {0}")]
    EmptyResponse(String),

    /// User input rejected before any request was made
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// History log errors (malformed JSON, failed writes)
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Terminal line editor errors
    #[error("Readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}

impl QabotError {
    /// True for errors that must halt startup
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_) | Self::MissingCredentials(_))
    }

    /// True for errors raised while talking to the generation provider
    pub fn is_api(&self) -> bool {
        matches!(
            self,
            Self::Api(_)
                | Self::RateLimited(_)
                | Self::Authentication(_)
                | Self::EmptyResponse(_)
        )
    }

    /// True for history log failures
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

/// Result type alias for Qabot operations
///
/// Uses `anyhow::Error` so callers can attach context; the concrete
/// `QabotError` is recovered with `downcast_ref` where the family matters.
pub type Result<T> = anyhow::Result<T>;

/// Look up the `QabotError` inside an `anyhow::Error`, if there is one
pub fn as_qabot_error(err: &anyhow::Error) -> Option<&QabotError> {
    err.downcast_ref::<QabotError>()
}
