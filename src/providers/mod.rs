//! Provider module for Qabot
//!
//! This module contains the generation provider abstraction and the
//! Gemini and OpenAI implementations.

pub mod base;
pub mod gemini;
pub mod openai;

pub use base::{GenerationParams, Provider};
pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;

use crate::config::Config;
use crate::error::{Result, QabotError};
use std::time::Duration;

/// Create the provider selected by `config.provider.provider_type`
///
/// # Errors
///
/// Returns error if the provider type is unknown or the provider has no
/// credential configured
///
/// # Examples
///
/// ```
/// use qabot::config::Config;
/// use qabot::providers::{create_provider, Provider};
///
/// let mut config = Config::default();
/// config.provider.gemini.api_key = Some("key".to_string());
/// let provider = create_provider(&config).unwrap();
/// assert_eq!(provider.name(), "gemini");
/// ```
pub fn create_provider(config: &Config) -> Result<Box<dyn Provider>> {
    let timeout = Duration::from_secs(config.generation.timeout_seconds);

    match config.provider.provider_type.as_str() {
        "gemini" => Ok(Box::new(GeminiProvider::new(
            config.provider.gemini.clone(),
            timeout,
        )?)),
        "openai" => Ok(Box::new(OpenAiProvider::new(
            config.provider.openai.clone(),
            timeout,
        )?)),
        other => Err(QabotError::Config(format!("Unknown provider type: {}", other)).into()),
    }
}
