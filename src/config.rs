//! Configuration management for Qabot
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.
//!
//! Precedence, lowest to highest: built-in defaults, YAML file,
//! environment variables, command-line flags.

use crate::error::{Result, QabotError};
use crate::providers::GenerationParams;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Provider identifiers accepted in `provider.type`
pub const SUPPORTED_PROVIDERS: &[&str] = &["gemini", "openai"];

/// Upper bound accepted for `generation.max_output_tokens`
pub const MAX_OUTPUT_TOKENS_LIMIT: u32 = 8192;

/// Main configuration structure for Qabot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Provider configuration (Gemini, OpenAI)
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Generation parameters sent with every request
    #[serde(default)]
    pub generation: GenerationConfig,
    /// History log settings
    #[serde(default)]
    pub history: HistoryConfig,
}

/// Provider configuration
///
/// Specifies which generation provider to use and its settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Type of provider to use
    #[serde(rename = "type", default = "default_provider_type")]
    pub provider_type: String,

    /// Google Gemini configuration
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// OpenAI configuration
    #[serde(default)]
    pub openai: OpenAiConfig,
}

fn default_provider_type() -> String {
    "gemini".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: default_provider_type(),
            gemini: GeminiConfig::default(),
            openai: OpenAiConfig::default(),
        }
    }
}

/// Google Gemini provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Model to use for Gemini
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// API base URL; overridable so tests can point at a mock server
    #[serde(default = "default_gemini_api_base")]
    pub api_base: String,

    /// API key; usually supplied through `GEMINI_API_KEY` instead
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_gemini_api_base() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: default_gemini_model(),
            api_base: default_gemini_api_base(),
            api_key: None,
        }
    }
}

/// OpenAI provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// Model to use for OpenAI
    #[serde(default = "default_openai_model")]
    pub model: String,

    /// API base URL; overridable so tests can point at a mock server
    #[serde(default = "default_openai_api_base")]
    pub api_base: String,

    /// API key; usually supplied through `OPENAI_API_KEY` instead
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
}

fn default_openai_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_openai_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            model: default_openai_model(),
            api_base: default_openai_api_base(),
            api_key: None,
        }
    }
}

/// Generation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Maximum tokens for a single reply
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Sampling temperature (0.0 - 2.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// HTTP timeout for one request (seconds)
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_max_output_tokens() -> u32 {
    500
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout_seconds() -> u64 {
    60
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_output_tokens: default_max_output_tokens(),
            temperature: default_temperature(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// History log configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Path of the JSON log file
    #[serde(default = "default_history_file")]
    pub file: PathBuf,

    /// Characters of input/output shown per entry when listing history
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
}

fn default_history_file() -> PathBuf {
    PathBuf::from("chat_history.json")
}

fn default_preview_chars() -> usize {
    200
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            file: default_history_file(),
            preview_chars: default_preview_chars(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            generation: GenerationConfig::default(),
            history: HistoryConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);
        config.apply_model_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| QabotError::Config(format!("Failed to read config file: {}", e)))?;
        Self::from_yaml(&contents)
    }

    /// Parse configuration from a YAML document
    pub fn from_yaml(contents: &str) -> Result<Self> {
        serde_yaml::from_str(contents)
            .map_err(|e| QabotError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(provider_type) = std::env::var("QABOT_PROVIDER") {
            self.provider.provider_type = provider_type;
        }

        if let Some(key) = non_blank_env("GEMINI_API_KEY").or_else(|| non_blank_env("GOOGLE_API_KEY"))
        {
            self.provider.gemini.api_key = Some(key);
        }

        if let Some(key) = non_blank_env("OPENAI_API_KEY") {
            self.provider.openai.api_key = Some(key);
        }

        if let Ok(max_tokens) = std::env::var("QABOT_MAX_OUTPUT_TOKENS") {
            match max_tokens.parse() {
                Ok(value) => self.generation.max_output_tokens = value,
                Err(_) => tracing::warn!("Invalid QABOT_MAX_OUTPUT_TOKENS: {}", max_tokens),
            }
        }

        if let Ok(temperature) = std::env::var("QABOT_TEMPERATURE") {
            match temperature.parse() {
                Ok(value) => self.generation.temperature = value,
                Err(_) => tracing::warn!("Invalid QABOT_TEMPERATURE: {}", temperature),
            }
        }

        if let Ok(timeout) = std::env::var("QABOT_TIMEOUT_SECONDS") {
            match timeout.parse() {
                Ok(value) => self.generation.timeout_seconds = value,
                Err(_) => tracing::warn!("Invalid QABOT_TIMEOUT_SECONDS: {}", timeout),
            }
        }

        if let Ok(file) = std::env::var("QABOT_HISTORY_FILE") {
            tracing::debug!(file = %file, "Env override: QABOT_HISTORY_FILE");
            self.history.file = PathBuf::from(file);
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        if let Some(provider) = &cli.provider {
            self.provider.provider_type = provider.clone();
        }

        if let Some(file) = &cli.history_file {
            self.history.file = file.clone();
        }
    }

    /// Model overrides land on whichever provider is active once both env
    /// and CLI have picked it; `--model` wins over `QABOT_MODEL`
    fn apply_model_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Ok(model) = std::env::var("QABOT_MODEL") {
            self.set_active_model(model);
        }

        if let Some(model) = &cli.model {
            self.set_active_model(model.clone());
        }
    }

    fn set_active_model(&mut self, model: String) {
        match self.provider.provider_type.as_str() {
            "openai" => self.provider.openai.model = model,
            _ => self.provider.gemini.model = model,
        }
    }

    /// Name of the model used by the active provider
    pub fn active_model(&self) -> &str {
        match self.provider.provider_type.as_str() {
            "openai" => &self.provider.openai.model,
            _ => &self.provider.gemini.model,
        }
    }

    /// Credential of the active provider, if one is configured and non-blank
    pub fn active_credential(&self) -> Option<&str> {
        let key = match self.provider.provider_type.as_str() {
            "openai" => self.provider.openai.api_key.as_deref(),
            "gemini" => self.provider.gemini.api_key.as_deref(),
            _ => None,
        };
        key.filter(|k| !k.trim().is_empty())
    }

    /// Generation parameters derived from this configuration
    pub fn generation_params(&self) -> GenerationParams {
        GenerationParams {
            max_output_tokens: self.generation.max_output_tokens,
            temperature: self.generation.temperature,
        }
    }

    /// Validate the configuration, including the provider credential
    ///
    /// # Errors
    ///
    /// Returns `QabotError::Config` for out-of-range settings and
    /// `QabotError::MissingCredentials` when no API key is available.
    pub fn validate(&self) -> Result<()> {
        self.validate_settings()?;

        if self.active_credential().is_none() {
            return Err(QabotError::MissingCredentials(format!(
                "{} (set {} or add api_key to the config file)",
                self.provider.provider_type,
                credential_env_hint(&self.provider.provider_type)
            ))
            .into());
        }

        Ok(())
    }

    /// Validate everything except the credential
    ///
    /// Used by commands that never call the provider, such as `history list`.
    pub fn validate_settings(&self) -> Result<()> {
        if self.provider.provider_type.is_empty() {
            return Err(QabotError::Config("Provider type cannot be empty".to_string()).into());
        }

        if !SUPPORTED_PROVIDERS.contains(&self.provider.provider_type.as_str()) {
            return Err(QabotError::Config(format!(
                "Invalid provider type: {}. Must be one of: {}",
                self.provider.provider_type,
                SUPPORTED_PROVIDERS.join(", ")
            ))
            .into());
        }

        if self.active_model().trim().is_empty() {
            return Err(QabotError::Config("Model name cannot be empty".to_string()).into());
        }

        if self.generation.max_output_tokens == 0 {
            return Err(
                QabotError::Config("max_output_tokens must be greater than 0".to_string()).into(),
            );
        }

        if self.generation.max_output_tokens > MAX_OUTPUT_TOKENS_LIMIT {
            return Err(QabotError::Config(format!(
                "max_output_tokens must be at most {}",
                MAX_OUTPUT_TOKENS_LIMIT
            ))
            .into());
        }

        if !(0.0..=2.0).contains(&self.generation.temperature) {
            return Err(QabotError::Config(
                "temperature must be between 0.0 and 2.0".to_string(),
            )
            .into());
        }

        if self.generation.timeout_seconds == 0 {
            return Err(
                QabotError::Config("timeout_seconds must be greater than 0".to_string()).into(),
            );
        }

        if self.history.file.as_os_str().is_empty() {
            return Err(QabotError::Config("history.file cannot be empty".to_string()).into());
        }

        Ok(())
    }
}

/// Environment variable a user should set for the given provider
pub fn credential_env_hint(provider_type: &str) -> &'static str {
    match provider_type {
        "openai" => "OPENAI_API_KEY",
        _ => "GEMINI_API_KEY",
    }
}

fn non_blank_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
