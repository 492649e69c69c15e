//! OpenAI provider implementation for Qabot
//!
//! Calls `/chat/completions` with a system message carrying the
//! instruction and a user message carrying the content.

use crate::config::OpenAiConfig;
use crate::error::{Result, QabotError};
use crate::providers::base::{classify_status, classify_transport};
use crate::providers::{GenerationParams, Provider};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const PROVIDER_NAME: &str = "openai";

/// OpenAI chat completions provider
pub struct OpenAiProvider {
    client: Client,
    config: OpenAiConfig,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiProvider {
    /// Create a new OpenAI provider instance
    ///
    /// # Errors
    ///
    /// Returns `MissingCredentials` if the config has no API key, or a
    /// provider error if the HTTP client cannot be built
    pub fn new(config: OpenAiConfig, timeout: Duration) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| QabotError::MissingCredentials(PROVIDER_NAME.to_string()))?;

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("qabot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| QabotError::Api(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(
            "Initialized OpenAI provider: base={}, model={}",
            config.api_base,
            config.model
        );

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.api_base.trim_end_matches('/')
        )
    }
}

fn extract_text(response: ChatResponse) -> Result<String> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| QabotError::EmptyResponse("OpenAI returned no choices".to_string()))?;

    match choice.message.content {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(QabotError::EmptyResponse(format!(
            "OpenAI choice has no content (finish reason: {})",
            choice.finish_reason.as_deref().unwrap_or("unknown")
        ))
        .into()),
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    async fn generate(
        &self,
        instruction: &str,
        content: &str,
        params: &GenerationParams,
    ) -> Result<String> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: instruction,
                },
                ChatMessage {
                    role: "user",
                    content,
                },
            ],
            max_tokens: params.max_output_tokens,
            temperature: params.temperature,
        };

        tracing::debug!(
            "Sending OpenAI request: model={}, content_chars={}",
            self.config.model,
            content.chars().count()
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("OpenAI request failed: {}", e);
                classify_transport(PROVIDER_NAME, e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("OpenAI returned error {}: {}", status, error_text);
            return Err(classify_status(PROVIDER_NAME, status, &error_text).into());
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse OpenAI response: {}", e);
            QabotError::Api(format!("Failed to parse OpenAI response: {}", e))
        })?;

        extract_text(chat_response)
    }

    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyed_config() -> OpenAiConfig {
        OpenAiConfig {
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_openai_provider_requires_key() {
        assert!(OpenAiProvider::new(OpenAiConfig::default(), Duration::from_secs(5)).is_err());
    }

    #[test]
    fn test_openai_provider_creation() {
        let provider = OpenAiProvider::new(keyed_config(), Duration::from_secs(5)).unwrap();
        assert_eq!(provider.name(), "openai");
        assert_eq!(provider.model(), "gpt-3.5-turbo");
        assert_eq!(
            provider.endpoint(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_request_serialization() {
        let request = ChatRequest {
            model: "gpt-3.5-turbo",
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "sys",
                },
                ChatMessage {
                    role: "user",
                    content: "hi",
                },
            ],
            max_tokens: 500,
            temperature: 0.7,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "hi");
        assert_eq!(value["max_tokens"], 500);
    }

    #[test]
    fn test_extract_text_first_choice() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"4"},"finish_reason":"stop"}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(response).unwrap(), "4");
    }

    #[test]
    fn test_extract_text_null_content() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":null},"finish_reason":"length"}]}"#,
        )
        .unwrap();
        let err = extract_text(response).unwrap_err();
        assert!(err.to_string().contains("length"));
    }

    #[test]
    fn test_extract_text_no_choices() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(extract_text(response).is_err());
    }
}
