//! Base provider trait and common types for Qabot
//!
//! This module defines the `Provider` capability that every generation
//! backend implements, plus the helpers the backends share for turning
//! HTTP failures into `QabotError` values.

use crate::error::{Result, QabotError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Generation parameters sent with every request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Maximum tokens in the reply
    pub max_output_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_output_tokens: 500,
            temperature: 0.7,
        }
    }
}

/// Text generation capability
///
/// Implementations send exactly one request per call and never retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Provider: Send + Sync {
    /// Generate a reply for `content` under the system `instruction`
    ///
    /// # Arguments
    ///
    /// * `instruction` - System instruction describing the task
    /// * `content` - User content
    /// * `params` - Generation parameters
    ///
    /// # Returns
    ///
    /// Returns the raw reply text
    ///
    /// # Errors
    ///
    /// Returns an API-family `QabotError` if the request fails, the provider
    /// reports an error status, or the reply carries no text
    async fn generate(
        &self,
        instruction: &str,
        content: &str,
        params: &GenerationParams,
    ) -> Result<String>;

    /// Short provider identifier ("gemini", "openai")
    fn name(&self) -> &str;

    /// Model the provider sends requests to
    fn model(&self) -> &str;
}

/// Map a non-success HTTP status to the matching error variant
///
/// 429 is a rate-limit or quota condition, 401/403 an authentication
/// failure, anything else a generic API error.
pub(crate) fn classify_status(
    provider: &str,
    status: reqwest::StatusCode,
    body: &str,
) -> QabotError {
    let detail = extract_error_message(body).unwrap_or_else(|| body.trim().to_string());

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS || body.contains("RESOURCE_EXHAUSTED") {
        QabotError::RateLimited(format!("{} returned {}: {}", provider, status, detail))
    } else if status == reqwest::StatusCode::UNAUTHORIZED
        || status == reqwest::StatusCode::FORBIDDEN
    {
        QabotError::Authentication(format!(
            "{} rejected the API key ({}): {}",
            provider, status, detail
        ))
    } else {
        QabotError::Api(format!("{} returned error {}: {}", provider, status, detail))
    }
}

/// Map a transport failure to an API error, calling out timeouts
pub(crate) fn classify_transport(provider: &str, err: reqwest::Error) -> QabotError {
    if err.is_timeout() {
        QabotError::Api(format!("{} request timed out: {}", provider, err))
    } else {
        QabotError::Api(format!("{} request failed: {}", provider, err))
    }
}

/// Pull `error.message` out of a JSON error body, as both Gemini and OpenAI send it
fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_generation_params_default() {
        let params = GenerationParams::default();
        assert_eq!(params.max_output_tokens, 500);
        assert!((params.temperature - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn test_classify_status_rate_limit() {
        let err = classify_status("gemini", StatusCode::TOO_MANY_REQUESTS, "slow down");
        assert!(matches!(err, QabotError::RateLimited(_)));
        assert!(err.is_api());
    }

    #[test]
    fn test_classify_status_resource_exhausted_body() {
        let body = r#"{"error":{"code":400,"message":"Quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#;
        let err = classify_status("gemini", StatusCode::BAD_REQUEST, body);
        assert!(matches!(err, QabotError::RateLimited(_)));
        assert!(err.to_string().contains("Quota exceeded"));
    }

    #[test]
    fn test_classify_status_auth() {
        let err = classify_status("openai", StatusCode::UNAUTHORIZED, "");
        assert!(matches!(err, QabotError::Authentication(_)));
        let err = classify_status("openai", StatusCode::FORBIDDEN, "");
        assert!(matches!(err, QabotError::Authentication(_)));
    }

    #[test]
    fn test_classify_status_other() {
        let body = r#"{"error":{"message":"model not found"}}"#;
        let err = classify_status("openai", StatusCode::NOT_FOUND, body);
        assert!(matches!(err, QabotError::Api(_)));
        assert!(err.to_string().contains("model not found"));
    }

    #[tokio::test]
    async fn test_mock_provider_generate() {
        let mut mock = MockProvider::new();
        mock.expect_generate()
            .withf(|instruction, content, _| {
                instruction.contains("FAQ") && content.to_string() == "2+2?"
            })
            .times(1)
            .returning(|_, _, _| Ok("4".to_string()));

        let reply = mock
            .generate("FAQ assistant", "2+2?", &GenerationParams::default())
            .await
            .unwrap();
        assert_eq!(reply, "4");
    }
}
