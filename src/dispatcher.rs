//! Prompt dispatcher
//!
//! Turns a (mode, user text) pair into a provider request and returns the
//! normalized reply. It never touches the history log; see
//! `session::Session` for the turn that combines both.

use crate::error::{Result, QabotError};
use crate::mode::Mode;
use crate::providers::{GenerationParams, Provider};

/// Sends one request per call to the configured provider
pub struct Dispatcher {
    provider: Box<dyn Provider>,
    params: GenerationParams,
}

impl Dispatcher {
    /// Create a dispatcher around a provider
    pub fn new(provider: Box<dyn Provider>, params: GenerationParams) -> Self {
        Self { provider, params }
    }

    /// Provider in use
    pub fn provider(&self) -> &dyn Provider {
        self.provider.as_ref()
    }

    /// Generation parameters sent with each request
    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    /// Dispatch `user_text` in `mode` and return the trimmed reply
    ///
    /// # Errors
    ///
    /// Returns `QabotError::InvalidInput` for blank input (no request is
    /// made), `QabotError::EmptyResponse` for a blank reply, and whatever
    /// API error the provider raised otherwise
    pub async fn dispatch(&self, mode: Mode, user_text: &str) -> Result<String> {
        let user_text = user_text.trim();
        if user_text.is_empty() {
            let what = match mode {
                Mode::Faq => "Question",
                Mode::Summary => "Text",
            };
            return Err(QabotError::InvalidInput(format!("{} cannot be empty", what)).into());
        }

        let content = mode.build_content(user_text);

        tracing::info!(
            provider = self.provider.name(),
            model = self.provider.model(),
            %mode,
            "Dispatching request"
        );

        let reply = self
            .provider
            .generate(mode.instruction(), &content, &self.params)
            .await?;

        let reply = reply.trim();
        if reply.is_empty() {
            return Err(QabotError::EmptyResponse(format!(
                "{} returned a blank reply",
                self.provider.name()
            ))
            .into());
        }

        Ok(reply.to_string())
    }
}
