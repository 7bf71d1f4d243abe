//! HTTP implementation of [`CompletionClient`] for chat-completions-style
//! endpoints (OpenRouter, OpenAI, and compatible providers).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use super::error::CompletionError;
use super::prompt::build_plan_prompt;
use super::types::{ChatCompletionResponse, extract_plan_text};
use super::CompletionClient;

/// Configuration for the outbound completion call.
///
/// Endpoint and credential are injected rather than hard-coded so tests can
/// point the client at a local mock server.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    /// Full URL of the chat-completions endpoint.
    pub endpoint: String,
    /// Bearer token sent in the Authorization header.
    pub api_key: String,
    /// Model identifier passed through in the request body.
    pub model: String,
    /// Output length ceiling requested from the provider.
    pub max_tokens: u32,
    /// Client-side timeout for the whole call. Expiry surfaces as a
    /// generation failure.
    pub timeout: Duration,
}

impl CompletionConfig {
    /// Default chat-completions endpoint.
    pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";
    /// Default model identifier.
    pub const DEFAULT_MODEL: &str = "deepseek/deepseek-r1:free";
    /// Default requested output ceiling.
    pub const DEFAULT_MAX_TOKENS: u32 = 500;
    /// Default client-side timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Build a config with defaults for everything but the credential.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: Self::DEFAULT_ENDPOINT.to_owned(),
            api_key: api_key.into(),
            model: Self::DEFAULT_MODEL.to_owned(),
            max_tokens: Self::DEFAULT_MAX_TOKENS,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

}

/// Completion client over a shared `reqwest::Client`.
pub struct HttpCompletionClient {
    config: CompletionConfig,
    http: Client,
}

impl HttpCompletionClient {
    /// Create a client. The underlying connection pool is reused across
    /// requests for the life of the process.
    pub fn new(config: CompletionConfig) -> Result<Self, CompletionError> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, http })
    }

    fn build_request_body(&self, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.config.model,
            "messages": [{ "role": "user", "content": prompt }],
            "max_tokens": self.config.max_tokens,
        })
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn generate(
        &self,
        business_name: &str,
        industry: &str,
    ) -> Result<String, CompletionError> {
        let prompt = build_plan_prompt(business_name, industry);
        let body = self.build_request_body(&prompt);
        debug!(model = %self.config.model, endpoint = %self.config.endpoint, "requesting completion");

        let response = self
            .http
            .post(&self.config.endpoint)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "completion API returned an error");
            return Err(CompletionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatCompletionResponse = response.json().await?;
        match extract_plan_text(&parsed) {
            Some(text) => {
                debug!(chars = text.len(), "extracted plan text");
                Ok(text)
            }
            None => {
                warn!("completion response contained no extractable text");
                Err(CompletionError::NoText)
            }
        }
    }
}
